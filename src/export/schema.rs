// ABOUTME: DDL rendering for the artifact's schema section
// ABOUTME: Builds idempotent CREATE TABLE statements from catalog metadata

use crate::catalog::ColumnInfo;
use crate::tables::qualified;

/// Render one `CREATE TABLE IF NOT EXISTS` statement for a table, without the
/// trailing terminator. Columns appear in catalog physical order, one per
/// line inside the parenthesized list.
pub fn create_table_statement(table: &str, columns: &[ColumnInfo]) -> String {
    let col_defs: Vec<String> = columns.iter().map(column_definition).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        qualified(table),
        col_defs.join(",\n")
    )
}

/// Render a single column definition line.
///
/// Character types carry an explicit length suffix when the catalog reports
/// a maximum length; `numeric` carries `(precision,scale)` with the scale
/// defaulting to zero; every other type is rendered with its bare catalog
/// name. Non-nullable columns get a `NOT NULL` suffix.
fn column_definition(col: &ColumnInfo) -> String {
    let type_str = match (col.char_max_len, col.numeric_precision) {
        (Some(len), _) => format!("{}({})", col.data_type, len),
        (None, Some(precision)) if col.data_type == "numeric" => {
            format!("numeric({},{})", precision, col.numeric_scale.unwrap_or(0))
        }
        _ => col.data_type.clone(),
    };
    let null_str = if col.nullable { "" } else { " NOT NULL" };
    format!("  {} {}{}", col.name, type_str, null_str)
}
