// ABOUTME: Row extraction and INSERT statement emission for the data section
// ABOUTME: Selects recognized types natively and casts everything else to text

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_postgres::types::Type;
use tokio_postgres::{Client, Row};

use crate::artifact::STATEMENT_TERMINATOR;
use crate::catalog::{self, ColumnInfo};
use crate::literal::Value;
use crate::tables::qualified;

/// Catalog type names the extractor reads natively. Every other type is cast
/// to text in the SELECT list so the catch-all branch always receives a
/// well-formed string instead of failing on an exotic type.
const NATIVE_TYPES: &[&str] = &[
    "boolean",
    "smallint",
    "integer",
    "bigint",
    "real",
    "double precision",
    "text",
    "character varying",
    "character",
    "timestamp without time zone",
    "timestamp with time zone",
];

/// Build the SELECT statement for a table. The projected column names and
/// their order are exactly those used in the emitted INSERT column clause.
pub fn select_statement(table: &str, columns: &[ColumnInfo]) -> String {
    let select_list: Vec<String> = columns
        .iter()
        .map(|col| {
            if NATIVE_TYPES.contains(&col.data_type.as_str()) {
                col.name.clone()
            } else {
                format!("{}::text", col.name)
            }
        })
        .collect();
    format!(
        "SELECT {} FROM {}",
        select_list.join(", "),
        qualified(table)
    )
}

/// Render one INSERT statement for a row, without the trailing terminator.
pub fn insert_statement(table: &str, columns: &[ColumnInfo], values: &[Value]) -> String {
    let col_list: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let literals: Vec<String> = values.iter().map(Value::to_sql_literal).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(table),
        col_list.join(", "),
        literals.join(", ")
    )
}

/// Extract every column of a result row into the closed value set.
pub fn row_values(row: &Row) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = match *column.type_() {
            Type::BOOL => row
                .try_get::<_, Option<bool>>(idx)?
                .map_or(Value::Null, Value::Bool),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)?
                .map_or(Value::Null, |v| Value::Int(v as i64)),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)?
                .map_or(Value::Null, |v| Value::Int(v as i64)),
            Type::INT8 => row
                .try_get::<_, Option<i64>>(idx)?
                .map_or(Value::Null, Value::Int),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)?
                .map_or(Value::Null, |v| Value::Float(v as f64)),
            Type::FLOAT8 => row
                .try_get::<_, Option<f64>>(idx)?
                .map_or(Value::Null, Value::Float),
            Type::TIMESTAMP => row
                .try_get::<_, Option<NaiveDateTime>>(idx)?
                .map_or(Value::Null, Value::Timestamp),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)?
                .map_or(Value::Null, |v| Value::Timestamp(v.naive_utc())),
            // Everything else arrives as text, either natively or via the
            // ::text cast applied in select_statement
            _ => row
                .try_get::<_, Option<String>>(idx)
                .with_context(|| {
                    format!(
                        "Failed to read column '{}' as text (type {})",
                        column.name(),
                        column.type_()
                    )
                })?
                .map_or(Value::Null, Value::Text),
        };
        values.push(value);
    }
    Ok(values)
}

/// Export one table's rows as INSERT statements. Returns the row count.
///
/// A table absent from the catalog is skipped with a log line; a table with
/// zero rows is reported as zero. Neither case is an error.
pub async fn export_table(client: &Client, writer: &mut impl Write, table: &str) -> Result<u64> {
    let columns = catalog::table_columns(client, table).await?;
    if columns.is_empty() {
        tracing::warn!("Skipping {} (no columns or doesn't exist)", table);
        return Ok(0);
    }

    let rows = client
        .query(&select_statement(table, &columns), &[])
        .await
        .with_context(|| format!("Failed to select rows from {}", qualified(table)))?;

    if rows.is_empty() {
        tracing::info!("{}: 0 rows", table);
        return Ok(0);
    }

    for row in &rows {
        let values = row_values(row)
            .with_context(|| format!("Failed to extract a row from {}", qualified(table)))?;
        let stmt = insert_statement(table, &columns, &values);
        write!(writer, "{}{}", stmt, STATEMENT_TERMINATOR)
            .with_context(|| format!("Failed to write row data for {}", table))?;
    }

    tracing::info!("{}: {} rows", table, rows.len());
    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
            char_max_len: None,
            numeric_precision: None,
            numeric_scale: None,
            nullable: true,
        }
    }

    #[test]
    fn select_keeps_native_types_bare() {
        let columns = vec![col("id", "integer"), col("name", "text")];
        assert_eq!(
            select_statement("dim_status", &columns),
            "SELECT id, name FROM dw.dim_status"
        );
    }

    #[test]
    fn select_casts_unrecognized_types_to_text() {
        let columns = vec![
            col("order_key", "bigint"),
            col("unit_price", "numeric"),
            col("order_date", "date"),
            col("meta", "jsonb"),
        ];
        assert_eq!(
            select_statement("fact_part_order", &columns),
            "SELECT order_key, unit_price::text, order_date::text, meta::text \
             FROM dw.fact_part_order"
        );
    }

    #[test]
    fn insert_column_clause_matches_select_order() {
        let columns = vec![col("a", "integer"), col("b", "text")];
        let stmt = insert_statement(
            "dim_status",
            &columns,
            &[Value::Int(1), Value::Text("new".to_string())],
        );
        assert_eq!(stmt, "INSERT INTO dw.dim_status (a, b) VALUES (1, 'new')");
    }

    #[test]
    fn insert_renders_all_literal_shapes() {
        let columns = vec![
            col("a", "integer"),
            col("b", "boolean"),
            col("c", "text"),
            col("d", "text"),
        ];
        let stmt = insert_statement(
            "dim_status",
            &columns,
            &[
                Value::Null,
                Value::Bool(false),
                Value::Float(2.5),
                Value::Text("it's".to_string()),
            ],
        );
        assert_eq!(
            stmt,
            "INSERT INTO dw.dim_status (a, b, c, d) VALUES (NULL, FALSE, 2.5, 'it''s')"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn export_missing_table_returns_zero() {
        let url = std::env::var("TEST_SOURCE_URL").unwrap();
        let client = crate::postgres::connect(&url).await.unwrap();
        let mut buf = Vec::new();
        let count = export_table(&client, &mut buf, "no_such_table")
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(buf.is_empty());
    }
}
