// ABOUTME: Catalog introspection for warehouse tables
// ABOUTME: Reads column metadata from information_schema in physical order

use anyhow::{Context, Result};
use tokio_postgres::Client;

use crate::tables::SCHEMA;

/// Column metadata for one warehouse table, as the catalog reports it.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub char_max_len: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub nullable: bool,
}

/// Fetch column metadata for a table in physical (ordinal) column order.
///
/// Returns an empty vector when the table does not exist in the source
/// catalog; callers treat that as "skip this table", never as an error.
/// Descriptors are read fresh on every call, not cached.
pub async fn table_columns(client: &Client, table: &str) -> Result<Vec<ColumnInfo>> {
    let rows = client
        .query(
            "SELECT column_name::text,
                    data_type::text,
                    character_maximum_length::int4,
                    numeric_precision::int4,
                    numeric_scale::int4,
                    (is_nullable = 'YES') AS nullable
             FROM information_schema.columns
             WHERE table_schema = $1 AND table_name = $2
             ORDER BY ordinal_position",
            &[&SCHEMA, &table],
        )
        .await
        .with_context(|| format!("Failed to read catalog metadata for {}.{}", SCHEMA, table))?;

    let columns = rows
        .iter()
        .map(|row| ColumnInfo {
            name: row.get(0),
            data_type: row.get(1),
            char_max_len: row.get(2),
            numeric_precision: row.get(3),
            numeric_scale: row.get(4),
            nullable: row.get(5),
        })
        .collect();

    Ok(columns)
}
