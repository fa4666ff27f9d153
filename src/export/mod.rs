// ABOUTME: Export phase driver producing the SQL artifact
// ABOUTME: Writes header, schema section, data separator, and row data in fixed order

pub mod data;
pub mod schema;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::tables::{SCHEMA, TABLES};
use crate::{artifact, catalog, postgres};

/// Export the warehouse schema and contents to the artifact file.
///
/// Opens one connection to the source, writes the complete artifact, flushes,
/// and drops the connection. The artifact is only valid once this returns.
/// Tables missing from the source catalog are skipped with a log line; a
/// missing table never aborts the run. Returns the total exported row count.
pub async fn run(source_url: &str, path: &Path) -> Result<u64> {
    tracing::info!("Connecting to local database...");
    let client = postgres::connect(source_url)
        .await
        .context("Failed to connect to source database")?;

    tracing::info!("Exporting to {}...", path.display());
    let file = File::create(path)
        .with_context(|| format!("Failed to create artifact file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    tracing::info!("Exporting schema...");
    artifact::write_header(&mut writer, SCHEMA)?;
    for table in TABLES {
        let columns = catalog::table_columns(&client, table).await?;
        if columns.is_empty() {
            continue;
        }
        let stmt = schema::create_table_statement(table, &columns);
        writeln!(writer, "{}{}", stmt, artifact::STATEMENT_TERMINATOR)
            .with_context(|| format!("Failed to write schema for {}", table))?;
    }

    tracing::info!("Exporting data...");
    artifact::write_data_separator(&mut writer)?;

    let mut total_rows = 0u64;
    for table in TABLES {
        total_rows += data::export_table(&client, &mut writer, table).await?;
    }

    writer.flush().context("Failed to flush artifact file")?;

    tracing::info!("Export complete: {} total rows", total_rows);
    tracing::info!("File: {}", path.display());
    Ok(total_rows)
}
