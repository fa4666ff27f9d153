// ABOUTME: Import phase driver replaying the SQL artifact against the destination
// ABOUTME: Two-pass replay with optional destructive reset and per-statement error tallying

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio_postgres::Client;

use crate::artifact::{self, StatementKind};
use crate::postgres;
use crate::tables::{qualified, SCHEMA, TABLES};

/// How many statements between progress log lines during the insert pass.
const PROGRESS_INTERVAL: u64 = 1000;

/// How many insert errors are logged in detail before switching to counting.
const DETAILED_ERROR_CAP: u64 = 5;

/// Replay policy for the import phase.
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Clear all destination tables (reverse dependency order, cascading)
    /// before loading, so repeated imports converge to the same final state.
    pub truncate: bool,
    /// When true (the default mode), each insert executes independently and
    /// failures are counted rather than aborting. When false, the whole
    /// insert pass runs in one transaction and the first failure rolls the
    /// pass back.
    pub continue_on_error: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            truncate: false,
            continue_on_error: true,
        }
    }
}

/// Outcome of the insert replay pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub applied: u64,
    pub failed: u64,
}

/// Import the artifact into the destination database.
///
/// Pre-flight checks (artifact must exist) abort before any connection is
/// opened. Schema statements replay first and are idempotent by construction;
/// the optional destructive reset runs between the schema and data passes.
/// A partially failed import leaves the destination in whatever state the
/// successfully applied statements produced; the summary carries the tally.
pub async fn run(target_url: &str, path: &Path, options: ImportOptions) -> Result<ImportSummary> {
    if !path.exists() {
        bail!(
            "{} not found. Run 'export' first.",
            path.display()
        );
    }

    tracing::info!("Connecting to cloud database...");
    let mut client = postgres::connect(target_url)
        .await
        .context("Failed to connect to destination database")?;

    // Issue CREATE SCHEMA directly so the creation pass always has a schema
    // to target; the artifact's own schema fragment is ignored during replay.
    tracing::info!("Creating schema...");
    match client
        .execute(&format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA), &[])
        .await
    {
        Ok(_) => tracing::info!("Schema '{}' ready", SCHEMA),
        Err(e) => tracing::warn!("Schema note: {}", e),
    }

    tracing::info!("Reading {}...", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact file {}", path.display()))?;
    let statements = artifact::split_statements(&content);

    tracing::info!("Creating tables...");
    create_tables(&client, &statements).await;

    if options.truncate {
        truncate_tables(&client).await;
    }

    tracing::info!("Importing data from {}...", path.display());
    let inserts: Vec<&str> = statements
        .iter()
        .copied()
        .filter(|s| artifact::classify(s) == StatementKind::Insert)
        .collect();

    let summary = if options.continue_on_error {
        replay_inserts(&client, &inserts).await
    } else {
        replay_inserts_atomic(&mut client, &inserts).await?
    };

    tracing::info!(
        "Import complete: {} successful, {} errors",
        summary.applied,
        summary.failed
    );
    Ok(summary)
}

/// First replay pass: execute every table-creation fragment.
///
/// The statements are `CREATE TABLE IF NOT EXISTS`, so duplicate-object
/// failures are expected on re-runs and swallowed; any other DDL error is
/// logged and skipped so the remaining tables still get created.
async fn create_tables(client: &Client, statements: &[&str]) {
    for stmt in statements {
        if artifact::classify(stmt) != StatementKind::CreateTable {
            continue;
        }
        if let Err(e) = client.execute(*stmt, &[]).await {
            let msg = e.to_string();
            if !msg.contains("already exists") {
                tracing::warn!("Table error: {:.60}", msg);
            }
        }
    }
}

/// Destructive reset: clear every warehouse table on the destination.
///
/// Walks the fixed table order reversed so dependents are cleared before the
/// tables they reference, cascading to pick up any unlisted referencing rows.
/// Missing tables and per-table failures are logged and skipped; the reset
/// never aborts the import.
async fn truncate_tables(client: &Client) {
    tracing::info!("Truncating existing data...");
    for table in TABLES.iter().rev() {
        let stmt = format!("TRUNCATE TABLE {} CASCADE", qualified(table));
        match client.execute(&stmt, &[]).await {
            Ok(_) => tracing::info!("Truncated {}", table),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("does not exist") {
                    tracing::info!("Skip {} (not exists)", table);
                } else {
                    tracing::warn!("Skip {}: {:.60}", table, msg);
                }
            }
        }
    }
}

/// Best-effort insert replay: each statement executes independently.
///
/// A failed row increments the error counter and replay moves on; only the
/// first few errors are logged in detail, the rest are counted. Progress is
/// reported at a fixed statement interval.
async fn replay_inserts(client: &Client, inserts: &[&str]) -> ImportSummary {
    let total = inserts.len();
    let mut summary = ImportSummary::default();

    for stmt in inserts {
        match client.execute(*stmt, &[]).await {
            Ok(_) => {
                summary.applied += 1;
                if summary.applied % PROGRESS_INTERVAL == 0 {
                    tracing::info!("Progress: {}/{} rows...", summary.applied, total);
                }
            }
            Err(e) => {
                summary.failed += 1;
                if summary.failed <= DETAILED_ERROR_CAP {
                    tracing::warn!("Insert error: {:.80}", e.to_string());
                }
            }
        }
    }

    summary
}

/// Atomic insert replay: all rows apply in one transaction or none do.
async fn replay_inserts_atomic(client: &mut Client, inserts: &[&str]) -> Result<ImportSummary> {
    let total = inserts.len();
    let txn = client
        .transaction()
        .await
        .context("Failed to begin import transaction")?;

    let mut applied = 0u64;
    for stmt in inserts {
        txn.execute(*stmt, &[])
            .await
            .with_context(|| format!("Insert failed after {} rows, rolling back", applied))?;
        applied += 1;
        if applied % PROGRESS_INTERVAL == 0 {
            tracing::info!("Progress: {}/{} rows...", applied, total);
        }
    }

    txn.commit()
        .await
        .context("Failed to commit import transaction")?;

    Ok(ImportSummary {
        applied,
        failed: 0,
    })
}
