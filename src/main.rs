// ABOUTME: CLI entry point for dw-cloud-migrate
// ABOUTME: Parses commands and routes to the export and import phases

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dw_cloud_migrate::import::ImportOptions;
use dw_cloud_migrate::{config, export, import};

#[derive(Parser)]
#[command(name = "dw-cloud-migrate")]
#[command(about = "Bulk migration of the dw warehouse schema via a portable SQL artifact", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export schema and data from the source database to the artifact file
    Export {
        /// Source connection string (falls back to LOCAL_DATABASE_URL)
        #[arg(long)]
        source: Option<String>,
        /// Artifact file path
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replay the artifact file against the destination database
    Import {
        /// Destination connection string (falls back to CLOUD_DATABASE_URL)
        #[arg(long)]
        target: Option<String>,
        /// Artifact file path
        #[arg(long)]
        file: Option<PathBuf>,
        /// Clear destination tables (reverse order, cascading) before loading
        #[arg(long)]
        truncate: bool,
        /// Run the data load in one transaction, aborting on the first error
        #[arg(long)]
        atomic: bool,
    },
    /// Export then import in sequence
    Both {
        /// Source connection string (falls back to LOCAL_DATABASE_URL)
        #[arg(long)]
        source: Option<String>,
        /// Destination connection string (falls back to CLOUD_DATABASE_URL)
        #[arg(long)]
        target: Option<String>,
        /// Artifact file path
        #[arg(long)]
        file: Option<PathBuf>,
        /// Clear destination tables before loading
        #[arg(long)]
        truncate: bool,
        /// Run the data load in one transaction, aborting on the first error
        #[arg(long)]
        atomic: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { source, file } => {
            let source = config::source_url(source)?;
            let path = config::artifact_path(file);
            export::run(&source, &path).await?;
        }
        Commands::Import {
            target,
            file,
            truncate,
            atomic,
        } => {
            let target = config::target_url(target)?;
            let path = config::artifact_path(file);
            let options = ImportOptions {
                truncate,
                continue_on_error: !atomic,
            };
            import::run(&target, &path, options).await?;
        }
        Commands::Both {
            source,
            target,
            file,
            truncate,
            atomic,
        } => {
            let source = config::source_url(source)?;
            // Resolve the destination before touching the source so a missing
            // target fails before a long export
            let target = config::target_url(target)?;
            let path = config::artifact_path(file);

            export::run(&source, &path).await?;
            tracing::info!("{}", "=".repeat(50));
            let options = ImportOptions {
                truncate,
                continue_on_error: !atomic,
            };
            import::run(&target, &path, options).await?;
        }
    }

    Ok(())
}
