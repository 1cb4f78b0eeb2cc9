//! Intake CLI: run one upload batch over local files.
//!
//! Limits and storage roots come from the environment (or `.env`), see
//! `IntakeConfig::from_env`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use intake_cli::{init_tracing, local_upload_source, render_table};
use intake_core::{IntakeConfig, Location, UploadConfig};
use intake_processing::{default_processors, PreProcessorManager, UploadPipeline};
use intake_storage::create_filesystems;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "intake", about = "Batch file-upload intake")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate files and move the accepted ones into a storage area
    Ingest {
        /// Files forming the batch, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Destination directory inside the storage area
        #[arg(long)]
        dest: String,
        /// Storage area: storage, web or customizing
        #[arg(long, default_value = "storage")]
        location: Location,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Run the processors but do not move any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the configured upload limits
    Limits {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize results")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = IntakeConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Ingest {
            files,
            dest,
            location,
            json,
            dry_run,
        } => {
            let filesystems = create_filesystems(&config)
                .await
                .context("Failed to initialize storage")?;
            let source = local_upload_source(&files).await;

            let cancellation = CancellationToken::new();
            let on_interrupt = cancellation.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, abandoning relocation");
                    on_interrupt.cancel();
                }
            });

            let processors = default_processors(&config);
            let mut pipeline = UploadPipeline::new(
                PreProcessorManager::new(),
                Arc::new(filesystems),
                Box::new(source),
                Arc::new(config),
            )
            .with_cancellation(cancellation);

            for processor in processors {
                pipeline.register(processor)?;
            }

            pipeline.process().await?;
            if !dry_run {
                pipeline.move_files_to(&dest, location).await?;
            }

            let results = pipeline.results();
            if json {
                print_json(&results[..])?;
            } else {
                print!("{}", render_table(&results));
            }
        }
        Commands::Limits { json } => {
            let limits = serde_json::json!({
                "max_file_size_bytes": config.max_file_size(),
                "allowed_extensions": config.allowed_extensions(),
                "allowed_content_types": config.allowed_content_types(),
                "storage_backend": config.storage_backend.to_string(),
            });
            if json {
                print_json(&limits)?;
            } else {
                println!("Max file size:         {} bytes", config.max_file_size());
                println!(
                    "Allowed extensions:    {}",
                    list_or_any(config.allowed_extensions())
                );
                println!(
                    "Allowed content types: {}",
                    list_or_any(config.allowed_content_types())
                );
                println!("Storage backend:       {}", config.storage_backend);
            }
        }
    }

    Ok(())
}

fn list_or_any(values: &[String]) -> String {
    if values.is_empty() {
        "any".to_string()
    } else {
        values.join(", ")
    }
}
