//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `bullet_trains` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing the retrieved collection
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use bullet_trains::initialization::init_logger_with;
use bullet_trains::report::{render_jsonl, render_table};
use bullet_trains::{bullet_train_headers, run_demo, Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // MONGO_USERNAME / MONGO_PASSWORD may live in .env, either in the current
    // directory or next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let output_format = config.output_format;
    match run_demo(config).await {
        Ok(report) => {
            match output_format {
                OutputFormat::Table => {
                    print!("{}", render_table(&bullet_train_headers(), &report.rows));
                }
                OutputFormat::Jsonl => {
                    print!(
                        "{}",
                        render_jsonl(&report.records).context("Failed to render JSONL")?
                    );
                }
            }
            log::info!(
                "retrieved {} documents from '{}.{}' in {:.1}s",
                report.retrieved,
                report.database,
                report.collection,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("bullet_trains error: {:#}", e);
            process::exit(1);
        }
    }
}
