//! bullet_trains library: a thin document-store access layer plus a demo run
//!
//! The library connects to MongoDB (or to an in-process store with `memory://`),
//! writes synthetic bullet train telemetry to a collection, reads the whole
//! collection back and flattens it into report rows.
//!
//! # Example
//!
//! ```no_run
//! use bullet_trains::{run_demo, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     uri: "memory://".to_string(),
//!     count: 5,
//!     ..Default::default()
//! };
//!
//! let report = run_demo(config).await?;
//! println!("inserted {}, retrieved {}", report.inserted, report.retrieved);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod report;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputFormat};
pub use error_handling::{ConfigError, InitializationError, StoreError};
pub use models::{bullet_train_headers, BulletTrain, Cell, Routes};
pub use run::{run_demo, DemoReport};
pub use storage::{ConnectionManager, Credentials, DatabaseStatus};

// Internal run module (contains the demo orchestration)
mod run {
    use anyhow::{bail, Context, Result};
    use log::info;

    use crate::config::Config;
    use crate::models::{generate_bullet_trains, BulletTrain, Cell, Routes};
    use crate::storage::{
        insert_many, insert_one, retrieve_all, update_many, ConnectionManager, FieldFilter,
        FieldUpdate,
    };

    /// Results of a demo run.
    #[derive(Debug, Clone)]
    pub struct DemoReport {
        /// Documents written by this run
        pub inserted: usize,
        /// Documents read back (includes documents from earlier runs)
        pub retrieved: usize,
        /// Retrieved records, in store order
        pub records: Vec<BulletTrain>,
        /// Flattened rows for the table, one per record
        pub rows: Vec<Vec<Cell>>,
        /// Database written to
        pub database: String,
        /// Collection written to
        pub collection: String,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs the demo: connect, insert `config.count` random records, optionally
    /// update, retrieve the collection and tabulate it.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - credentials are missing for a MongoDB URI
    /// - the server cannot be reached
    /// - any insert or the optional update fails
    /// - retrieval fails or returns no documents
    pub async fn run_demo(config: Config) -> Result<DemoReport> {
        let credentials = config.credentials()?;
        let start_time = std::time::Instant::now();

        let mut manager = ConnectionManager::new(config.uri.clone(), credentials);
        manager
            .connect()
            .await
            .context("error connecting to MongoDB")?;
        manager
            .connect_database(&config.db)
            .await
            .with_context(|| format!("Failed to bind database '{}'", config.db))?;

        let trains = generate_bullet_trains(config.count, &mut rand::rng());

        let inserted = if config.batch {
            insert_many(&manager, &config.db, &config.collection, &trains)
                .await
                .context("Failed to insert batch")?
                .len()
        } else {
            for (i, train) in trains.iter().enumerate() {
                insert_one(&manager, &config.db, &config.collection, train)
                    .await
                    .with_context(|| format!("Failed to insert document {i}"))?;
            }
            trains.len()
        };
        info!(
            "wrote {inserted} documents to '{}.{}'",
            config.db, config.collection
        );

        if let (Some(capacity), Some(first)) = (config.set_capacity, trains.first()) {
            update_many(
                &manager,
                &config.db,
                &config.collection,
                &FieldFilter::eq("velocity", first.velocity),
                &FieldUpdate::set("capacity", capacity),
            )
            .await
            .context("Failed to update capacity")?;
        }

        let records: Vec<BulletTrain> = retrieve_all(&manager, &config.db, &config.collection)
            .await
            .with_context(|| {
                format!(
                    "Failed to retrieve documents from '{}.{}'",
                    config.db, config.collection
                )
            })?;
        if records.is_empty() {
            bail!("no results in '{}.{}'", config.db, config.collection);
        }

        let mut routes = Routes::new();
        routes.stage(&config.collection, records);
        let rows = routes.tabulate(&config.collection);
        let records = routes.records(&config.collection).to_vec();

        manager.disconnect().await;

        Ok(DemoReport {
            inserted,
            retrieved: records.len(),
            records,
            rows,
            database: config.db,
            collection: config.collection,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }
}
