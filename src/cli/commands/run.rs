//! Run command implementation
//!
//! This module implements the `run` command: provision, create families,
//! read them back and page through a query.

use crate::adapters::database::create_family_store;
use crate::config::schema::{DemoMode, FamilySource, SampleConfig};
use crate::config::load_config;
use crate::core::demo::{DemoRunner, DemoSettings};
use crate::core::families::{canned_families, generate_families};
use crate::core::summary::DemoSummary;
use crate::domain::{CosmosDbError, SampleError};
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Exit code for a run that finished with operation failures
pub const EXIT_OPERATION_FAILURES: i32 = 1;
/// Exit code for configuration errors
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for connection, authentication and provisioning errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;
/// Exit code after Ctrl+C / SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override submission mode
    #[arg(long, value_parser = ["sequential", "concurrent"])]
    pub mode: Option<String>,

    /// Override where families come from
    #[arg(long, value_parser = ["canned", "generated"])]
    pub source: Option<String>,

    /// Number of families to generate (implies --source generated)
    #[arg(long)]
    pub count: Option<usize>,

    /// Query to run (last-name-in, not-andersen, undistricted-with-sons, custom)
    #[arg(long)]
    pub query: Option<String>,

    /// Preferred number of items per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Skip point-reading the created families
    #[arg(long)]
    pub skip_read: bool,

    /// Run against the in-memory store; nothing is sent to Azure
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = if self.dry_run && !Path::new(config_path).exists() {
            tracing::info!(config_path = %config_path, "No configuration file, using defaults for dry run");
            SampleConfig::default()
        } else {
            match load_config(config_path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load configuration");
                    eprintln!("Failed to load configuration: {e}");
                    return Ok(EXIT_CONFIGURATION);
                }
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIGURATION);
        }

        let settings = match DemoSettings::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Configuration validation failed: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let families = match config.demo.source {
            FamilySource::Canned => canned_families(),
            FamilySource::Generated => {
                generate_families(config.demo.generated_count, config.demo.seed)
            }
        };
        let families = match families {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to build sample families: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - using the in-memory store, nothing is sent to Azure");
            println!();
        }

        let store = match create_family_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create store");
                eprintln!("Failed to initialize store: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let backend = store.backend_name();
        let runner = DemoRunner::new(store, settings);

        println!(
            "🚀 Running {:?} sample against {} ({} families, query '{}')",
            runner.settings().mode,
            backend,
            families.len(),
            runner.settings().query.name()
        );
        println!();

        let summary = tokio::select! {
            result = runner.run(&families) => match result {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Sample run failed");
                    eprintln!("Sample run failed: {e}");
                    return Ok(exit_code_for(&e));
                }
            },
            _ = interrupted(&mut shutdown_signal) => {
                tracing::warn!("Sample run interrupted");
                runner.close().await;
                eprintln!("Interrupted");
                return Ok(EXIT_INTERRUPTED);
            }
        };

        print_summary(&summary);

        if summary.is_successful() {
            Ok(0)
        } else {
            Ok(EXIT_OPERATION_FAILURES)
        }
    }

    /// Applies command-line overrides to the loaded configuration
    fn apply_overrides(&self, config: &mut SampleConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        match self.mode.as_deref() {
            Some("sequential") => config.demo.mode = DemoMode::Sequential,
            Some("concurrent") => config.demo.mode = DemoMode::Concurrent,
            _ => {}
        }

        match self.source.as_deref() {
            Some("canned") => config.demo.source = FamilySource::Canned,
            Some("generated") => config.demo.source = FamilySource::Generated,
            _ => {}
        }

        if let Some(count) = self.count {
            config.demo.source = FamilySource::Generated;
            config.demo.generated_count = count;
        }

        if let Some(ref query) = self.query {
            tracing::info!(query = %query, "Overriding query from CLI");
            config.demo.query = query.clone();
        }

        if let Some(page_size) = self.page_size {
            config.demo.page_size = page_size;
        }

        if let Some(max_pages) = self.max_pages {
            config.demo.max_pages = Some(max_pages);
        }

        if self.skip_read {
            config.demo.read_back = false;
        }
    }
}

/// Resolves once shutdown is requested; never if the sender is gone
async fn interrupted(signal: &mut watch::Receiver<bool>) {
    if signal.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Maps a fatal error to the process exit code
pub fn exit_code_for(error: &SampleError) -> i32 {
    match error {
        SampleError::Configuration(_) | SampleError::Validation(_) => EXIT_CONFIGURATION,
        SampleError::Authentication(_) => EXIT_CONNECTION,
        SampleError::CosmosDb(e) => match e {
            CosmosDbError::DeserializationFailed(_) | CosmosDbError::UnsupportedQuery(_) => {
                EXIT_FATAL
            }
            _ => EXIT_CONNECTION,
        },
        _ => EXIT_FATAL,
    }
}

fn print_summary(summary: &DemoSummary) {
    println!();
    println!("📊 Run Summary:");
    println!("  Backend: {}", summary.backend);
    println!(
        "  Database created: {}, container created: {}",
        summary.database_created, summary.container_created
    );
    println!(
        "  Created: {} ok, {} failed, {:.2} RU",
        summary.creates.succeeded, summary.creates.failed, summary.creates.request_charge
    );
    println!(
        "  Read back: {} ok, {} failed, {:.2} RU",
        summary.reads.succeeded, summary.reads.failed, summary.reads.request_charge
    );
    println!(
        "  Query: {} pages, {} items, {:.2} RU",
        summary.query_pages.succeeded, summary.query_items, summary.query_pages.request_charge
    );
    println!("  Total request charge: {:.2} RU", summary.total_request_charge());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.errors.is_empty() {
        println!();
        println!("  ⚠️  Errors:");
        for error in summary.errors.iter().take(10) {
            match error.status {
                Some(status) => println!(
                    "    - {} {} (status {}): {}",
                    error.kind.as_str(),
                    error.target,
                    status,
                    error.message
                ),
                None => println!(
                    "    - {} {}: {}",
                    error.kind.as_str(),
                    error.target,
                    error.message
                ),
            }
        }
        if summary.errors.len() > 10 {
            println!("    ... and {} more errors", summary.errors.len() - 10);
        }
    }
    println!();
}
