//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output
//! - optional JSON files with daily, hourly or no rotation
//! - level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use cosmos_family::config::LoggingConfig;
//! use cosmos_family::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(request_charge = 7.43, "Created item");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};
