//! Core sample logic.
//!
//! - [`families`] - canned and generated family documents
//! - [`demo`] - the scripted sequence, sequential or concurrent
//! - [`summary`] - counts, request charges and errors of a run
//!
//! # Example
//!
//! ```rust,no_run
//! use cosmos_family::adapters::database::create_family_store;
//! use cosmos_family::config::load_config;
//! use cosmos_family::core::demo::{DemoRunner, DemoSettings};
//! use cosmos_family::core::families::canned_families;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cosmos-family.toml")?;
//! let store = create_family_store(&config).await?;
//! let runner = DemoRunner::new(store, DemoSettings::from_config(&config)?);
//!
//! let summary = runner.run(&canned_families()?).await?;
//! println!("Total request charge: {:.2}", summary.total_request_charge());
//! # Ok(())
//! # }
//! ```

pub mod demo;
pub mod families;
pub mod summary;

pub use demo::{DemoRunner, DemoSettings};
pub use families::{canned_families, generate_families, FamilyGenerator};
pub use summary::{DemoSummary, OperationError, OperationKind, OperationStats};
