// Cosmos Family - Azure Cosmos DB getting-started samples
// Copyright (c) 2025 Cosmos Family Contributors
// Licensed under the MIT License

//! # Cosmos Family
//!
//! Getting-started samples for Azure Cosmos DB: provision a database and
//! container, write a handful of `Family` documents, point-read them back
//! and page through a SQL query, reporting the request charge of every step.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sample families, the run flow and its summary
//! - [`adapters`] - The [`FamilyStore`](adapters::database::FamilyStore)
//!   trait with Cosmos DB and in-memory backends
//! - [`domain`] - Family documents, queries and errors
//! - [`config`] - TOML configuration with environment overrides
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_family::adapters::database::create_family_store;
//! use cosmos_family::config::load_config;
//! use cosmos_family::core::{canned_families, DemoRunner, DemoSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cosmos-family.toml")?;
//! let store = create_family_store(&config).await?;
//! let runner = DemoRunner::new(store, DemoSettings::from_config(&config)?);
//!
//! let summary = runner.run(&canned_families()?).await?;
//! println!("Total charge: {:.2} RU", summary.total_request_charge());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::SampleError`]. Service rejections keep their HTTP status:
//!
//! ```rust
//! use cosmos_family::domain::{CosmosDbError, SampleError};
//!
//! let error: SampleError = CosmosDbError::service(409, "Entity already exists").into();
//! assert_eq!(error.status(), Some(409));
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
