//! Storage integrations for the samples.
//!
//! - [`database`] - the [`FamilyStore`](database::FamilyStore) trait and factory
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - in-process implementation for dry runs and tests
//!
//! # Example
//!
//! ```rust
//! use cosmos_family::adapters::database::{ContainerSpec, FamilyStore};
//! use cosmos_family::adapters::memory::InMemoryFamilyStore;
//!
//! # async fn example() -> cosmos_family::domain::Result<()> {
//! let store = InMemoryFamilyStore::new(
//!     "AzureSampleFamilyDB",
//!     ContainerSpec {
//!         name: "FamilyContainer".to_string(),
//!         partition_key: "/lastName".to_string(),
//!         throughput: Some(400),
//!     },
//! );
//! store.ensure_database().await?;
//! store.ensure_container().await?;
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
