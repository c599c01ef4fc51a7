//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over where families are
//! stored, allowing the samples to run against Cosmos DB or in memory.

pub mod factory;
pub mod traits;

pub use factory::{container_spec, create_family_store};
pub use traits::{
    limit_pages, ContainerSpec, FamilyStore, ItemReceipt, PageStream, ProvisionOutcome,
    QueryOptions, QueryPage,
};
