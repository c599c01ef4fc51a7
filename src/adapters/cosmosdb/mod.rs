//! Azure Cosmos DB integration
//!
//! This module provides the SDK-backed family store.

pub mod adapter;
pub mod client;
pub mod response;

pub use adapter::CosmosDbAdapter;
pub use client::CosmosDbClient;
pub use response::{map_sdk_error, request_charge};
