//! Family store factory
//!
//! Builds the store selected by configuration.

use crate::adapters::cosmosdb::adapter::CosmosDbAdapter;
use crate::adapters::cosmosdb::client::CosmosDbClient;
use crate::adapters::database::traits::{ContainerSpec, FamilyStore};
use crate::adapters::memory::InMemoryFamilyStore;
use crate::config::schema::{SampleConfig, StoreTarget, DEFAULT_DATABASE_NAME};
use crate::domain::{Result, SampleError};
use std::sync::Arc;

/// Container shape described by the configuration
///
/// Falls back to the defaults when no `[cosmosdb]` section is present.
pub fn container_spec(config: &SampleConfig) -> ContainerSpec {
    match config.cosmosdb.as_ref() {
        Some(cosmos) => ContainerSpec {
            name: cosmos.container_name.clone(),
            partition_key: cosmos.partition_key.clone(),
            throughput: cosmos.throughput,
        },
        None => {
            let defaults = crate::config::CosmosDbConfig::with_endpoint("");
            ContainerSpec {
                name: defaults.container_name,
                partition_key: defaults.partition_key,
                throughput: defaults.throughput,
            }
        }
    }
}

/// Create a family store based on the configuration
///
/// Dry runs always get the in-memory store. When provisioning is disabled the
/// in-memory store starts with its database and container already present,
/// matching an account where they were created out of band.
///
/// # Arguments
///
/// * `config` - Validated sample configuration
///
/// # Errors
///
/// Returns an error if the Cosmos DB client cannot be created
pub async fn create_family_store(config: &SampleConfig) -> Result<Arc<dyn FamilyStore>> {
    let spec = container_spec(config);

    match config.effective_store() {
        StoreTarget::CosmosDB => {
            let cosmos_config = config.cosmosdb.as_ref().ok_or_else(|| {
                SampleError::Configuration(
                    "cosmosdb configuration is required when store = 'cosmosdb'".to_string(),
                )
            })?;

            tracing::info!(endpoint = %cosmos_config.endpoint, "Creating Cosmos DB client");
            let client = CosmosDbClient::new(cosmos_config.clone()).await?;
            Ok(Arc::new(CosmosDbAdapter::new(client, spec)))
        }
        StoreTarget::Memory => {
            let database = config
                .cosmosdb
                .as_ref()
                .map(|c| c.database_name.clone())
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
            let provision = config.cosmosdb.as_ref().map_or(true, |c| c.provision);

            tracing::info!(database = %database, container = %spec.name, "Using in-memory store");
            let store = if provision {
                InMemoryFamilyStore::new(database, spec)
            } else {
                InMemoryFamilyStore::provisioned(database, spec)
            };
            Ok(Arc::new(store))
        }
    }
}
