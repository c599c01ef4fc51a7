//! Cosmos DB store adapter
//!
//! Implements [`FamilyStore`] on top of [`CosmosDbClient`].

use super::client::CosmosDbClient;
use super::response::{map_sdk_error, request_charge};
use crate::adapters::database::traits::{
    limit_pages, ContainerSpec, FamilyStore, ItemReceipt, PageStream, ProvisionOutcome,
    QueryOptions, QueryPage,
};
use crate::domain::{CosmosDbError, Family, FamilyQuery, Result, SampleError};
use async_trait::async_trait;
use azure_data_cosmos::clients::ContainerClient;
use azure_data_cosmos::PartitionKey;
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Instant;

/// Cosmos DB adapter implementing [`FamilyStore`]
pub struct CosmosDbAdapter {
    client: Arc<CosmosDbClient>,
    container: ContainerSpec,
}

impl CosmosDbAdapter {
    /// Create a new adapter for the given container
    pub fn new(client: CosmosDbClient, container: ContainerSpec) -> Self {
        Self::new_with_arc(Arc::new(client), container)
    }

    /// Create a new adapter sharing an existing client
    pub fn new_with_arc(client: Arc<CosmosDbClient>, container: ContainerSpec) -> Self {
        Self { client, container }
    }

    fn container_client(&self) -> ContainerClient {
        self.client.container_client(&self.container.name)
    }

    fn partition_value<'a>(&self, family: &'a Family) -> Result<&'a str> {
        family
            .partition_key_value(&self.container.partition_key)
            .ok_or_else(|| {
                SampleError::Validation(format!(
                    "Family '{}' has no value for partition key {}",
                    family.id, self.container.partition_key
                ))
            })
    }
}

#[async_trait]
impl FamilyStore for CosmosDbAdapter {
    fn backend_name(&self) -> &'static str {
        "cosmosdb"
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }

    fn container(&self) -> &ContainerSpec {
        &self.container
    }

    async fn ensure_database(&self) -> Result<ProvisionOutcome> {
        self.client.ensure_database_exists().await
    }

    async fn ensure_container(&self) -> Result<ProvisionOutcome> {
        self.client.ensure_container_exists(&self.container).await
    }

    async fn create_family(&self, family: &Family) -> Result<ItemReceipt> {
        family.validate()?;
        let partition_key = PartitionKey::from(self.partition_value(family)?.to_string());
        let started = Instant::now();

        let response = self
            .container_client()
            .create_item(partition_key, family, None)
            .await
            .map_err(|e| map_sdk_error(e, CosmosDbError::Transport))?;

        Ok(ItemReceipt {
            id: family.id.clone(),
            request_charge: request_charge(response.headers()),
            duration: started.elapsed(),
        })
    }

    async fn read_family(&self, id: &str, partition_key: &str) -> Result<(Family, ItemReceipt)> {
        let started = Instant::now();

        let response = self
            .container_client()
            .read_item::<Family>(PartitionKey::from(partition_key.to_string()), id, None)
            .await
            .map_err(|e| map_sdk_error(e, CosmosDbError::Transport))?;

        let request_charge = request_charge(response.headers());
        let family = response.into_body().map_err(|e| {
            CosmosDbError::DeserializationFailed(format!("Failed to deserialize family {id}: {e}"))
        })?;

        Ok((
            family,
            ItemReceipt {
                id: id.to_string(),
                request_charge,
                duration: started.elapsed(),
            },
        ))
    }

    async fn query_families(
        &self,
        query: &FamilyQuery,
        options: &QueryOptions,
    ) -> Result<PageStream> {
        let sql = query.to_sql();
        tracing::debug!(query = %sql, page_size = options.page_size, "Starting cross-partition query");

        // The service decides the page size; max_pages bounds the iteration.
        let pager = self
            .container_client()
            .query_items::<Family>(sql, PartitionKey::EMPTY, None)
            .map_err(|e| map_sdk_error(e, CosmosDbError::Transport))?;

        let pages = pager
            .into_pages()
            .map(|page| -> Result<QueryPage> {
                let page = page.map_err(|e| map_sdk_error(e, CosmosDbError::Transport))?;
                Ok(QueryPage {
                    request_charge: request_charge(page.headers()),
                    continuation: page.continuation().map(str::to_string),
                    items: page.into_items(),
                })
            })
            .boxed();

        Ok(limit_pages(pages, options.max_pages))
    }

    /// The SDK client has no explicit shutdown; its connections are released
    /// when the last `Arc<CosmosDbClient>` is dropped with the adapter.
    async fn close(&self) -> Result<()> {
        tracing::debug!(endpoint = %self.client.endpoint(), "Releasing Cosmos DB client");
        Ok(())
    }
}
