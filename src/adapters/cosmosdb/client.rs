//! Cosmos DB client implementation
//!
//! Builds the SDK client from configuration (account key or Microsoft Entra
//! token credential) and provisions the database and container.

use super::response::{error_status, map_sdk_error};
use crate::adapters::database::traits::{ContainerSpec, ProvisionOutcome};
use crate::config::schema::{AuthMode, CosmosDbConfig, CredentialKind};
use crate::config::secret::to_azure_secret;
use crate::domain::{CosmosDbError, Result, SampleError};
use azure_core::credentials::TokenCredential;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
    ThroughputProperties,
};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, CreateContainerOptions};
use azure_identity::{
    ClientSecretCredential, DeveloperToolsCredential, ManagedIdentityCredential,
    ManagedIdentityCredentialOptions, UserAssignedId,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Cosmos DB client for the samples
///
/// Holds the account client, the database client and the configuration it
/// was created from.
pub struct CosmosDbClient {
    /// Cosmos DB client
    client: CosmosClient,

    /// Database client
    database: DatabaseClient,

    /// Configuration
    config: CosmosDbConfig,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// No request is sent; connectivity problems surface on the first call.
    ///
    /// # Arguments
    ///
    /// * `config` - Cosmos DB configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the credential or the client cannot be created.
    pub async fn new(config: CosmosDbConfig) -> Result<Self> {
        let options = Some(CosmosClientOptions::default());

        let client = match config.auth.mode {
            AuthMode::Key => {
                let key = config.auth.key.as_ref().ok_or_else(|| {
                    SampleError::Authentication(
                        "cosmosdb.auth.key is required when mode is 'key'".to_string(),
                    )
                })?;

                tracing::debug!(endpoint = %config.endpoint, "Authenticating with account key");
                CosmosClient::with_key(&config.endpoint, to_azure_secret(key), options)
            }
            AuthMode::Credential => {
                let credential = build_credential(&config)?;
                tracing::debug!(
                    endpoint = %config.endpoint,
                    credential = ?config.auth.credential,
                    "Authenticating with token credential"
                );
                CosmosClient::new(&config.endpoint, credential, options)
            }
        }
        .map_err(|e| {
            CosmosDbError::ConnectionFailed(format!("Failed to create Cosmos client: {e}"))
        })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Ensure the database exists, creating it if necessary
    ///
    /// A 404 on read triggers the create; a 409 on create means another
    /// client won the race and counts as already existing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read or created.
    pub async fn ensure_database_exists(&self) -> Result<ProvisionOutcome> {
        let name = &self.config.database_name;

        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %name, "Database already exists");
                return Ok(ProvisionOutcome::AlreadyExists);
            }
            Err(e) if error_status(&e) == Some(CosmosDbError::NOT_FOUND) => {}
            Err(e) => return Err(map_sdk_error(e, CosmosDbError::DatabaseCreationFailed).into()),
        }

        tracing::info!(database = %name, "Creating database");
        match self.client.create_database(name, None).await {
            Ok(_) => {
                tracing::info!(database = %name, "Database created successfully");
                Ok(ProvisionOutcome::Created)
            }
            Err(e) if error_status(&e) == Some(CosmosDbError::CONFLICT) => {
                Ok(ProvisionOutcome::AlreadyExists)
            }
            Err(e) => Err(map_sdk_error(e, |msg| {
                CosmosDbError::DatabaseCreationFailed(format!(
                    "Failed to create database {name}: {msg}"
                ))
            })
            .into()),
        }
    }

    /// Ensure a container exists, creating it if necessary
    ///
    /// The container is partitioned by `spec.partition_key` (hash) and, when
    /// `spec.throughput` is set, provisioned with that manual throughput.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be read or created.
    pub async fn ensure_container_exists(&self, spec: &ContainerSpec) -> Result<ProvisionOutcome> {
        let container = self.container_client(&spec.name);

        match container.read(None).await {
            Ok(_) => {
                tracing::info!(container = %spec.name, "Container already exists");
                return Ok(ProvisionOutcome::AlreadyExists);
            }
            Err(e) if error_status(&e) == Some(CosmosDbError::NOT_FOUND) => {}
            Err(e) => {
                return Err(map_sdk_error(e, CosmosDbError::ContainerCreationFailed).into())
            }
        }

        tracing::info!(
            container = %spec.name,
            partition_key = %spec.partition_key,
            throughput = ?spec.throughput,
            "Creating container"
        );

        let properties = ContainerProperties {
            id: Cow::Owned(spec.name.clone()),
            partition_key: PartitionKeyDefinition {
                paths: vec![spec.partition_key.clone()],
                kind: PartitionKeyKind::Hash,
                version: None,
            },
            indexing_policy: Some(IndexingPolicy::default()),
            ..Default::default()
        };
        let options = CreateContainerOptions {
            throughput: spec.throughput.map(ThroughputProperties::manual),
            ..Default::default()
        };

        match self.database.create_container(properties, Some(options)).await {
            Ok(_) => {
                tracing::info!(container = %spec.name, "Container created successfully");
                Ok(ProvisionOutcome::Created)
            }
            Err(e) if error_status(&e) == Some(CosmosDbError::CONFLICT) => {
                Ok(ProvisionOutcome::AlreadyExists)
            }
            Err(e) => Err(map_sdk_error(e, |msg| {
                CosmosDbError::ContainerCreationFailed(format!(
                    "Failed to create container {}: {msg}",
                    spec.name
                ))
            })
            .into()),
        }
    }

    /// Get a container client by name
    pub fn container_client(&self, name: &str) -> ContainerClient {
        self.database.container_client(name)
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Builds the token credential selected by `auth.credential`
fn build_credential(config: &CosmosDbConfig) -> Result<Arc<dyn TokenCredential>> {
    let auth = &config.auth;
    let credential: Arc<dyn TokenCredential> = match auth.credential {
        CredentialKind::DeveloperTools => DeveloperToolsCredential::new(None)
            .map_err(|e| credential_error("developer tools", e))?,
        CredentialKind::ManagedIdentity => {
            let options = ManagedIdentityCredentialOptions {
                user_assigned_id: auth.client_id.clone().map(UserAssignedId::ClientId),
                ..Default::default()
            };
            ManagedIdentityCredential::new(Some(options))
                .map_err(|e| credential_error("managed identity", e))?
        }
        CredentialKind::ClientSecret => {
            let (Some(tenant_id), Some(client_id), Some(secret)) = (
                auth.tenant_id.as_deref(),
                auth.client_id.clone(),
                auth.client_secret.as_ref(),
            ) else {
                return Err(SampleError::Authentication(
                    "client_secret credentials need tenant_id, client_id and client_secret"
                        .to_string(),
                ));
            };
            ClientSecretCredential::new(tenant_id, client_id, to_azure_secret(secret), None)
                .map_err(|e| credential_error("client secret", e))?
        }
    };
    Ok(credential)
}

fn credential_error(kind: &str, error: azure_core::Error) -> SampleError {
    SampleError::Authentication(format!("Failed to create {kind} credential: {error}"))
}
