//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::secret::{is_blank, SecretString};
use crate::domain::query::FamilyQuery;
use serde::{Deserialize, Serialize};

/// Backend the samples run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreTarget {
    /// Azure Cosmos DB account
    #[default]
    CosmosDB,
    /// In-process store, nothing leaves the machine
    Memory,
}

/// How the client authenticates against the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Primary or secondary account key
    #[default]
    Key,
    /// Microsoft Entra ID token credential (passwordless)
    Credential,
}

/// Token credential used in passwordless mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Azure CLI / Azure Developer CLI login
    #[default]
    DeveloperTools,
    /// Managed identity of the hosting resource
    ManagedIdentity,
    /// Service principal with a client secret
    ClientSecret,
}

/// Order in which the sample submits its operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DemoMode {
    /// One operation at a time
    #[default]
    Sequential,
    /// All operations in flight together, joined at the end
    Concurrent,
}

/// Where the sample families come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FamilySource {
    /// The four hard-coded families
    #[default]
    Canned,
    /// Randomly generated families
    Generated,
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Backend selection
    #[serde(default)]
    pub store: StoreTarget,

    /// Azure Cosmos DB configuration (required if store = cosmosdb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosmosdb: Option<CosmosDbConfig>,

    /// What the sample does
    #[serde(default)]
    pub demo: DemoConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SampleConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        if self.effective_store() == StoreTarget::CosmosDB {
            match self.cosmosdb {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "cosmosdb configuration is required when store = 'cosmosdb'".to_string()
                    )
                }
            }
        }

        self.demo.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Backend actually used; dry runs always stay in memory
    pub fn effective_store(&self) -> StoreTarget {
        if self.application.dry_run {
            StoreTarget::Memory
        } else {
            self.store
        }
    }

    /// Database name, falling back to the default for in-memory runs
    pub fn database_name(&self) -> &str {
        self.cosmosdb
            .as_ref()
            .map(|c| c.database_name.as_str())
            .unwrap_or(DEFAULT_DATABASE_NAME)
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            store: StoreTarget::Memory,
            cosmosdb: None,
            demo: DemoConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (use the in-memory store, never touch the account)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Azure Cosmos DB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Account endpoint, e.g. `https://myaccount.documents.azure.com:443/`
    pub endpoint: String,

    /// Authentication settings
    #[serde(default)]
    pub auth: CosmosAuthConfig,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Container name
    #[serde(default = "default_container_name")]
    pub container_name: String,

    /// Partition key path
    #[serde(default = "default_partition_key")]
    pub partition_key: String,

    /// Manual throughput (RU/s) provisioned on container creation
    #[serde(default = "default_throughput")]
    pub throughput: Option<usize>,

    /// Create the database and container when missing
    ///
    /// Passwordless identities usually lack control-plane rights, in which
    /// case the resources must exist beforehand and this is set to `false`.
    #[serde(default = "default_true")]
    pub provision: bool,
}

impl CosmosDbConfig {
    /// Creates a key-authenticated configuration with default names
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth: CosmosAuthConfig::default(),
            database_name: default_database_name(),
            container_name: default_container_name(),
            partition_key: default_partition_key(),
            throughput: default_throughput(),
            provision: true,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("cosmosdb.endpoint cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("cosmosdb.endpoint is not a valid URL: {e}"))?;
        if url.scheme() != "https" {
            return Err("cosmosdb.endpoint must start with https://".to_string());
        }

        if self.database_name.trim().is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        if self.container_name.trim().is_empty() {
            return Err("cosmosdb.container_name cannot be empty".to_string());
        }

        let valid_keys = ["/lastName", "/id"];
        if !valid_keys.contains(&self.partition_key.as_str()) {
            return Err(format!(
                "Invalid cosmosdb.partition_key '{}'. Must be one of: {}",
                self.partition_key,
                valid_keys.join(", ")
            ));
        }

        if let Some(throughput) = self.throughput {
            if throughput < 400 || throughput % 100 != 0 {
                return Err(format!(
                    "cosmosdb.throughput must be a multiple of 100 and at least 400, got {throughput}"
                ));
            }
        }

        self.auth.validate()
    }
}

/// Authentication settings for the Cosmos DB client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CosmosAuthConfig {
    /// Key or token credential
    #[serde(default)]
    pub mode: AuthMode,

    /// Account key (mode = key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<SecretString>,

    /// Token credential flavour (mode = credential)
    #[serde(default)]
    pub credential: CredentialKind,

    /// Tenant for client_secret credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Client id for client_secret credentials or a user-assigned managed identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Client secret for client_secret credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<SecretString>,
}

impl CosmosAuthConfig {
    fn validate(&self) -> Result<(), String> {
        match self.mode {
            AuthMode::Key => {
                if is_blank(self.key.as_ref()) {
                    return Err("cosmosdb.auth.key cannot be empty when mode is 'key'".to_string());
                }
            }
            AuthMode::Credential => {
                if self.credential == CredentialKind::ClientSecret {
                    if self.tenant_id.as_deref().map_or(true, str::is_empty) {
                        return Err(
                            "cosmosdb.auth.tenant_id is required for client_secret credentials"
                                .to_string(),
                        );
                    }
                    if self.client_id.as_deref().map_or(true, str::is_empty) {
                        return Err(
                            "cosmosdb.auth.client_id is required for client_secret credentials"
                                .to_string(),
                        );
                    }
                    if is_blank(self.client_secret.as_ref()) {
                        return Err(
                            "cosmosdb.auth.client_secret is required for client_secret credentials"
                                .to_string(),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Sample run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Sequential or concurrent submission
    #[serde(default)]
    pub mode: DemoMode,

    /// Canned or generated families
    #[serde(default)]
    pub source: FamilySource,

    /// Number of families to generate (source = generated)
    #[serde(default = "default_generated_count")]
    pub generated_count: usize,

    /// RNG seed for reproducible generated families
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Operations in flight at once (mode = concurrent)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Point-read every created family back
    #[serde(default = "default_true")]
    pub read_back: bool,

    /// Query name (last-name-in, not-andersen, undistricted-with-sons, custom)
    #[serde(default = "default_query")]
    pub query: String,

    /// SQL text for query = custom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_query: Option<String>,

    /// Preferred number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Stop after this many pages (unset = drain the query)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

impl DemoConfig {
    fn validate(&self) -> Result<(), String> {
        if self.source == FamilySource::Generated
            && (self.generated_count == 0 || self.generated_count > 1000)
        {
            return Err(format!(
                "demo.generated_count must be between 1 and 1000, got {}",
                self.generated_count
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > 100 {
            return Err(format!(
                "demo.max_concurrency must be between 1 and 100, got {}",
                self.max_concurrency
            ));
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err(format!(
                "demo.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        if self.max_pages == Some(0) {
            return Err("demo.max_pages must be > 0 when set".to_string());
        }

        self.resolve_query().map(|_| ()).map_err(|e| e.to_string())
    }

    /// Resolves the configured query
    pub fn resolve_query(&self) -> crate::domain::Result<FamilyQuery> {
        FamilyQuery::from_name(&self.query, self.custom_query.as_deref())
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            mode: DemoMode::default(),
            source: FamilySource::default(),
            generated_count: default_generated_count(),
            seed: None,
            max_concurrency: default_max_concurrency(),
            read_back: true,
            query: default_query(),
            custom_query: None,
            page_size: default_page_size(),
            max_pages: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a local directory
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Database used when none is configured
pub const DEFAULT_DATABASE_NAME: &str = "AzureSampleFamilyDB";

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_container_name() -> String {
    "FamilyContainer".to_string()
}

fn default_partition_key() -> String {
    "/lastName".to_string()
}

fn default_throughput() -> Option<usize> {
    Some(400)
}

fn default_generated_count() -> usize {
    15
}

fn default_max_concurrency() -> usize {
    10
}

fn default_query() -> String {
    "last-name-in".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;

    fn cosmos_config() -> CosmosDbConfig {
        CosmosDbConfig {
            endpoint: "https://test.documents.azure.com:443/".to_string(),
            auth: CosmosAuthConfig {
                key: Some(secret_string("test-key".to_string())),
                ..Default::default()
            },
            database_name: default_database_name(),
            container_name: default_container_name(),
            partition_key: default_partition_key(),
            throughput: default_throughput(),
            provision: true,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cosmosdb_config_validation() {
        let mut config = cosmos_config();
        assert!(config.validate().is_ok());

        config.endpoint = "http://test.documents.azure.com".to_string();
        assert!(config.validate().is_err());

        let mut config = cosmos_config();
        config.partition_key = "/address/city".to_string();
        assert!(config.validate().is_err());

        let mut config = cosmos_config();
        config.throughput = Some(450);
        assert!(config.validate().is_err());

        config.throughput = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_auth_requires_key() {
        let mut config = cosmos_config();
        config.auth.key = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("cosmosdb.auth.key"));
    }

    #[test]
    fn test_credential_auth_validation() {
        let mut config = cosmos_config();
        config.auth = CosmosAuthConfig {
            mode: AuthMode::Credential,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.auth.credential = CredentialKind::ClientSecret;
        assert!(config.validate().is_err());

        config.auth.tenant_id = Some("tenant".to_string());
        config.auth.client_id = Some("client".to_string());
        config.auth.client_secret = Some(secret_string("secret".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_config_validation() {
        let mut config = DemoConfig::default();
        assert!(config.validate().is_ok());

        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.max_pages = Some(0);
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.query = "custom".to_string();
        assert!(config.validate().is_err());
        config.custom_query = Some("SELECT * FROM c".to_string());
        assert!(config.validate().is_ok());

        let mut config = DemoConfig::default();
        config.source = FamilySource::Generated;
        config.generated_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cosmos_section_required_unless_dry_run() {
        let mut config = SampleConfig {
            store: StoreTarget::CosmosDB,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.application.dry_run = true;
        assert_eq!(config.effective_store(), StoreTarget::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_name_fallback() {
        let config = SampleConfig::default();
        assert_eq!(config.database_name(), "AzureSampleFamilyDB");
    }
}
