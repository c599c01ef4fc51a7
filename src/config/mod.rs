//! Configuration management for the samples.
//!
//! TOML files with `${VAR_NAME}` substitution, `COSMOS_FAMILY_*` environment
//! overrides and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_family::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cosmos-family.toml")?;
//!
//! if let Some(cosmosdb) = &config.cosmosdb {
//!     println!("Cosmos DB: {}/{}", cosmosdb.database_name, cosmosdb.container_name);
//! }
//! println!("Query: {}", config.demo.query);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry run
//! - [`StoreTarget`] - `cosmosdb` or `memory`
//! - [`CosmosDbConfig`] / [`CosmosAuthConfig`] - account, names, provisioning, auth
//! - [`DemoConfig`] - mode, families, query and paging
//! - [`LoggingConfig`] - optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! store = "cosmosdb"
//!
//! [application]
//! log_level = "info"
//!
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! database_name = "AzureSampleFamilyDB"
//! container_name = "FamilyContainer"
//! partition_key = "/lastName"
//!
//! [cosmosdb.auth]
//! mode = "key"
//! key = "${COSMOS_ACCOUNT_KEY}"
//!
//! [demo]
//! mode = "concurrent"
//! source = "generated"
//! query = "undistricted-with-sons"
//! page_size = 5
//! max_pages = 1
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config, ENV_PREFIX};
pub use schema::{
    ApplicationConfig, AuthMode, CosmosAuthConfig, CosmosDbConfig, CredentialKind, DemoConfig,
    DemoMode, FamilySource, LoggingConfig, SampleConfig, StoreTarget, DEFAULT_DATABASE_NAME,
};
pub use secret::{secret_string, SecretString, SecretValue};
