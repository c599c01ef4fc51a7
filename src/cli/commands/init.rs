//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::run::{EXIT_CONFIGURATION, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cosmos-family.toml")]
    pub output: String,

    /// Write the passwordless (token credential) variant
    #[arg(long)]
    pub passwordless: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIGURATION);
        }

        let content = if self.passwordless {
            passwordless_config()
        } else {
            key_config()
        };

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set cosmosdb.endpoint to your account endpoint");
                if self.passwordless {
                    println!("  2. Sign in with `az login` and grant your identity a data-plane role");
                    println!("  3. Create the database and container beforehand");
                } else {
                    println!("  2. Export COSMOS_ACCOUNT_KEY or put it in a .env file");
                }
                println!("  Then: cosmos-family validate-config && cosmos-family run");
                println!("  Or try it offline: cosmos-family run --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn key_config() -> &'static str {
    r#"# Cosmos DB family samples
store = "cosmosdb"  # cosmosdb | memory

[application]
log_level = "info"
dry_run = false

[cosmosdb]
endpoint = "https://your-account.documents.azure.com:443/"
database_name = "AzureSampleFamilyDB"
container_name = "FamilyContainer"
partition_key = "/lastName"  # /lastName | /id
throughput = 400
provision = true

[cosmosdb.auth]
mode = "key"
key = "${COSMOS_ACCOUNT_KEY}"

[demo]
mode = "sequential"  # sequential | concurrent
source = "canned"    # canned | generated
generated_count = 15
max_concurrency = 10
read_back = true
query = "last-name-in"  # last-name-in | not-andersen | undistricted-with-sons | custom
# custom_query = "SELECT VALUE COUNT(1) FROM c"
page_size = 10
# max_pages = 1

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
}

fn passwordless_config() -> &'static str {
    r#"# Cosmos DB family samples, Microsoft Entra ID authentication
#
# Data-plane roles cannot create databases or containers, so they must
# exist before the run.
store = "cosmosdb"

[application]
log_level = "info"

[cosmosdb]
endpoint = "https://your-account.documents.azure.com:443/"
database_name = "AzureSampleFamilyDB"
container_name = "FamilyContainer"
partition_key = "/lastName"
provision = false

[cosmosdb.auth]
mode = "credential"
credential = "developer_tools"  # developer_tools | managed_identity | client_secret
# tenant_id = "${AZURE_TENANT_ID}"
# client_id = "${AZURE_CLIENT_ID}"
# client_secret = "${AZURE_CLIENT_SECRET}"

[demo]
mode = "concurrent"
source = "canned"
query = "last-name-in"
page_size = 10

[logging]
local_enabled = false
"#
}
