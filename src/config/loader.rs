//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthMode, CosmosDbConfig, SampleConfig, StoreTarget};
use super::secret::secret_string;
use crate::domain::errors::SampleError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "COSMOS_FAMILY_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SampleConfig
/// 4. Applies environment variable overrides (COSMOS_FAMILY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use cosmos_family::config::loader::load_config;
///
/// let config = load_config("cosmos-family.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SampleConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SampleError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SampleError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;

    config.validate().map_err(|e| {
        SampleError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Parses configuration text without validating it
///
/// Substitution and environment overrides are applied.
pub fn parse_config(contents: &str) -> Result<SampleConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SampleConfig = toml::from_str(&contents)
        .map_err(|e| SampleError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SampleError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SampleError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

/// Applies environment variable overrides using the COSMOS_FAMILY_* prefix
///
/// Variables follow the pattern COSMOS_FAMILY_<SECTION>_<KEY>, for example
/// COSMOS_FAMILY_COSMOSDB_ENDPOINT or COSMOS_FAMILY_DEMO_MODE. Setting
/// COSMOS_FAMILY_COSMOSDB_ENDPOINT creates the cosmosdb section if absent.
fn apply_env_overrides(config: &mut SampleConfig) {
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env("APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }
    if let Some(val) = env("STORE") {
        match val.to_lowercase().as_str() {
            "cosmosdb" => config.store = StoreTarget::CosmosDB,
            "memory" => config.store = StoreTarget::Memory,
            other => tracing::warn!(value = %other, "Ignoring unknown store override"),
        }
    }

    if config.cosmosdb.is_none() {
        if let Some(endpoint) = env("COSMOSDB_ENDPOINT") {
            config.cosmosdb = Some(CosmosDbConfig::with_endpoint(endpoint));
        }
    }

    if let Some(ref mut cosmos) = config.cosmosdb {
        if let Some(val) = env("COSMOSDB_ENDPOINT") {
            cosmos.endpoint = val;
        }
        if let Some(val) = env("COSMOSDB_KEY") {
            cosmos.auth.mode = AuthMode::Key;
            cosmos.auth.key = Some(secret_string(val));
        }
        if let Some(val) = env("COSMOSDB_AUTH_MODE") {
            match val.to_lowercase().as_str() {
                "key" => cosmos.auth.mode = AuthMode::Key,
                "credential" => cosmos.auth.mode = AuthMode::Credential,
                other => tracing::warn!(value = %other, "Ignoring unknown auth mode override"),
            }
        }
        if let Some(val) = env("COSMOSDB_TENANT_ID") {
            cosmos.auth.tenant_id = Some(val);
        }
        if let Some(val) = env("COSMOSDB_CLIENT_ID") {
            cosmos.auth.client_id = Some(val);
        }
        if let Some(val) = env("COSMOSDB_CLIENT_SECRET") {
            cosmos.auth.client_secret = Some(secret_string(val));
        }
        if let Some(val) = env("COSMOSDB_DATABASE_NAME") {
            cosmos.database_name = val;
        }
        if let Some(val) = env("COSMOSDB_CONTAINER_NAME") {
            cosmos.container_name = val;
        }
        if let Some(val) = env("COSMOSDB_PROVISION") {
            cosmos.provision = val.parse().unwrap_or(true);
        }
    }

    if let Some(val) = env("DEMO_QUERY") {
        config.demo.query = val;
    }
    if let Some(val) = env("DEMO_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.demo.page_size = size;
        }
    }
    if let Some(val) = env("DEMO_MAX_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.demo.max_concurrency = concurrency;
        }
    }

    if let Some(val) = env("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CF_LOADER_TEST_VAR", "test_value");
        let input = "key = \"${CF_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "key = \"test_value\"\n");
        std::env::remove_var("CF_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CF_LOADER_MISSING_VAR");
        let input = "key = \"${CF_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CF_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("CF_LOADER_COMMENTED_VAR");
        let input = "# key = \"${CF_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
store = "cosmosdb"

[application]
log_level = "info"

[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
container_name = "FamilyCollection"

[cosmosdb.auth]
mode = "key"
key = "test-key"

[demo]
mode = "concurrent"
page_size = 5
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let cosmos = config.cosmosdb.as_ref().unwrap();
        assert_eq!(cosmos.database_name, "AzureSampleFamilyDB");
        assert_eq!(cosmos.container_name, "FamilyCollection");
        assert_eq!(cosmos.partition_key, "/lastName");
        assert_eq!(cosmos.throughput, Some(400));
        assert_eq!(config.demo.page_size, 5);
    }
}
