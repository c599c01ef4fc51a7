//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold ENV_MUTEX.

use cosmos_family::config::{load_config, AuthMode, DemoMode, SampleConfig, StoreTarget};
use cosmos_family::config::CredentialKind;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for name in [
        "COSMOS_FAMILY_APPLICATION_LOG_LEVEL",
        "COSMOS_FAMILY_APPLICATION_DRY_RUN",
        "COSMOS_FAMILY_STORE",
        "COSMOS_FAMILY_COSMOSDB_ENDPOINT",
        "COSMOS_FAMILY_COSMOSDB_KEY",
        "COSMOS_FAMILY_COSMOSDB_DATABASE_NAME",
        "COSMOS_FAMILY_DEMO_PAGE_SIZE",
        "COSMOS_FAMILY_DEMO_QUERY",
        "CF_IT_ACCOUNT_KEY",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load(contents: &str) -> cosmos_family::domain::Result<SampleConfig> {
    let file = write_config(contents);
    load_config(file.path())
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("CF_IT_ACCOUNT_KEY", "c2VjcmV0LWtleQ==");

    let config = load(
        r#"
store = "cosmosdb"

[application]
log_level = "debug"

[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
database_name = "FamilyDB"
container_name = "Families"
partition_key = "/id"
throughput = 1000

[cosmosdb.auth]
mode = "key"
key = "${CF_IT_ACCOUNT_KEY}"

[demo]
mode = "concurrent"
source = "generated"
generated_count = 50
seed = 42
query = "not-andersen"
page_size = 25
max_pages = 3
"#,
    )
    .unwrap();

    assert_eq!(config.store, StoreTarget::CosmosDB);
    assert_eq!(config.application.log_level, "debug");
    let cosmos = config.cosmosdb.as_ref().unwrap();
    assert_eq!(cosmos.database_name, "FamilyDB");
    assert_eq!(cosmos.partition_key, "/id");
    assert_eq!(cosmos.throughput, Some(1000));
    assert_eq!(
        cosmos.auth.key.as_ref().unwrap().expose_secret().as_ref(),
        "c2VjcmV0LWtleQ=="
    );
    assert_eq!(config.demo.mode, DemoMode::Concurrent);
    assert_eq!(config.demo.seed, Some(42));
    assert_eq!(config.demo.max_pages, Some(3));

    cleanup_env_vars();
}

#[test]
fn test_secrets_are_redacted_in_debug_output() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load(
        r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"

[cosmosdb.auth]
key = "do-not-print-me"
"#,
    )
    .unwrap();

    let debug = format!("{config:?}");
    assert!(!debug.contains("do-not-print-me"));
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let err = load(
        r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"

[cosmosdb.auth]
key = "${CF_IT_ACCOUNT_KEY}"
"#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("CF_IT_ACCOUNT_KEY"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("COSMOS_FAMILY_COSMOSDB_ENDPOINT", "https://override.documents.azure.com:443/");
    std::env::set_var("COSMOS_FAMILY_COSMOSDB_KEY", "b3ZlcnJpZGU=");
    std::env::set_var("COSMOS_FAMILY_COSMOSDB_DATABASE_NAME", "OverrideDB");
    std::env::set_var("COSMOS_FAMILY_DEMO_PAGE_SIZE", "5");
    std::env::set_var("COSMOS_FAMILY_DEMO_QUERY", "undistricted-with-sons");

    // No cosmosdb section at all; the endpoint override creates it
    let config = load("store = \"cosmosdb\"\n");
    cleanup_env_vars();
    let config = config.unwrap();

    let cosmos = config.cosmosdb.as_ref().unwrap();
    assert_eq!(cosmos.endpoint, "https://override.documents.azure.com:443/");
    assert_eq!(cosmos.database_name, "OverrideDB");
    assert_eq!(cosmos.auth.mode, AuthMode::Key);
    assert_eq!(config.demo.page_size, 5);
    assert_eq!(config.demo.query, "undistricted-with-sons");
}

#[test]
fn test_passwordless_client_secret_requires_tenant() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let contents = r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
provision = false

[cosmosdb.auth]
mode = "credential"
credential = "client_secret"
client_id = "00000000-0000-0000-0000-000000000000"
client_secret = "shh"
"#;
    let err = load(contents).unwrap_err();
    assert!(err.to_string().contains("tenant_id"));

    let with_tenant = contents.replace(
        "client_id =",
        "tenant_id = \"11111111-1111-1111-1111-111111111111\"\nclient_id =",
    );
    let config = load(&with_tenant).unwrap();
    let auth = &config.cosmosdb.as_ref().unwrap().auth;
    assert_eq!(auth.credential, CredentialKind::ClientSecret);
}

#[test]
fn test_validation_failures() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        ("store = \"cosmosdb\"\n", "cosmosdb configuration is required"),
        (
            "[cosmosdb]\nendpoint = \"http://test.documents.azure.com\"\n[cosmosdb.auth]\nkey = \"k\"\n",
            "https",
        ),
        (
            "[cosmosdb]\nendpoint = \"https://t.documents.azure.com\"\npartition_key = \"/city\"\n[cosmosdb.auth]\nkey = \"k\"\n",
            "partition_key",
        ),
        (
            "[cosmosdb]\nendpoint = \"https://t.documents.azure.com\"\nthroughput = 250\n[cosmosdb.auth]\nkey = \"k\"\n",
            "throughput",
        ),
        ("store = \"memory\"\n[demo]\npage_size = 0\n", "page_size"),
        ("store = \"memory\"\n[demo]\nquery = \"custom\"\n", "custom"),
        ("store = \"memory\"\n[demo]\nquery = \"everyone\"\n", "Unknown query"),
        ("store = \"memory\"\n[logging]\nlocal_rotation = \"weekly\"\n", "local_rotation"),
    ];

    for (contents, expected) in cases {
        let err = load(contents).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/cosmos-family.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
