//! Domain error types
//!
//! This module defines the error hierarchy for the samples.
//! Errors are domain-specific and don't expose third-party SDK types, but they
//! keep the one distinction the samples care about: whether a failure was
//! reported by the Cosmos DB service (and carries an HTTP status) or happened
//! anywhere else.

use thiserror::Error;

/// Main sample error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cosmos DB-related errors
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SampleError {
    /// Returns true when the error was raised by the Cosmos DB service itself
    pub fn is_service_error(&self) -> bool {
        matches!(self, SampleError::CosmosDb(e) if e.is_service_error())
    }

    /// HTTP status reported by the service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SampleError::CosmosDb(e) => e.status(),
            _ => None,
        }
    }
}

/// Cosmos DB-specific errors
///
/// Errors that occur when interacting with Azure Cosmos DB.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// The service answered with an error status
    #[error("Service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// Failed to build the client or reach the account
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Failed to create database
    #[error("Failed to create database: {0}")]
    DatabaseCreationFailed(String),

    /// Failed to create container
    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),

    /// Request never produced a service response
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Failed to deserialize response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),

    /// The backend cannot execute this query
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),
}

impl CosmosDbError {
    /// Status code 404
    pub const NOT_FOUND: u16 = 404;

    /// Status code 409
    pub const CONFLICT: u16 = 409;

    /// Status code 429
    pub const TOO_MANY_REQUESTS: u16 = 429;

    /// Creates a service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        CosmosDbError::Service {
            status,
            message: message.into(),
        }
    }

    /// Returns true for errors carrying a service status
    pub fn is_service_error(&self) -> bool {
        matches!(self, CosmosDbError::Service { .. })
    }

    /// HTTP status reported by the service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CosmosDbError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(Self::NOT_FOUND)
    }

    /// Resource with the same id already exists
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(Self::CONFLICT)
    }

    /// Request rate too large
    pub fn is_throttled(&self) -> bool {
        self.status() == Some(Self::TOO_MANY_REQUESTS)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SampleError {
    fn from(err: std::io::Error) -> Self {
        SampleError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SampleError {
    fn from(err: serde_json::Error) -> Self {
        SampleError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SampleError {
    fn from(err: toml::de::Error) -> Self {
        SampleError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_error_display() {
        let err = SampleError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_cosmosdb_error_conversion() {
        let cosmos_err = CosmosDbError::service(429, "slow down");
        let err: SampleError = cosmos_err.into();
        assert!(matches!(err, SampleError::CosmosDb(_)));
        assert!(err.is_service_error());
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_service_status_helpers() {
        assert!(CosmosDbError::service(404, "missing").is_not_found());
        assert!(CosmosDbError::service(409, "exists").is_conflict());
        assert!(CosmosDbError::service(429, "busy").is_throttled());
        assert!(!CosmosDbError::service(409, "exists").is_not_found());
    }

    #[test]
    fn test_non_service_errors_have_no_status() {
        let err = CosmosDbError::Transport("connection reset".to_string());
        assert!(!err.is_service_error());
        assert_eq!(err.status(), None);

        let err = SampleError::Validation("bad".to_string());
        assert!(!err.is_service_error());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_service_error_display() {
        let err = CosmosDbError::service(409, "Entity with the specified id already exists");
        assert_eq!(
            err.to_string(),
            "Service returned 409: Entity with the specified id already exists"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SampleError = io_err.into();
        assert!(matches!(err, SampleError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SampleError = json_err.into();
        assert!(matches!(err, SampleError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SampleError = toml_err.into();
        assert!(matches!(err, SampleError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
