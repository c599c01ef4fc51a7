//! Secure credential handling using the secrecy crate
//!
//! Account keys and client secrets are held as [`SecretString`], which zeroes
//! its memory on drop and redacts itself in `Debug` output. The value is only
//! exposed at the point where it is handed to the Azure SDK.
//!
//! # Example
//!
//! ```rust
//! use cosmos_family::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("account-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "account-key");
//! println!("{:?}", key); // Prints: Secret([REDACTED ...])
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Wraps a String as a SecretString
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Converts a SecretString into the Azure SDK's secret type
///
/// The SDK keeps its own redacted copy; ours is dropped (and zeroed) as usual.
pub fn to_azure_secret(secret: &SecretString) -> azure_core::credentials::Secret {
    azure_core::credentials::Secret::new(secret.expose_secret().as_ref().to_string())
}

/// True when the optional secret is absent or blank
pub fn is_blank(secret: Option<&SecretString>) -> bool {
    secret.map(|s| s.expose_secret().is_empty()).unwrap_or(true)
}
