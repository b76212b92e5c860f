//! Authentication module for write-key verification.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::{AuthError, WriteAccess};

/// Wrapper type for the shared write key.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct WriteKey(Option<SecretString>);

impl WriteKey {
    /// Create a new WriteKey from an optional string.
    ///
    /// Without a key every write is refused.
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Compare the provided key with the stored key in constant time.
    ///
    /// `ConstantTimeEq` returns false for unequal lengths without an early
    /// exit.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for WriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "WriteKey([REDACTED])"),
            None => write!(f, "WriteKey(None)"),
        }
    }
}
