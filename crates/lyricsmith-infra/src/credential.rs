//! API key lookup from the environment.
//!
//! The key is read once at startup. A missing key is not fatal: the
//! server still starts and every completion call reports a configuration
//! error instead.

use secrecy::SecretString;

/// Read the API key from the environment variable `var`.
///
/// Returns `None` when the variable is unset, empty, or not valid Unicode.
pub fn resolve_api_key(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim().to_string())),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        // Present but unreadable; a secret must be a valid string.
        Err(std::env::VarError::NotUnicode(_)) => None,
    }
}
