//! Anti-forgery state token for the install handshake.
//!
//! A fresh [`StateParam`] is minted for every install attempt. It travels to
//! the browser as the `state` cookie and to Shopify as the `state` query
//! parameter, which Shopify echoes back on the callback. The callback only
//! proceeds when both copies are identical, so the cookie itself is the
//! state store and nothing is kept server-side.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::auth::oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 32);
//! assert!(state.matches(state.as_ref()));
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

use crate::auth::oauth::hmac::constant_time_compare;

/// OAuth state parameter.
///
/// Generated values are 32 characters drawn from a 62-symbol alphabet by the
/// thread-local CSPRNG, roughly 190 bits of entropy.
#[derive(Clone, PartialEq, Eq)]
pub struct StateParam {
    value: String,
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Length of generated tokens.
    pub const LENGTH: usize = 32;

    /// Creates a new state parameter with a cryptographically secure random value.
    #[must_use]
    pub fn new() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LENGTH)
            .map(char::from)
            .collect();

        Self { value }
    }

    /// Wraps a state value received from a client (cookie or query string).
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { value: raw.into() }
    }

    /// Compares this state with a received value in constant time.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        constant_time_compare(&self.value, received)
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateParam").field(&self.value).finish()
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_generates_32_char_alphanumeric_value() {
        let state = StateParam::new();
        assert_eq!(state.as_ref().len(), StateParam::LENGTH);
        assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_new_generates_unique_values() {
        let values: HashSet<String> = (0..1000).map(|_| StateParam::new().to_string()).collect();
        assert_eq!(values.len(), 1000);
    }

    #[test]
    fn test_entropy_is_at_least_128_bits() {
        let bits = (StateParam::LENGTH as f64) * 62f64.log2();
        assert!(bits >= 128.0);
    }

    #[test]
    fn test_from_raw_wraps_string_correctly() {
        let state = StateParam::from_raw("custom-state-123");
        assert_eq!(state.as_ref(), "custom-state-123");
        assert_eq!(state.to_string(), "custom-state-123");
    }

    #[test]
    fn test_matches_requires_exact_value() {
        let state = StateParam::from_raw("abc123");
        assert!(state.matches("abc123"));
        assert!(!state.matches("abc124"));
        assert!(!state.matches("abc12"));
        assert!(!state.matches(""));
    }
}
