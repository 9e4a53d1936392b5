//! HMAC validation for Shopify OAuth callbacks.
//!
//! Shopify signs every callback by computing HMAC-SHA256 over the canonical
//! form of the query string (see [`CallbackQuery::to_signable_string`]) with
//! the app's client secret and sending the lowercase hex digest as `hmac`.
//!
//! # Security
//!
//! Digest comparison goes through [`subtle::ConstantTimeEq`], so the time
//! taken does not depend on where the first differing byte is. A length
//! mismatch is simply a failed verification.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::auth::oauth::hmac::{compute_signature, verify_signature};
//!
//! let message = "code=abc123&shop=example.myshopify.com&state=xyz";
//! let signature = compute_signature(message, "my-api-secret");
//! assert_eq!(signature.len(), 64);
//! assert!(verify_signature(message, &signature, "my-api-secret"));
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::CallbackQuery;
use crate::config::ShopifyConfig;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `message` keyed with `secret`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Strings of different length compare unequal without inspecting their
/// contents; equal-length strings are compared in full.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Checks `provided` against the signature of `message` under `secret`.
#[must_use]
pub fn verify_signature(message: &str, provided: &str, secret: &str) -> bool {
    let computed = compute_signature(message, secret);
    constant_time_compare(&computed, provided)
}

/// Validates the `hmac` parameter of an OAuth callback.
///
/// The primary secret is tried first, then the old secret if one is
/// configured for key rotation. A callback without an `hmac` parameter
/// never validates.
#[must_use]
pub fn validate_hmac(query: &CallbackQuery, config: &ShopifyConfig) -> bool {
    let Some(received) = query.hmac() else {
        return false;
    };
    let signable = query.to_signable_string();

    if verify_signature(&signable, received, config.api_secret_key().as_ref()) {
        return true;
    }

    config
        .old_api_secret_key()
        .is_some_and(|old| verify_signature(&signable, received, old.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl};

    const FIXTURE_SECRET: &str = "hush";
    const FIXTURE_HMAC: &str = "700e2dadb827fcc8609e9d5ce208b2e9cdaab9df07390d2cbca10d7c328fc4bf";

    fn config_with(secret: &str, old: Option<&str>) -> ShopifyConfig {
        let mut builder = ShopifyConfig::builder()
            .api_key(ApiKey::new("test-key").unwrap())
            .api_secret_key(ApiSecretKey::new(secret).unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap());
        if let Some(old) = old {
            builder = builder.old_api_secret_key(ApiSecretKey::new(old).unwrap());
        }
        builder.build().unwrap()
    }

    fn fixture_query(hmac: &str) -> CallbackQuery {
        CallbackQuery::from_pairs([
            ("code", "0907a61c0c8d55e99db179b68161bc00"),
            ("hmac", hmac),
            ("shop", "some-shop.myshopify.com"),
            ("signature", "11813d1e7bbf4629edcda0628a3f7a20"),
            ("state", "0.6784241404160823"),
            ("timestamp", "1337178173"),
        ])
    }

    fn signed_query(secret: &str) -> CallbackQuery {
        let unsigned = CallbackQuery::from_pairs([
            ("code", "auth-code"),
            ("shop", "test.myshopify.com"),
            ("state", "s1"),
            ("timestamp", "1700000000"),
        ]);
        let hmac = compute_signature(&unsigned.to_signable_string(), secret);
        CallbackQuery::from_pairs([
            ("code", "auth-code"),
            ("hmac", hmac.as_str()),
            ("shop", "test.myshopify.com"),
            ("state", "s1"),
            ("timestamp", "1700000000"),
        ])
    }

    #[test]
    fn test_compute_signature_matches_known_value() {
        assert_eq!(
            compute_signature("message", "key"),
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn test_compute_signature_matches_callback_fixture() {
        let message = "code=0907a61c0c8d55e99db179b68161bc00&shop=some-shop.myshopify.com&state=0.6784241404160823&timestamp=1337178173";
        assert_eq!(compute_signature(message, FIXTURE_SECRET), FIXTURE_HMAC);
    }

    #[test]
    fn test_compute_signature_is_lowercase_hex() {
        let sig = compute_signature("", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("ABC", "abc"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "longer string"));
        assert!(!constant_time_compare("a", ""));
    }

    #[test]
    fn test_validate_hmac_accepts_fixture() {
        let config = config_with(FIXTURE_SECRET, None);
        assert!(validate_hmac(&fixture_query(FIXTURE_HMAC), &config));
    }

    #[test]
    fn test_validate_hmac_rejects_any_single_flipped_byte() {
        let config = config_with(FIXTURE_SECRET, None);
        for i in 0..FIXTURE_HMAC.len() {
            let mut bytes = FIXTURE_HMAC.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                !validate_hmac(&fixture_query(&tampered), &config),
                "flipped byte {i} still validated"
            );
        }
    }

    #[test]
    fn test_validate_hmac_rejects_tampered_parameters() {
        let config = config_with(FIXTURE_SECRET, None);
        let query = CallbackQuery::from_pairs([
            ("code", "0907a61c0c8d55e99db179b68161bc00"),
            ("hmac", FIXTURE_HMAC),
            ("shop", "other-shop.myshopify.com"),
            ("state", "0.6784241404160823"),
            ("timestamp", "1337178173"),
        ]);
        assert!(!validate_hmac(&query, &config));
    }

    #[test]
    fn test_validate_hmac_rejects_truncated_and_missing_signature() {
        let config = config_with(FIXTURE_SECRET, None);
        assert!(!validate_hmac(&fixture_query(&FIXTURE_HMAC[..63]), &config));
        assert!(!validate_hmac(&fixture_query(""), &config));
        assert!(!validate_hmac(&fixture_query(&FIXTURE_HMAC.to_uppercase()), &config));
    }

    #[test]
    fn test_validate_hmac_falls_back_to_old_secret() {
        let config = config_with("new-secret", Some("old-secret"));
        assert!(validate_hmac(&signed_query("old-secret"), &config));
        assert!(validate_hmac(&signed_query("new-secret"), &config));
    }

    #[test]
    fn test_validate_hmac_fails_when_both_keys_fail() {
        let config = config_with("secret-1", Some("secret-2"));
        assert!(!validate_hmac(&signed_query("secret-3"), &config));
    }
}
