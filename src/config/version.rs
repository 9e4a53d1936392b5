//! Shopify Admin API version used for the shop profile request.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A Shopify Admin API version such as `2020-01`, or `unstable`.
///
/// Shopify releases a version each quarter, so the month must be one of
/// `01`, `04`, `07` or `10`.
///
/// ```rust
/// use shopify_install_proxy::ApiVersion;
///
/// let version: ApiVersion = "2024-10".parse().unwrap();
/// assert_eq!(version.to_string(), "2024-10");
/// assert_eq!(ApiVersion::default().to_string(), "2020-01");
/// assert!("2024-13".parse::<ApiVersion>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Version used when none is configured.
    pub const DEFAULT: &'static str = "2020-01";

    /// Returns the path of the shop profile endpoint for this version.
    #[must_use]
    pub fn shop_resource_path(&self) -> String {
        format!("/admin/api/{}/shop.json", self.0)
    }

    fn is_valid(version: &str) -> bool {
        if version == "unstable" {
            return true;
        }
        let Some((year, month)) = version.split_once('-') else {
            return false;
        };
        year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && matches!(month, "01" | "04" | "07" | "10")
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = s.trim().to_lowercase();
        if Self::is_valid(&version) {
            Ok(Self(version))
        } else {
            Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            })
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_quarterly_versions() {
        for raw in ["2020-01", "2023-04", "2024-07", "2025-10"] {
            let version: ApiVersion = raw.parse().unwrap();
            assert_eq!(version.to_string(), raw);
        }
    }

    #[test]
    fn test_parses_unstable() {
        let version: ApiVersion = "Unstable".parse().unwrap();
        assert_eq!(version.shop_resource_path(), "/admin/api/unstable/shop.json");
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for raw in ["", "2024", "2024-02", "24-01", "abcd-01", "2024-01-01"] {
            assert!(matches!(
                raw.parse::<ApiVersion>(),
                Err(ConfigError::InvalidApiVersion { .. })
            ));
        }
    }

    #[test]
    fn test_shop_resource_path() {
        assert_eq!(
            ApiVersion::default().shop_resource_path(),
            "/admin/api/2020-01/shop.json"
        );
    }
}
