//! OAuth scope list requested during installation.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An ordered, de-duplicated list of OAuth scopes.
///
/// Scopes are sent to Shopify as a comma-separated string in the order they
/// were configured. Implied scopes (`write_x` implying `read_x`) are left for
/// Shopify to expand.
///
/// ```rust
/// use shopify_install_proxy::AuthScopes;
///
/// let scopes: AuthScopes = "read_products, write_orders,read_products".parse().unwrap();
/// assert_eq!(scopes.to_string(), "read_products,write_orders");
/// assert_eq!(AuthScopes::default().to_string(), "read_products");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthScopes {
    scopes: Vec<String>,
}

impl AuthScopes {
    /// The scope requested when none is configured.
    pub const DEFAULT: &'static str = "read_products";

    /// Returns the individual scopes.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    /// Returns `true` if `scope` is part of the list.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

impl Default for AuthScopes {
    fn default() -> Self {
        Self {
            scopes: vec![Self::DEFAULT.to_string()],
        }
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes: Vec<String> = Vec::new();
        for scope in s.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !scope
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("'{scope}' contains characters other than letters, digits and '_'"),
                });
            }
            if !scopes.iter().any(|existing| existing == scope) {
                scopes.push(scope.to_string());
            }
        }

        if scopes.is_empty() {
            return Err(ConfigError::InvalidScopes {
                reason: "at least one scope is required".to_string(),
            });
        }

        Ok(Self { scopes })
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(","))
    }
}
