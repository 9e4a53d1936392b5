//! Query parameters received on the OAuth callback.

/// Parameters excluded from the signed message.
const SIGNATURE_FIELDS: [&str; 2] = ["hmac", "signature"];

/// The full, ordered set of query parameters Shopify sent to the callback.
///
/// Every pair is kept, including fields Shopify adds over time (`timestamp`,
/// `host`, ...), because they are all part of the signed message. Values are
/// stored URL-decoded, as produced by [`CallbackQuery::parse`].
///
/// # Example
///
/// ```rust
/// use shopify_install_proxy::auth::oauth::CallbackQuery;
///
/// let query = CallbackQuery::from_pairs([
///     ("shop", "test.myshopify.com"),
///     ("hmac", "abc"),
///     ("code", "xyz"),
/// ]);
/// assert_eq!(query.shop(), Some("test.myshopify.com"));
/// assert_eq!(query.to_signable_string(), "code=xyz&shop=test.myshopify.com");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pairs: Vec<(String, String)>,
}

impl CallbackQuery {
    /// Builds a query from key/value pairs in received order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a raw (still percent-encoded) query string.
    ///
    /// `+` decodes to a space and invalid UTF-8 is replaced, matching the
    /// `application/x-www-form-urlencoded` rules browsers use.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Returns the first non-empty value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// The shop domain Shopify redirected from.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// The hex-encoded HMAC-SHA256 signature.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get("hmac")
    }

    /// The authorization code to exchange for an access token.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// The state value echoed back by Shopify.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// Builds the canonical message Shopify signed.
    ///
    /// `hmac` and `signature` are dropped, the remaining pairs are sorted by
    /// key (ties keep their received order) and joined as `key=value` with
    /// `&`. Values are not re-escaped.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        let mut signable: Vec<&(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| !SIGNATURE_FIELDS.contains(&k.as_str()))
            .collect();
        signable.sort_by(|a, b| a.0.cmp(&b.0));

        signable
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}
