//! Storefront configuration.
//!
//! Every setting has a default and can be overridden from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `STOREFRONT_CATALOG_URL` | [`DEFAULT_CATALOG_URL`] |
//! | `STOREFRONT_CATALOG_PAGE` | `1` |
//! | `STOREFRONT_FALLBACK_IMAGE_URL` | [`DEFAULT_FALLBACK_IMAGE_URL`] |
//! | `STOREFRONT_REQUEST_TIMEOUT_SECS` | `10` |

use std::time::Duration;
use thiserror::Error;

/// Product listing endpoint used when none is configured
pub const DEFAULT_CATALOG_URL: &str =
    "https://catalog-management-system-dev-ak3ogf6zea-uc.a.run.app/cms/products";

/// Image shown for products whose record has no image
pub const DEFAULT_FALLBACK_IMAGE_URL: &str = "https://picsum.photos/200";

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be used
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// Environment variable name
        name: &'static str,
        /// Value as found
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Settings for the catalog source and the screen
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use storefront::StorefrontConfig;
///
/// let config = StorefrontConfig::default()
///     .with_catalog_url("http://localhost:8080/products")
///     .with_request_timeout(Duration::from_secs(2));
/// assert_eq!(config.page, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Product listing endpoint
    pub catalog_url: String,
    /// Page requested from the endpoint (1-based)
    pub page: u32,
    /// Image used for records without one
    pub fallback_image_url: String,
    /// Timeout for the catalog request
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from `STOREFRONT_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric variable does not parse,
    /// or if the page or the timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("STOREFRONT_CATALOG_URL") {
            config.catalog_url = url;
        }

        if let Some(raw) = lookup("STOREFRONT_CATALOG_PAGE") {
            let page: u32 = parse_var("STOREFRONT_CATALOG_PAGE", &raw)?;
            if page == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "STOREFRONT_CATALOG_PAGE",
                    value: raw,
                    reason: "pages start at 1".to_string(),
                });
            }
            config.page = page;
        }

        if let Some(url) = lookup("STOREFRONT_FALLBACK_IMAGE_URL") {
            config.fallback_image_url = url;
        }

        if let Some(raw) = lookup("STOREFRONT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = parse_var("STOREFRONT_REQUEST_TIMEOUT_SECS", &raw)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "STOREFRONT_REQUEST_TIMEOUT_SECS",
                    value: raw,
                    reason: "a zero timeout fails every request".to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the catalog endpoint
    #[must_use]
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Set the requested page
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the fallback image
    #[must_use]
    pub fn with_fallback_image_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_image_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            page: 1,
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(StorefrontConfig::from_lookup(lookup(&[])), Ok(StorefrontConfig::default()));
    }

    #[test]
    fn variables_override_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_CATALOG_URL", "http://localhost:9000/products"),
            ("STOREFRONT_CATALOG_PAGE", "3"),
            ("STOREFRONT_FALLBACK_IMAGE_URL", "http://img/placeholder.png"),
            ("STOREFRONT_REQUEST_TIMEOUT_SECS", " 4 "),
        ]));

        assert_eq!(
            config,
            Ok(StorefrontConfig {
                catalog_url: "http://localhost:9000/products".to_string(),
                page: 3,
                fallback_image_url: "http://img/placeholder.png".to_string(),
                request_timeout: Duration::from_secs(4),
            })
        );
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "STOREFRONT_REQUEST_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn rejects_page_zero() {
        let result = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_CATALOG_PAGE", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "STOREFRONT_CATALOG_PAGE", .. })
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_REQUEST_TIMEOUT_SECS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "STOREFRONT_REQUEST_TIMEOUT_SECS", .. })
        ));
    }
}
