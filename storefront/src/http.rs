//! HTTP catalog source.

use crate::config::StorefrontConfig;
use crate::source::{CatalogFuture, CatalogSource, LoadError, decode_catalog};
use crate::types::RawProduct;
use reqwest::Client;

/// Fetches one page of the product catalog over HTTP
///
/// Issues `GET {catalog_url}?page={page}`. There is no retry and no
/// pagination beyond the configured page.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: Client,
    catalog_url: String,
    page: u32,
}

impl HttpCatalogClient {
    /// Create a client for `catalog_url` with reqwest defaults
    #[must_use]
    pub fn new(catalog_url: impl Into<String>, page: u32) -> Self {
        Self {
            client: Client::new(),
            catalog_url: catalog_url.into(),
            page,
        }
    }

    /// Create a client from configuration, applying the request timeout
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the HTTP client cannot be built
    /// (for example, no TLS backend is available).
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            catalog_url: config.catalog_url.clone(),
            page: config.page,
        })
    }

    /// The endpoint this client reads from
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Fetch and decode the configured page
    ///
    /// # Errors
    ///
    /// - [`LoadError::Fetch`]: transport failure or unreadable body
    /// - [`LoadError::Status`]: non-2xx response
    /// - decoding errors from [`decode_catalog`]
    #[tracing::instrument(skip(self), fields(url = %self.catalog_url, page = self.page))]
    pub async fn fetch_products(&self) -> Result<Vec<RawProduct>, LoadError> {
        let response = self
            .client
            .get(&self.catalog_url)
            .query(&[("page", self.page)])
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Catalog request rejected");
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let products = decode_catalog(&body)?;
        tracing::debug!(count = products.len(), "Catalog page decoded");
        Ok(products)
    }
}

impl CatalogSource for HttpCatalogClient {
    fn fetch(&self) -> CatalogFuture<'_> {
        Box::pin(self.fetch_products())
    }
}
