//! Catalog sources and the catalog payload format.
//!
//! A source performs one bulk fetch and returns the product records, or a
//! [`LoadError`]. The payload is a JSON object with a `products` array:
//!
//! ```json
//! { "products": [ { "name": "Widget", "sku": "W-1" }, { "name": "Gadget" } ] }
//! ```

use crate::types::RawProduct;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Why the catalog could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadError {
    /// The request could not be sent or the body could not be read
    #[error("Failed to fetch products: {0}")]
    Fetch(String),

    /// The source answered with a non-success status
    #[error("Failed to fetch products (status {0})")]
    Status(u16),

    /// The body is not valid JSON
    #[error("Failed to decode products: {0}")]
    Decode(String),

    /// The body is JSON but not an object with a `products` array
    #[error("Unexpected response format")]
    UnexpectedFormat,

    /// An entry of the `products` array is not a product record
    #[error("Unexpected response format: product {index} is malformed: {reason}")]
    MalformedProduct {
        /// Position of the entry in the array
        index: usize,
        /// Decoder message
        reason: String,
    },
}

/// Boxed future returned by [`CatalogSource::fetch`]
pub type CatalogFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawProduct>, LoadError>> + Send + 'a>>;

/// Supplies the product records for a catalog load
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so the environment can hold an `Arc<dyn CatalogSource>` that the load
/// effect captures.
pub trait CatalogSource: Send + Sync {
    /// Fetch every product record in a single request
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the source is unreachable or the payload
    /// is malformed. Callers do not retry.
    fn fetch(&self) -> CatalogFuture<'_>;
}

/// Decodes a catalog payload
///
/// # Errors
///
/// - [`LoadError::Decode`]: the body is not JSON
/// - [`LoadError::UnexpectedFormat`]: no `products` array at the top level
/// - [`LoadError::MalformedProduct`]: an entry lacks a string `name` or is not an object
pub fn decode_catalog(body: &[u8]) -> Result<Vec<RawProduct>, LoadError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| LoadError::Decode(e.to_string()))?;
    decode_catalog_value(value)
}

/// Decodes an already parsed catalog payload
///
/// # Errors
///
/// Same as [`decode_catalog`], minus [`LoadError::Decode`].
pub fn decode_catalog_value(value: Value) -> Result<Vec<RawProduct>, LoadError> {
    let Value::Object(mut envelope) = value else {
        return Err(LoadError::UnexpectedFormat);
    };
    let Some(Value::Array(items)) = envelope.remove("products") else {
        return Err(LoadError::UnexpectedFormat);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| LoadError::MalformedProduct {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// A source that serves a fixed result
///
/// Used by the demo binary for offline runs and by tests.
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    result: Result<Vec<RawProduct>, LoadError>,
}

impl StaticCatalog {
    /// Serves `products`
    #[must_use]
    pub const fn new(products: Vec<RawProduct>) -> Self {
        Self {
            result: Ok(products),
        }
    }

    /// Serves a decoded JSON payload
    ///
    /// A malformed payload is not rejected here; it surfaces as the load
    /// error of every fetch, the same way a bad HTTP response would.
    #[must_use]
    pub fn from_json(body: &[u8]) -> Self {
        Self {
            result: decode_catalog(body),
        }
    }

    /// Fails every fetch with `error`
    #[must_use]
    pub const fn failing(error: LoadError) -> Self {
        Self { result: Err(error) }
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch(&self) -> CatalogFuture<'_> {
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}
