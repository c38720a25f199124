//! Domain types for the storefront.
//!
//! Products arrive as [`RawProduct`] records, become [`Product`] entries in the
//! [`Catalog`] with a quantity of zero, and change only through
//! [`StorefrontAction::AddToCart`] and [`StorefrontAction::RemoveFromCart`].

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::source::LoadError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a catalog entry
///
/// Assigned once when the catalog is loaded (the record's position in the
/// source payload) and never recomputed afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(usize);

impl ProductId {
    /// Creates a `ProductId` from its raw value
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product record as supplied by a catalog source
///
/// Only `name` is required. Fields this crate does not interpret are kept in
/// `attributes` and carried onto the [`Product`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    /// Display name
    pub name: String,
    /// Image location, if the source provides one
    #[serde(
        default,
        rename = "imageUrl",
        alias = "image_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Every other field of the record
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl RawProduct {
    /// Creates a record with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            attributes: Map::new(),
        }
    }

    /// Sets the image URL
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Adds a pass-through attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Uses `fallback` as the image URL when the record has none
    #[must_use]
    pub fn or_image_url(mut self, fallback: &str) -> Self {
        if self.image_url.is_none() {
            self.image_url = Some(fallback.to_string());
        }
        self
    }
}

/// A catalog entry with its selected quantity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned at load time
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Image location (opaque to the engine)
    pub image_url: String,
    /// Selected quantity
    pub quantity: u32,
    /// Pass-through fields from the source record
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Creates a catalog entry from a source record, with quantity zero
    #[must_use]
    pub fn from_raw(id: ProductId, raw: RawProduct) -> Self {
        Self {
            id,
            name: raw.name,
            image_url: raw.image_url.unwrap_or_default(),
            quantity: 0,
            attributes: raw.attributes,
        }
    }

    /// Returns `true` if the product has a cart line
    #[must_use]
    pub const fn in_cart(&self) -> bool {
        self.quantity > 0
    }

    /// Returns at most `max_chars` characters of the name
    #[must_use]
    pub fn short_name(&self, max_chars: usize) -> &str {
        truncate_chars(&self.name, max_chars)
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Result of a quantity operation on the catalog
///
/// Only [`QuantityUpdate::Changed`] means state was modified; every other
/// variant is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityUpdate {
    /// The quantity was changed
    Changed {
        /// Product that changed
        id: ProductId,
        /// Quantity after the change
        quantity: u32,
    },
    /// Decrement at zero
    AtFloor(ProductId),
    /// Increment at the largest representable quantity
    AtCeiling(ProductId),
    /// No product with this id is loaded
    UnknownId(ProductId),
}

impl QuantityUpdate {
    /// Returns `true` if state was modified
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// The product the operation targeted
    #[must_use]
    pub const fn id(&self) -> ProductId {
        match self {
            Self::Changed { id, .. } | Self::AtFloor(id) | Self::AtCeiling(id) | Self::UnknownId(id) => {
                *id
            }
        }
    }
}

/// Where the catalog load currently stands
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// No load requested yet
    #[default]
    Idle,
    /// Fetch in flight
    Loading,
    /// Catalog loaded
    Loaded {
        /// Number of products loaded
        count: usize,
    },
    /// Fetch or decoding failed; the catalog is empty
    Failed(LoadError),
}

impl LoadStatus {
    /// Returns `true` while a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The load error, if the last load failed
    #[must_use]
    pub const fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// State of the storefront screen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorefrontState {
    /// Products and their selected quantities
    pub catalog: Catalog,
    /// Catalog load lifecycle
    pub load_status: LoadStatus,
    /// Outcome of the most recent quantity operation
    pub last_update: Option<QuantityUpdate>,
}

impl StorefrontState {
    /// Creates an empty state with no load requested
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with `products` already loaded
    #[must_use]
    pub fn with_products(products: Vec<RawProduct>) -> Self {
        let catalog = Catalog::from_raw(products);
        let count = catalog.len();
        Self {
            catalog,
            load_status: LoadStatus::Loaded { count },
            last_update: None,
        }
    }

    /// The cart as currently implied by the catalog
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.catalog.cart()
    }

    /// Readable message for a failed load
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.load_status.error().map(ToString::to_string)
    }
}

/// Actions representing user intents and catalog fetch results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StorefrontAction {
    // ========== Commands ==========
    /// Command: Fetch the catalog from the configured source
    LoadCatalog,

    /// Command: Raise a product's quantity by one
    AddToCart {
        /// Product to add
        id: ProductId,
    },

    /// Command: Lower a product's quantity by one
    RemoveFromCart {
        /// Product to remove
        id: ProductId,
    },

    // ========== Events ==========
    /// Event: The source returned product records
    CatalogLoaded {
        /// Records in source order
        products: Vec<RawProduct>,
    },

    /// Event: The source failed or returned a malformed payload
    CatalogLoadFailed {
        /// What went wrong
        error: LoadError,
    },
}

impl StorefrontAction {
    /// Returns `true` for actions issued by a caller
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::LoadCatalog | Self::AddToCart { .. } | Self::RemoveFromCart { .. }
        )
    }

    /// Returns `true` for actions produced by effects
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}
