//! Catalog and cart quantity synchronization for a storefront screen.
//!
//! A product catalog is fetched once, the user raises or lowers the quantity
//! of individual products, and the cart shows every product with a non-zero
//! quantity. This crate holds that engine:
//!
//! - [`Catalog`]: products in load order, each with its selected quantity
//! - [`Cart`]: read-only view of the catalog's non-zero quantities
//! - [`StorefrontReducer`]: the only way quantities change (`AddToCart`,
//!   `RemoveFromCart`), plus the catalog load lifecycle
//! - [`CatalogSource`]: where products come from ([`HttpCatalogClient`],
//!   [`StaticCatalog`])
//!
//! Quantity is stored once, on the catalog entry. The cart is computed from
//! it, so a cart line can never disagree with its product.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::{
//!     ProductId, RawProduct, StaticCatalog, StorefrontAction, StorefrontEnvironment,
//!     StorefrontReducer, StorefrontState,
//! };
//! use storefront_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = StaticCatalog::new(vec![RawProduct::new("Widget")]);
//! let env = StorefrontEnvironment::new(Arc::new(source), "https://picsum.photos/200");
//! let store = Store::new(StorefrontState::new(), StorefrontReducer::new(), env);
//!
//! let mut handle = store.send(StorefrontAction::LoadCatalog).await?;
//! handle.wait().await;
//!
//! store.send(StorefrontAction::AddToCart { id: ProductId::new(0) }).await?;
//! let cart = store.state(StorefrontState::cart).await;
//! assert_eq!(cart.total_quantity(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod http;
pub mod reducer;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use cart::{Cart, CartLine};
pub use catalog::Catalog;
pub use config::{ConfigError, StorefrontConfig};
pub use http::HttpCatalogClient;
pub use reducer::{StorefrontEnvironment, StorefrontReducer};
pub use source::{CatalogSource, LoadError, StaticCatalog, decode_catalog};
pub use types::{
    LoadStatus, Product, ProductId, QuantityUpdate, RawProduct, StorefrontAction,
    StorefrontState,
};
