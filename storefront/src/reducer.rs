//! Reducer logic for the storefront.
//!
//! `AddToCart` and `RemoveFromCart` are the only actions that change a
//! quantity. Both act on the catalog alone; the cart follows because it is
//! projected from the catalog.

use crate::config::StorefrontConfig;
use crate::source::CatalogSource;
use crate::types::{LoadStatus, ProductId, QuantityUpdate, StorefrontAction, StorefrontState};
use std::sync::Arc;
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Environment dependencies for the storefront reducer
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Where the catalog is fetched from
    pub catalog: Arc<dyn CatalogSource>,
    /// Image assigned to records that have none
    pub fallback_image_url: String,
}

impl StorefrontEnvironment {
    /// Creates a new `StorefrontEnvironment`
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSource>, fallback_image_url: impl Into<String>) -> Self {
        Self {
            catalog,
            fallback_image_url: fallback_image_url.into(),
        }
    }

    /// Creates an environment using the configured fallback image
    #[must_use]
    pub fn from_config(catalog: Arc<dyn CatalogSource>, config: &StorefrontConfig) -> Self {
        Self::new(catalog, config.fallback_image_url.clone())
    }
}

impl std::fmt::Debug for StorefrontEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnvironment")
            .field("fallback_image_url", &self.fallback_image_url)
            .finish_non_exhaustive()
    }
}

/// Reducer for the storefront screen
#[derive(Clone, Debug, Default)]
pub struct StorefrontReducer;

impl StorefrontReducer {
    /// Creates a new `StorefrontReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn record_update(state: &mut StorefrontState, update: QuantityUpdate) {
        match update {
            QuantityUpdate::Changed { id, quantity } => {
                tracing::debug!(%id, quantity, "Quantity changed");
            }
            QuantityUpdate::AtFloor(id) => {
                tracing::debug!(%id, "Quantity already zero, nothing to remove");
            }
            QuantityUpdate::AtCeiling(id) => {
                tracing::warn!(%id, "Quantity at maximum, add ignored");
            }
            QuantityUpdate::UnknownId(id) => {
                tracing::warn!(%id, "No product with this id, ignored");
            }
        }
        state.last_update = Some(update);
    }

    fn add(state: &mut StorefrontState, id: ProductId) {
        let update = state.catalog.increment(id);
        Self::record_update(state, update);
    }

    fn remove(state: &mut StorefrontState, id: ProductId) {
        let update = state.catalog.decrement(id);
        Self::record_update(state, update);
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            StorefrontAction::LoadCatalog => {
                if state.load_status.is_loading() {
                    tracing::debug!("Catalog load already in flight");
                    return SmallVec::new();
                }

                state.load_status = LoadStatus::Loading;
                let source = Arc::clone(&env.catalog);

                smallvec![Effect::future(async move {
                    let action = match source.fetch().await {
                        Ok(products) => StorefrontAction::CatalogLoaded { products },
                        Err(error) => StorefrontAction::CatalogLoadFailed { error },
                    };
                    Some(action)
                })]
            }

            StorefrontAction::AddToCart { id } => {
                Self::add(state, id);
                SmallVec::new()
            }

            StorefrontAction::RemoveFromCart { id } => {
                Self::remove(state, id);
                SmallVec::new()
            }

            // ========== Events ==========
            StorefrontAction::CatalogLoaded { products } => {
                let products = products
                    .into_iter()
                    .map(|raw| raw.or_image_url(&env.fallback_image_url));
                let count = state.catalog.load(products);

                tracing::info!(count, "Catalog loaded");
                state.load_status = LoadStatus::Loaded { count };
                state.last_update = None;
                SmallVec::new()
            }

            StorefrontAction::CatalogLoadFailed { error } => {
                tracing::warn!(%error, "Catalog load failed");
                state.catalog.clear();
                state.load_status = LoadStatus::Failed(error);
                state.last_update = None;
                SmallVec::new()
            }
        }
    }
}
