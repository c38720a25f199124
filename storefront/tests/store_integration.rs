//! Integration tests for the storefront reducer running in a Store
//!
//! These exercise the full flow: load effect, feedback of the fetch
//! result, and quantity changes read back through the store.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use std::sync::Arc;
use std::time::Duration;
use storefront::source::CatalogFuture;
use storefront::{
    CatalogSource, LoadError, LoadStatus, ProductId, RawProduct, StaticCatalog,
    StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState,
};
use storefront_runtime::Store;
use storefront_testing::helpers::init_test_tracing;

const FALLBACK: &str = "https://picsum.photos/200";

type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

/// Serves a fixed catalog after a delay
struct SlowCatalog {
    delay: Duration,
    products: Vec<RawProduct>,
}

impl CatalogSource for SlowCatalog {
    fn fetch(&self) -> CatalogFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(self.products.clone())
        })
    }
}

fn store_with(source: impl CatalogSource + 'static) -> StorefrontStore {
    let env = StorefrontEnvironment::new(Arc::new(source), FALLBACK);
    Store::new(StorefrontState::new(), StorefrontReducer::new(), env)
}

async fn loaded_store(products: Vec<RawProduct>) -> StorefrontStore {
    let store = store_with(StaticCatalog::new(products));
    let mut handle = store.send(StorefrontAction::LoadCatalog).await.unwrap();
    handle.wait().await;
    store
}

#[tokio::test]
async fn test_load_then_add_and_remove() {
    init_test_tracing();
    let store = loaded_store(vec![RawProduct::new("Widget")]).await;
    let id = ProductId::new(0);

    let status = store.state(|s| s.load_status.clone()).await;
    assert_eq!(status, LoadStatus::Loaded { count: 1 });

    // Add twice
    store.send(StorefrontAction::AddToCart { id }).await.unwrap();
    store.send(StorefrontAction::AddToCart { id }).await.unwrap();
    let (quantity, line) = store
        .state(|s| (s.catalog.quantity(id), s.cart().line(id).map(|l| l.quantity)))
        .await;
    assert_eq!(quantity, Some(2));
    assert_eq!(line, Some(2));

    // Remove back to zero, then once more
    for _ in 0..3 {
        store.send(StorefrontAction::RemoveFromCart { id }).await.unwrap();
    }
    let (quantity, cart_empty) = store
        .state(|s| (s.catalog.quantity(id), s.cart().is_empty()))
        .await;
    assert_eq!(quantity, Some(0));
    assert!(cart_empty);
}

#[tokio::test]
async fn test_fixture_payload_loads_with_fallback_images() {
    let body = include_bytes!("../fixtures/catalog.json");
    let store = store_with(StaticCatalog::from_json(body));

    let mut handle = store.send(StorefrontAction::LoadCatalog).await.unwrap();
    handle.wait().await;

    let products: Vec<(String, String)> = store
        .state(|s| {
            s.catalog
                .products()
                .map(|p| (p.name.clone(), p.image_url.clone()))
                .collect()
        })
        .await;

    assert_eq!(products.len(), 4);
    assert_eq!(products[0].1, "https://picsum.photos/id/1/200");
    assert_eq!(products[1], ("Canvas Tote Bag".to_string(), FALLBACK.to_string()));

    let sku = store
        .state(|s| s.catalog.get(ProductId::new(3)).and_then(|p| p.attributes.get("sku").cloned()))
        .await;
    assert_eq!(sku, Some(serde_json::json!("SOCK-M")));
}

#[tokio::test]
async fn test_failed_load_reports_error_and_ignores_adds() {
    let store = store_with(StaticCatalog::failing(LoadError::Status(503)));

    let mut handle = store.send(StorefrontAction::LoadCatalog).await.unwrap();
    handle.wait().await;

    let message = store.state(StorefrontState::error_message).await;
    assert_eq!(message.as_deref(), Some("Failed to fetch products (status 503)"));

    store
        .send(StorefrontAction::AddToCart { id: ProductId::new(0) })
        .await
        .unwrap();
    let (catalog_empty, cart_empty) = store
        .state(|s| (s.catalog.is_empty(), s.cart().is_empty()))
        .await;
    assert!(catalog_empty);
    assert!(cart_empty);
}

#[tokio::test]
async fn test_load_result_is_broadcast() {
    let store = store_with(StaticCatalog::new(vec![RawProduct::new("Widget")]));
    let mut actions = store.subscribe_actions();

    let mut handle = store.send(StorefrontAction::LoadCatalog).await.unwrap();
    handle.wait().await;

    let action = tokio::time::timeout(Duration::from_secs(1), actions.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        action,
        StorefrontAction::CatalogLoaded {
            products: vec![RawProduct::new("Widget")],
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_state_is_loaded_when_load_result_arrives() {
    let store = store_with(StaticCatalog::new(vec![RawProduct::new("Widget")]));

    for _ in 0..100 {
        let mut actions = store.subscribe_actions();
        store.send(StorefrontAction::LoadCatalog).await.unwrap();

        let action = tokio::time::timeout(Duration::from_secs(1), actions.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(action, StorefrontAction::CatalogLoaded { .. }));

        let status = store.state(|s| s.load_status.clone()).await;
        assert_eq!(status, LoadStatus::Loaded { count: 1 });
    }
}

#[tokio::test]
async fn test_shutdown_during_load_keeps_fetch_result() {
    let store = store_with(SlowCatalog {
        delay: Duration::from_millis(50),
        products: vec![RawProduct::new("Widget"), RawProduct::new("Gadget")],
    });

    store.send(StorefrontAction::LoadCatalog).await.unwrap();
    assert!(store.state(|s| s.load_status.is_loading()).await);

    store.shutdown().await.unwrap();

    let status = store.state(|s| s.load_status.clone()).await;
    assert_eq!(status, LoadStatus::Loaded { count: 2 });
}

#[tokio::test]
async fn test_reload_resets_quantities() {
    let store = loaded_store(vec![RawProduct::new("Widget"), RawProduct::new("Gadget")]).await;
    store
        .send(StorefrontAction::AddToCart { id: ProductId::new(1) })
        .await
        .unwrap();

    let mut handle = store.send(StorefrontAction::LoadCatalog).await.unwrap();
    handle.wait().await;

    let (len, cart_empty) = store.state(|s| (s.catalog.len(), s.cart().is_empty())).await;
    assert_eq!(len, 2);
    assert!(cart_empty);
}

#[tokio::test]
async fn test_concurrent_adds_and_removes_stay_in_sync() {
    let store = loaded_store(vec![RawProduct::new("Widget"), RawProduct::new("Gadget")]).await;
    let widget = ProductId::new(0);
    let gadget = ProductId::new(1);

    // 20 adds on each product, 10 removes on the widget
    let mut handles = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        let action = match i % 5 {
            0 | 1 => StorefrontAction::AddToCart { id: widget },
            2 | 3 => StorefrontAction::AddToCart { id: gadget },
            _ => StorefrontAction::RemoveFromCart { id: widget },
        };
        handles.push(tokio::spawn(async move {
            store.send(action).await.unwrap();
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let state = store.state(Clone::clone).await;
    assert_eq!(state.catalog.quantity(gadget), Some(20));
    // Removes that arrived before any add were no-ops, so the widget lands
    // anywhere between 10 and 20.
    let widget_quantity = state.catalog.quantity(widget).unwrap();
    assert!((10..=20).contains(&widget_quantity));

    let cart = state.cart();
    for product in state.catalog.products() {
        let line_quantity = cart.line(product.id).map_or(0, |l| l.quantity);
        assert_eq!(line_quantity, product.quantity);
    }
}

#[tokio::test]
async fn test_shutdown_rejects_further_actions() {
    let store = loaded_store(vec![RawProduct::new("Widget")]).await;

    store.shutdown().await.unwrap();

    let result = store
        .send(StorefrontAction::AddToCart { id: ProductId::new(0) })
        .await;
    assert!(result.is_err());
    assert_eq!(store.state(|s| s.catalog.quantity(ProductId::new(0))).await, Some(0));
}
