//! Storefront demo binary
//!
//! Loads the catalog, adds and removes a few products, and prints the
//! catalog and cart after each step.
//!
//! ```text
//! storefront                          # fetch from STOREFRONT_CATALOG_URL
//! storefront fixtures/catalog.json    # serve a local payload instead
//! ```

use anyhow::Context;
use std::sync::Arc;
use storefront::{
    CatalogSource, HttpCatalogClient, ProductId, StaticCatalog, StorefrontAction,
    StorefrontConfig, StorefrontEnvironment, StorefrontReducer, StorefrontState,
};
use storefront_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

const NAME_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,storefront_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().context("invalid storefront configuration")?;

    let source: Arc<dyn CatalogSource> = match std::env::args().nth(1) {
        Some(path) => {
            let body = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read catalog payload from {path}"))?;
            tracing::info!(%path, "Serving catalog from file");
            Arc::new(StaticCatalog::from_json(&body))
        },
        None => {
            let client = HttpCatalogClient::from_config(&config)?;
            tracing::info!(
                url = client.catalog_url(),
                page = config.page,
                "Serving catalog over HTTP"
            );
            Arc::new(client)
        },
    };

    let env = StorefrontEnvironment::from_config(source, &config);
    let store = Store::new(StorefrontState::new(), StorefrontReducer::new(), env);

    println!("=== Storefront ===\n");

    println!(">>> Sending: LoadCatalog");
    let mut handle = store.send(StorefrontAction::LoadCatalog).await?;
    handle.wait().await;

    if let Some(message) = store.state(StorefrontState::error_message).await {
        println!("{message}");
        store.shutdown().await?;
        return Ok(());
    }

    print_catalog(&store).await;

    let first = ProductId::new(0);
    let second = ProductId::new(1);

    for (label, action) in [
        ("AddToCart #0", StorefrontAction::AddToCart { id: first }),
        ("AddToCart #0", StorefrontAction::AddToCart { id: first }),
        ("AddToCart #1", StorefrontAction::AddToCart { id: second }),
        ("RemoveFromCart #0", StorefrontAction::RemoveFromCart { id: first }),
        ("RemoveFromCart #1", StorefrontAction::RemoveFromCart { id: second }),
        ("RemoveFromCart #1", StorefrontAction::RemoveFromCart { id: second }),
    ] {
        println!("\n>>> Sending: {label}");
        store.send(action).await?;
        let update = store.state(|s| s.last_update).await;
        println!("Outcome: {update:?}");
        print_cart(&store).await;
    }

    store.shutdown().await?;
    Ok(())
}

async fn print_catalog(store: &StorefrontStore) {
    let rows: Vec<String> = store
        .state(|s| {
            s.catalog
                .products()
                .map(|p| {
                    let name = p.short_name(NAME_WIDTH);
                    format!("  [{}] {name:<NAME_WIDTH$} x{}", p.id, p.quantity)
                })
                .collect()
        })
        .await;

    println!("Catalog ({} products):", rows.len());
    for row in rows {
        println!("{row}");
    }
}

async fn print_cart(store: &StorefrontStore) {
    let cart = store.state(StorefrontState::cart).await;

    if cart.is_empty() {
        println!("Cart: empty");
        return;
    }

    println!("Cart ({} items):", cart.total_quantity());
    for line in &cart {
        println!("  {} - Quantity: {}", line.short_name(NAME_WIDTH), line.quantity);
    }
}
