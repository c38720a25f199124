//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`helpers::init_test_tracing`]: Log capture for tests
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(StorefrontReducer::new())
//!     .with_env(test_environment())
//!     .given_state(loaded_state())
//!     .when_action(StorefrontAction::AddToCart { id: ProductId::new(0) })
//!     .then_state(|state| assert_eq!(state.cart().len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Output goes through the test harness writer so it is only shown for
    /// failing tests. Safe to call from every test; only the first call
    /// installs the subscriber.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
