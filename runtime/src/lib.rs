//! # Storefront Runtime
//!
//! [`Store`] owns the state of one feature and is the only way to change it.
//! Each [`Store::send`] runs the reducer under the state write lock, so every
//! action is applied as one step that readers never see half done. Effects
//! returned by the reducer run on spawned tasks and their resulting actions
//! are sent back through the same path.
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Store::new(StorefrontState::new(), StorefrontReducer::new(), env);
//!
//! let mut handle = store.send(StorefrontAction::LoadCatalog).await?;
//! handle.wait().await;
//!
//! let lines = store.state(|s| s.cart().len()).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use storefront_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// Store errors
pub mod error {
    use thiserror::Error;

    /// Why the store refused or failed an operation
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// `send` was called after shutdown started
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Effects were still running when the shutdown timeout elapsed
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Store settings
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use storefront_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Effect-produced actions kept for subscribers that fall behind
    pub broadcast_capacity: usize,
    /// How long [`Store::shutdown`] waits for running effects
    pub shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the broadcast buffer size
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Completion handle for the effects of one `send`
///
/// Resolves once every effect started by that action has finished. An
/// effect only counts as finished after the action it produced has been
/// reduced, so after `wait` the state reflects the whole round trip:
///
/// ```ignore
/// let mut handle = store.send(StorefrontAction::LoadCatalog).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// assert!(!store.state(|s| s.load_status.is_loading()).await);
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    running: Arc<AtomicUsize>,
    done: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let running = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = watch::channel(());

        let handle = Self {
            running: Arc::clone(&running),
            done: done_rx,
        };
        (handle, EffectTracking { running, done: done_tx })
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        Self::new().0
    }

    /// Effects of this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Wait until no effect of this action is running
    pub async fn wait(&mut self) {
        while self.pending() > 0 {
            if self.done.changed().await.is_err() {
                // No tracker left to signal, so nothing is running
                break;
            }
        }
    }

    /// [`EffectHandle::wait`] bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if effects are still running after `timeout`.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Write side of an [`EffectHandle`]
#[derive(Clone)]
struct EffectTracking {
    running: Arc<AtomicUsize>,
    done: watch::Sender<()>,
}

/// Counts one running effect against both its handle and the store
///
/// Released on drop, so a panicking effect still lets waiters and shutdown
/// make progress.
struct InFlight {
    tracking: EffectTracking,
    store_pending: Arc<AtomicUsize>,
}

impl InFlight {
    fn start(tracking: EffectTracking, store_pending: Arc<AtomicUsize>) -> Self {
        tracking.running.fetch_add(1, Ordering::SeqCst);
        store_pending.fetch_add(1, Ordering::SeqCst);
        Self {
            tracking,
            store_pending,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.store_pending.fetch_sub(1, Ordering::SeqCst);
        if self.tracking.running.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.tracking.done.send(());
        }
    }
}

/// The store and its effect loop
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Duration, Effect, EffectHandle, EffectTracking, InFlight,
        Ordering, Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::broadcast;

    /// Single owner of a feature's state
    ///
    /// Cloning is cheap and every clone drives the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutting_down: Arc<AtomicBool>,
        in_flight: Arc<AtomicUsize>,
        shutdown_timeout: Duration,
        effect_actions: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a store with [`StoreConfig::default`]
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a store with explicit settings
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (effect_actions, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutting_down: Arc::new(AtomicBool::new(false)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                shutdown_timeout: config.shutdown_timeout,
                effect_actions,
            }
        }

        /// Reduce `action` and start its effects
        ///
        /// Returns as soon as the state has been updated and the effects have
        /// been spawned. Use the returned [`EffectHandle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] once shutdown has started.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutting_down.load(Ordering::Acquire) {
                tracing::warn!("Action rejected, store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            Ok(self.dispatch(action).await)
        }

        /// Reduce without the shutdown gate
        ///
        /// Effects use this path so their results still land while the store
        /// drains during shutdown.
        async fn dispatch(&self, action: A) -> EffectHandle
        where
            R: Clone,
            E: Clone,
        {
            metrics::counter!("store.actions.total").increment(1);
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let _span = tracing::debug_span!("reduce").entered();

                let started = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(started.elapsed().as_secs_f64());

                tracing::trace!(effects = effects.len(), "Reduced action");
                effects
            };

            for effect in effects {
                self.spawn_effect(effect, &tracking);
            }

            handle
        }

        /// Read the state through `f` under the read lock
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Receive every action produced by an effect
        ///
        /// An action is broadcast after it has been reduced, so reading the
        /// state on receipt sees its outcome. Actions passed to
        /// [`Store::send`] by callers are not included.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.effect_actions.subscribe()
        }

        /// [`Store::shutdown_with_timeout`] with the configured timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown_with_timeout`].
        pub async fn shutdown(&self) -> Result<(), StoreError> {
            self.shutdown_with_timeout(self.shutdown_timeout).await
        }

        /// Stop accepting actions and wait for running effects
        ///
        /// Actions produced by running effects are still reduced, so a fetch
        /// in flight completes its round trip before shutdown returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] with the number of effects
        /// still running when `timeout` elapses.
        pub async fn shutdown_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Shutting down store");
            self.shutting_down.store(true, Ordering::Release);

            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let running = self.in_flight.load(Ordering::Acquire);
                if running == 0 {
                    tracing::info!("Store shut down");
                    return Ok(());
                }
                if tokio::time::Instant::now() >= deadline {
                    tracing::error!(running, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(running));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        fn spawn_effect(&self, effect: Effect<A>, tracking: &EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            let Effect::Future(fut) = effect else {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                return;
            };

            metrics::counter!("store.effects.executed", "type" => "future").increment(1);
            let in_flight = InFlight::start(tracking.clone(), Arc::clone(&self.in_flight));
            let store = self.clone();

            tokio::spawn(async move {
                let _in_flight = in_flight;

                let Some(action) = fut.await else {
                    tracing::trace!("Effect finished without an action");
                    return;
                };

                // Subscribers are told only once the action is reflected in state
                store.dispatch(action.clone()).await;
                let _ = store.effect_actions.send(action);
            });
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutting_down: Arc::clone(&self.shutting_down),
                in_flight: Arc::clone(&self.in_flight),
                shutdown_timeout: self.shutdown_timeout,
                effect_actions: self.effect_actions.clone(),
            }
        }
    }
}

pub use store::Store;
