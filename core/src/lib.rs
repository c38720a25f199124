//! # Storefront Core
//!
//! The two building blocks every storefront feature is written against:
//! [`reducer::Reducer`], which holds the rules, and [`effect::Effect`], which
//! describes async work without running it. Running effects is the job of the
//! runtime crate.
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct TallyState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum TallyAction {
//!     Add,
//!     Remove,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = TallyState;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TallyState,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Add => state.count += 1,
//!             TallyAction::Remove => state.count = state.count.saturating_sub(1),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = TallyState::default();
//! TallyReducer.reduce(&mut state, TallyAction::Add, &());
//! assert_eq!(state.count, 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// The reducer trait
///
/// A reducer owns the business rules of one feature. Given the current state,
/// an action and the injected environment, it mutates the state and hands
/// back descriptions of any async work to perform.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Business logic for one feature
    ///
    /// Implementations must not perform I/O in `reduce`; anything async goes
    /// into the returned effects.
    pub trait Reducer {
        /// State mutated by this reducer
        type State;

        /// Inputs: user intents and results fed back by effects
        type Action;

        /// Injected dependencies (data sources, settings)
        type Environment;

        /// Apply `action` to `state`
        ///
        /// Returns the effects to run afterwards. Most actions produce none or
        /// one, so up to four are kept inline.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Descriptions of async work returned by reducers
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Work for the runtime to carry out after a reduce call
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// A future whose `Some(action)` result is sent back to the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Box `fut` as a [`Effect::Future`]
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn effect_debug_hides_future() {
        let effect: Effect<u8> = Effect::future(async { Some(1) });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
        assert!(!effect.is_none());
        assert!(Effect::<u8>::None.is_none());
    }

    #[tokio::test]
    async fn future_effect_yields_action() {
        let effect: Effect<u8> = Effect::future(async { Some(7) });
        let Effect::Future(fut) = effect else {
            unreachable!("constructed as a future effect");
        };
        assert_eq!(fut.await, Some(7));
    }
}
