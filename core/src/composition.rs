//! Reducer composition utilities
//!
//! [`combine_reducers`] runs several reducers over the same state and action,
//! in order, and concatenates their effects. This is how a pure state reducer
//! and an effect-only reducer are joined into the single reducer a store runs.
//!
//! # Example
//!
//! ```
//! use todo_pipeline_core::composition::{combine_reducers, BoxedReducer};
//! use todo_pipeline_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     count: i32,
//!     seen: usize,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Increment,
//! }
//!
//! struct CountReducer;
//! struct AuditReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AppState,
//!         action: AppAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<AppAction>; 4]> {
//!         match action {
//!             AppAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for AuditReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AppState,
//!         _action: AppAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<AppAction>; 4]> {
//!         state.seen += 1;
//!         SmallVec::new()
//!     }
//! }
//!
//! let reducers: Vec<BoxedReducer<AppState, AppAction, ()>> =
//!     vec![Box::new(CountReducer), Box::new(AuditReducer)];
//! let combined = combine_reducers(reducers);
//! let mut state = AppState::default();
//! combined.reduce(&mut state, AppAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(state.seen, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A reducer that can be shared across the tasks of a store.
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines reducers that operate on the same state and action types.
///
/// Reducers run in the order given; every one of them sees the same action.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer {
        reducers: reducers.into(),
    }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cloning is cheap; the reducers are shared.
pub struct CombinedReducer<S, A, E> {
    reducers: Arc<[BoxedReducer<S, A, E>]>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: Arc::clone(&self.reducers),
        }
    }
}

impl<S, A, E> std::fmt::Debug for CombinedReducer<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in self.reducers.iter() {
            all_effects.extend(reducer.reduce(state, action.clone(), env));
        }

        all_effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default)]
    struct Log {
        entries: Vec<&'static str>,
    }

    struct Named(&'static str);

    impl Reducer for Named {
        type State = Log;
        type Action = ();
        type Environment = ();

        fn reduce(&self, state: &mut Log, _action: (), _env: &()) -> SmallVec<[Effect<()>; 4]> {
            state.entries.push(self.0);
            smallvec::smallvec![Effect::None]
        }
    }

    #[test]
    fn runs_reducers_in_order_and_collects_effects() {
        let reducers: Vec<BoxedReducer<Log, (), ()>> =
            vec![Box::new(Named("first")), Box::new(Named("second"))];
        let combined = combine_reducers(reducers);
        let mut state = Log::default();

        let effects = combined.reduce(&mut state, (), &());

        assert_eq!(state.entries, vec!["first", "second"]);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn empty_chain_is_a_no_op() {
        let combined: CombinedReducer<Log, (), ()> = combine_reducers(Vec::new());
        let mut state = Log::default();

        let effects = combined.reduce(&mut state, (), &());

        assert!(state.entries.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn clones_share_reducers() {
        let reducers: Vec<BoxedReducer<Log, (), ()>> = vec![Box::new(Named("only"))];
        let combined = combine_reducers(reducers);
        let clone = combined.clone();
        let mut state = Log::default();

        clone.reduce(&mut state, (), &());

        assert_eq!(state.entries, vec!["only"]);
    }
}
