//! Effect coordinator for the todo list.
//!
//! For every request intent the coordinator returns one `Effect::Future` that
//! makes exactly one data access call and yields exactly one terminal intent.
//! Requests are independent: nothing is queued, deduplicated, cancelled or
//! retried, and results are applied in the order the calls settle.

use crate::api::{ApiError, TodoApi};
use crate::intents::{TodoAction, Verb};
use crate::reducer::TodoListReducer;
use crate::types::TodoListState;
use std::sync::Arc;
use todo_pipeline_core::composition::{combine_reducers, BoxedReducer, CombinedReducer};
use todo_pipeline_core::{effect::Effect, reducer::Reducer, SmallVec};
use tracing::Instrument;

/// Environment dependencies for the todo reducers
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Data access collaborator
    pub api: Arc<dyn TodoApi>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Message stored in the state for a rejected call
///
/// The rejection's own message wins; without one the verb's default is used.
#[must_use]
pub fn failure_message(error: &ApiError, verb: Verb) -> String {
    error
        .message()
        .unwrap_or_else(|| verb.default_failure().to_string())
}

/// Turns a settled call into its terminal intent
fn settle<T>(
    verb: Verb,
    result: Result<T, ApiError>,
    on_success: impl FnOnce(T) -> TodoAction,
) -> TodoAction {
    match result {
        Ok(value) => {
            tracing::debug!("Data access call resolved");
            on_success(value)
        },
        Err(error) => {
            let message = failure_message(&error, verb);
            tracing::warn!(error = %error, message = %message, "Data access call rejected");
            TodoAction::failure(verb, message)
        },
    }
}

/// Effect-only reducer: one data access call per request intent
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoEffects;

impl TodoEffects {
    /// Creates a new `TodoEffects`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The effect for `action`, if it is a request
    #[must_use]
    pub fn effect_for(action: &TodoAction, env: &TodoEnvironment) -> Option<Effect<TodoAction>> {
        if !action.is_request() {
            return None;
        }

        let api = Arc::clone(&env.api);
        let verb = action.verb();
        let span = tracing::debug_span!("todo_request", verb = %verb);

        let effect = match action {
            TodoAction::FetchRequest => Effect::future(
                async move { settle(verb, api.fetch_all().await, TodoAction::fetch_success) }
                    .instrument(span),
            ),
            TodoAction::AddRequest { draft } => {
                let draft = draft.clone();
                Effect::future(
                    async move { settle(verb, api.create(draft).await, TodoAction::add_success) }
                        .instrument(span),
                )
            },
            TodoAction::UpdateRequest { id, updates } => {
                let (id, updates) = (id.clone(), updates.clone());
                Effect::future(
                    async move {
                        let result = api.update(id, updates).await;
                        settle(verb, result, TodoAction::update_success)
                    }
                    .instrument(span),
                )
            },
            TodoAction::DeleteRequest { id } => {
                let id = id.clone();
                Effect::future(
                    async move {
                        // Success carries the requested id, not the call's return value.
                        let result = api.remove(id.clone()).await;
                        settle(verb, result, |()| TodoAction::delete_success(id))
                    }
                    .instrument(span),
                )
            },
            TodoAction::ToggleRequest { id } => {
                let id = id.clone();
                Effect::future(
                    async move { settle(verb, api.toggle(id).await, TodoAction::toggle_success) }
                        .instrument(span),
                )
            },
            TodoAction::FetchSuccess { .. }
            | TodoAction::FetchFailure { .. }
            | TodoAction::AddSuccess { .. }
            | TodoAction::AddFailure { .. }
            | TodoAction::UpdateSuccess { .. }
            | TodoAction::UpdateFailure { .. }
            | TodoAction::DeleteSuccess { .. }
            | TodoAction::DeleteFailure { .. }
            | TodoAction::ToggleSuccess { .. }
            | TodoAction::ToggleFailure { .. } => return None,
        };

        tracing::debug!(verb = %verb, "Issuing data access call");
        Some(effect)
    }
}

impl Reducer for TodoEffects {
    type State = TodoListState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        _state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        Self::effect_for(&action, env).into_iter().collect()
    }
}

/// The reducer a todo store runs: state transitions, then request effects
pub type TodoReducer = CombinedReducer<TodoListState, TodoAction, TodoEnvironment>;

/// Builds the [`TodoReducer`]
#[must_use]
pub fn todo_reducer() -> TodoReducer {
    let reducers: Vec<BoxedReducer<TodoListState, TodoAction, TodoEnvironment>> =
        vec![Box::new(TodoListReducer::new()), Box::new(TodoEffects::new())];
    combine_reducers(reducers)
}
