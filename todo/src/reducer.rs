//! State store for the todo list.
//!
//! A pure fold of intents into [`TodoListState`]. It never performs I/O and
//! returns no effects; the [`TodoEffects`](crate::TodoEffects) coordinator
//! reacts to the same intents separately.

use crate::coordinator::TodoEnvironment;
use crate::intents::TodoAction;
use crate::types::{Todo, TodoId, TodoListState};
use todo_pipeline_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Reducer for the todo list state
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoListReducer;

impl TodoListReducer {
    /// Creates a new `TodoListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies one intent to the state
    ///
    /// Total over every intent: unknown targets are ignored, never an error.
    pub fn apply(state: &mut TodoListState, action: TodoAction) {
        match action {
            TodoAction::FetchRequest
            | TodoAction::AddRequest { .. }
            | TodoAction::UpdateRequest { .. }
            | TodoAction::DeleteRequest { .. }
            | TodoAction::ToggleRequest { .. } => {
                state.loading = true;
                state.error = None;
            },

            TodoAction::FetchSuccess { todos } => {
                state.todos = todos;
                Self::settle(state);
            },
            TodoAction::AddSuccess { todo } => {
                state.todos.push(todo);
                Self::settle(state);
            },
            TodoAction::UpdateSuccess { todo } | TodoAction::ToggleSuccess { todo } => {
                Self::replace(&mut state.todos, &todo);
                Self::settle(state);
            },
            TodoAction::DeleteSuccess { id } => {
                Self::remove(&mut state.todos, &id);
                Self::settle(state);
            },

            TodoAction::FetchFailure { error }
            | TodoAction::AddFailure { error }
            | TodoAction::UpdateFailure { error }
            | TodoAction::DeleteFailure { error }
            | TodoAction::ToggleFailure { error } => {
                state.loading = false;
                state.error = Some(error);
            },
        }
    }

    fn settle(state: &mut TodoListState) {
        state.loading = false;
        state.error = None;
    }

    /// Replaces every todo with `todo.id` in place; no match leaves the list as is.
    fn replace(todos: &mut [Todo], todo: &Todo) {
        let mut matched = false;
        for slot in todos.iter_mut().filter(|t| t.id == todo.id) {
            slot.clone_from(todo);
            matched = true;
        }
        if !matched {
            tracing::debug!(id = %todo.id, "Updated todo is not in the list, ignoring");
        }
    }

    fn remove(todos: &mut Vec<Todo>, id: &TodoId) {
        todos.retain(|t| &t.id != id);
    }
}

impl Reducer for TodoListReducer {
    type State = TodoListState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        Self::apply(state, action);
        SmallVec::new()
    }
}
