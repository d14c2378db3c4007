//! Intents: the action vocabulary of the todo list.
//!
//! Every user gesture becomes a request intent; every request ends in exactly
//! one terminal intent (success or failure). The constructors below are pure
//! and never fail or validate; text is trimmed and checked by the caller.

use crate::types::{Todo, TodoDraft, TodoId, TodoPatch};
use serde::{Deserialize, Serialize};

/// The operation an intent belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    /// Load the whole list
    Fetch,
    /// Create a todo
    Add,
    /// Patch a todo
    Update,
    /// Remove a todo
    Delete,
    /// Flip a todo's completion flag
    Toggle,
}

impl Verb {
    /// Message used when a failure carries no usable message of its own
    #[must_use]
    pub const fn default_failure(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch todos",
            Self::Add => "Failed to add todo",
            Self::Update => "Failed to update todo",
            Self::Delete => "Failed to delete todo",
            Self::Toggle => "Failed to toggle todo",
        }
    }

    /// Lowercase name, used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Toggle => "toggle",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a request's lifecycle an intent sits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The request was issued
    Request,
    /// The data access call resolved
    Success,
    /// The data access call rejected
    Failure,
}

/// Intents for the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Fetch ==========
    /// Request: load every todo
    FetchRequest,
    /// Success: the full list as returned
    FetchSuccess {
        /// Todos in server order
        todos: Vec<Todo>,
    },
    /// Failure: loading the list failed
    FetchFailure {
        /// Failure message
        error: String,
    },

    // ========== Add ==========
    /// Request: create a todo
    AddRequest {
        /// Text of the new todo
        draft: TodoDraft,
    },
    /// Success: the created todo
    AddSuccess {
        /// Todo as returned, with its assigned id
        todo: Todo,
    },
    /// Failure: creating the todo failed
    AddFailure {
        /// Failure message
        error: String,
    },

    // ========== Update ==========
    /// Request: patch a todo
    UpdateRequest {
        /// Target todo
        id: TodoId,
        /// Fields to change
        updates: TodoPatch,
    },
    /// Success: the todo after the patch
    UpdateSuccess {
        /// Updated todo
        todo: Todo,
    },
    /// Failure: patching failed
    UpdateFailure {
        /// Failure message
        error: String,
    },

    // ========== Delete ==========
    /// Request: remove a todo
    DeleteRequest {
        /// Target todo
        id: TodoId,
    },
    /// Success: the id that was removed
    DeleteSuccess {
        /// Removed todo
        id: TodoId,
    },
    /// Failure: removal failed
    DeleteFailure {
        /// Failure message
        error: String,
    },

    // ========== Toggle ==========
    /// Request: flip a todo's completion flag
    ToggleRequest {
        /// Target todo
        id: TodoId,
    },
    /// Success: the todo after the flip
    ToggleSuccess {
        /// Toggled todo
        todo: Todo,
    },
    /// Failure: toggling failed
    ToggleFailure {
        /// Failure message
        error: String,
    },
}

impl TodoAction {
    /// Request to load every todo
    #[must_use]
    pub const fn fetch_request() -> Self {
        Self::FetchRequest
    }

    /// The list as received; no copy beyond the move
    #[must_use]
    pub const fn fetch_success(todos: Vec<Todo>) -> Self {
        Self::FetchSuccess { todos }
    }

    /// Loading the list failed with `error`
    #[must_use]
    pub fn fetch_failure(error: impl Into<String>) -> Self {
        Self::FetchFailure { error: error.into() }
    }

    /// Request to create a todo from `draft`
    #[must_use]
    pub const fn add_request(draft: TodoDraft) -> Self {
        Self::AddRequest { draft }
    }

    /// `todo` was created
    #[must_use]
    pub const fn add_success(todo: Todo) -> Self {
        Self::AddSuccess { todo }
    }

    /// Creating a todo failed with `error`
    #[must_use]
    pub fn add_failure(error: impl Into<String>) -> Self {
        Self::AddFailure { error: error.into() }
    }

    /// Request to apply `updates` to the todo `id`
    #[must_use]
    pub fn update_request(id: impl Into<TodoId>, updates: TodoPatch) -> Self {
        Self::UpdateRequest {
            id: id.into(),
            updates,
        }
    }

    /// `todo` was updated
    #[must_use]
    pub const fn update_success(todo: Todo) -> Self {
        Self::UpdateSuccess { todo }
    }

    /// Updating a todo failed with `error`
    #[must_use]
    pub fn update_failure(error: impl Into<String>) -> Self {
        Self::UpdateFailure { error: error.into() }
    }

    /// Request to remove the todo `id`
    #[must_use]
    pub fn delete_request(id: impl Into<TodoId>) -> Self {
        Self::DeleteRequest { id: id.into() }
    }

    /// The todo `id` was removed
    #[must_use]
    pub fn delete_success(id: impl Into<TodoId>) -> Self {
        Self::DeleteSuccess { id: id.into() }
    }

    /// Removing a todo failed with `error`
    #[must_use]
    pub fn delete_failure(error: impl Into<String>) -> Self {
        Self::DeleteFailure { error: error.into() }
    }

    /// Request to flip the completion flag of `id`
    #[must_use]
    pub fn toggle_request(id: impl Into<TodoId>) -> Self {
        Self::ToggleRequest { id: id.into() }
    }

    /// `todo` was toggled
    #[must_use]
    pub const fn toggle_success(todo: Todo) -> Self {
        Self::ToggleSuccess { todo }
    }

    /// Toggling a todo failed with `error`
    #[must_use]
    pub fn toggle_failure(error: impl Into<String>) -> Self {
        Self::ToggleFailure { error: error.into() }
    }

    /// The failure intent for `verb`
    #[must_use]
    pub fn failure(verb: Verb, error: impl Into<String>) -> Self {
        match verb {
            Verb::Fetch => Self::fetch_failure(error),
            Verb::Add => Self::add_failure(error),
            Verb::Update => Self::update_failure(error),
            Verb::Delete => Self::delete_failure(error),
            Verb::Toggle => Self::toggle_failure(error),
        }
    }

    /// The operation this intent belongs to
    #[must_use]
    pub const fn verb(&self) -> Verb {
        match self {
            Self::FetchRequest | Self::FetchSuccess { .. } | Self::FetchFailure { .. } => {
                Verb::Fetch
            },
            Self::AddRequest { .. } | Self::AddSuccess { .. } | Self::AddFailure { .. } => {
                Verb::Add
            },
            Self::UpdateRequest { .. }
            | Self::UpdateSuccess { .. }
            | Self::UpdateFailure { .. } => Verb::Update,
            Self::DeleteRequest { .. }
            | Self::DeleteSuccess { .. }
            | Self::DeleteFailure { .. } => Verb::Delete,
            Self::ToggleRequest { .. }
            | Self::ToggleSuccess { .. }
            | Self::ToggleFailure { .. } => Verb::Toggle,
        }
    }

    /// Request, success or failure
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::FetchRequest
            | Self::AddRequest { .. }
            | Self::UpdateRequest { .. }
            | Self::DeleteRequest { .. }
            | Self::ToggleRequest { .. } => Phase::Request,
            Self::FetchSuccess { .. }
            | Self::AddSuccess { .. }
            | Self::UpdateSuccess { .. }
            | Self::DeleteSuccess { .. }
            | Self::ToggleSuccess { .. } => Phase::Success,
            Self::FetchFailure { .. }
            | Self::AddFailure { .. }
            | Self::UpdateFailure { .. }
            | Self::DeleteFailure { .. }
            | Self::ToggleFailure { .. } => Phase::Failure,
        }
    }

    /// Whether this intent starts a request
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self.phase(), Phase::Request)
    }

    /// Whether this intent ends a request
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_request()
    }

    /// The failure message, for failure intents
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::FetchFailure { error }
            | Self::AddFailure { error }
            | Self::UpdateFailure { error }
            | Self::DeleteFailure { error }
            | Self::ToggleFailure { error } => Some(error),
            _ => None,
        }
    }
}
