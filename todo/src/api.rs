//! Data access collaborator.
//!
//! The pipeline's only I/O boundary. Each call may reject with an [`ApiError`];
//! the effect coordinator turns the rejection into a failure intent.

use crate::types::{Todo, TodoDraft, TodoId, TodoPatch};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`TodoApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Rejections from the data access collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No stored todo has the given id
    #[error("Todo with id {0} not found")]
    NotFound(TodoId),

    /// The call failed with a message (network, server, simulated failure)
    #[error("{0}")]
    Transport(String),

    /// The call failed without saying why
    #[error("unknown error")]
    Unknown,
}

impl ApiError {
    /// The human-readable message carried by this rejection, if any
    ///
    /// An empty message counts as absent.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NotFound(_) => Some(self.to_string()),
            Self::Transport(message) if !message.is_empty() => Some(message.clone()),
            Self::Transport(_) | Self::Unknown => None,
        }
    }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        Self::Transport(message)
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        Self::Transport(message.to_string())
    }
}

/// Todo persistence as seen by the pipeline
///
/// Methods return boxed futures so the collaborator can live behind
/// `Arc<dyn TodoApi>` and be captured by effects.
pub trait TodoApi: Send + Sync {
    /// Every stored todo, in storage order
    fn fetch_all(&self) -> ApiFuture<'_, Vec<Todo>>;

    /// Stores a new todo and returns it with its assigned id
    fn create(&self, draft: TodoDraft) -> ApiFuture<'_, Todo>;

    /// Applies `updates` to the todo `id` and returns the result
    fn update(&self, id: TodoId, updates: TodoPatch) -> ApiFuture<'_, Todo>;

    /// Removes the todo `id`
    fn remove(&self, id: TodoId) -> ApiFuture<'_, ()>;

    /// Flips the completion flag of `id` and returns the result
    fn toggle(&self, id: TodoId) -> ApiFuture<'_, Todo>;
}
