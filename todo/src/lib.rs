//! Asynchronous CRUD intent pipeline for a todo list.
//!
//! Three components cooperate:
//!
//! - **Intents** ([`TodoAction`]): fifteen typed messages, a request plus its
//!   success and failure outcomes for each of fetch, add, update, delete and
//!   toggle.
//! - **State store** ([`TodoListReducer`]): a pure fold of intents into
//!   [`TodoListState`].
//! - **Effect coordinator** ([`TodoEffects`]): one [`TodoApi`] call per request
//!   intent, settled into exactly one terminal intent.
//!
//! [`todo_reducer`] combines the last two; a `Store` runs it, spawning each
//! effect as its own task and applying results in completion order.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo::{todo_reducer, InMemoryTodoApi, TodoAction, TodoEnvironment, TodoListState};
//! use todo_pipeline_core::environment::SystemClock;
//! use todo_pipeline_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(InMemoryTodoApi::new(Arc::new(SystemClock)).with_sample_data());
//! let store = Store::new(TodoListState::new(), todo_reducer(), TodoEnvironment::new(api));
//!
//! // Fetch and wait for the call to settle
//! let mut handle = store.send(TodoAction::fetch_request()).await?;
//! handle.wait().await;
//!
//! let state = store.snapshot();
//! println!("{} todos, {} active", state.count(), state.active_count());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod coordinator;
pub mod intents;
pub mod mock;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use api::{ApiError, ApiFuture, TodoApi};
pub use config::{Config, MockApiConfig};
pub use coordinator::{failure_message, todo_reducer, TodoEffects, TodoEnvironment, TodoReducer};
pub use intents::{Phase, TodoAction, Verb};
pub use mock::InMemoryTodoApi;
pub use reducer::TodoListReducer;
pub use types::{Todo, TodoDraft, TodoFilter, TodoId, TodoListState, TodoPatch};
