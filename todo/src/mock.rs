//! In-memory data access backend.
//!
//! Stands in for a remote todo service: calls wait for a configurable latency
//! (plus up to 50% random jitter) and reject at a configurable rate.

use crate::api::{ApiError, ApiFuture, TodoApi};
use crate::config::{clamp_rate, MockApiConfig};
use crate::types::{Todo, TodoDraft, TodoId, TodoPatch};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todo_pipeline_core::environment::Clock;
use tokio::sync::RwLock;

/// Message of injected failures
pub const SIMULATED_FAILURE: &str = "Simulated network failure";

/// In-memory [`TodoApi`] with simulated latency and failures
pub struct InMemoryTodoApi {
    todos: RwLock<Vec<Todo>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
    config: MockApiConfig,
}

impl InMemoryTodoApi {
    /// Empty backend that answers immediately and never fails
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, MockApiConfig::instant())
    }

    /// Empty backend with the given latency and failure rate
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: MockApiConfig) -> Self {
        let config = MockApiConfig {
            failure_rate: clamp_rate(config.failure_rate),
            ..config
        };
        Self {
            todos: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            clock,
            config,
        }
    }

    /// Replaces the stored todos
    ///
    /// New ids continue after the largest numeric id present.
    #[must_use]
    pub fn with_todos(self, todos: Vec<Todo>) -> Self {
        let next_id = todos
            .iter()
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        Self {
            todos: RwLock::new(todos),
            next_id: AtomicU64::new(next_id),
            ..self
        }
    }

    /// Seeds a few sample todos, created "now"
    #[must_use]
    pub fn with_sample_data(self) -> Self {
        let now = self.clock.now();
        self.with_todos(vec![
            Todo::new("1", "Learn the intent pipeline", now),
            Todo::new("2", "Write reducer tests", now).with_completed(true),
            Todo::new("3", "Ship the demo", now),
        ])
    }

    /// Copy of the stored todos
    pub async fn stored(&self) -> Vec<Todo> {
        self.todos.read().await.clone()
    }

    fn next_id(&self) -> TodoId {
        TodoId::new(self.next_id.fetch_add(1, Ordering::Relaxed).to_string())
    }

    /// Waits out the simulated latency, then decides whether the call fails
    async fn round_trip(&self, operation: &'static str) -> Result<(), ApiError> {
        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            let base = self.config.latency_ms;
            let jitter = if base == 0 { 0 } else { rng.gen_range(0..=base / 2) };
            (base.saturating_add(jitter), rng.gen_bool(self.config.failure_rate))
        };

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if fail {
            tracing::warn!(operation, "Injecting simulated failure");
            return Err(ApiError::from(SIMULATED_FAILURE));
        }

        tracing::trace!(operation, delay_ms, "Mock call served");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryTodoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTodoApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TodoApi for InMemoryTodoApi {
    fn fetch_all(&self) -> ApiFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            self.round_trip("fetch_all").await?;
            Ok(self.stored().await)
        })
    }

    fn create(&self, draft: TodoDraft) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            self.round_trip("create").await?;
            let todo = Todo::new(self.next_id(), draft.text, self.clock.now());
            self.todos.write().await.push(todo.clone());
            Ok(todo)
        })
    }

    fn update(&self, id: TodoId, updates: TodoPatch) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            self.round_trip("update").await?;
            let mut todos = self.todos.write().await;
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ApiError::NotFound(id.clone()))?;
            updates.apply(todo, self.clock.now());
            Ok(todo.clone())
        })
    }

    fn remove(&self, id: TodoId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.round_trip("remove").await?;
            let mut todos = self.todos.write().await;
            let index = todos
                .iter()
                .position(|t| t.id == id)
                .ok_or(ApiError::NotFound(id))?;
            todos.remove(index);
            Ok(())
        })
    }

    fn toggle(&self, id: TodoId) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            self.round_trip("toggle").await?;
            let mut todos = self.todos.write().await;
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ApiError::NotFound(id.clone()))?;
            todo.completed = !todo.completed;
            todo.updated_at = Some(self.clock.now());
            Ok(todo.clone())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_pipeline_testing::{mocks::epoch, stepping_clock, test_clock};

    fn api() -> InMemoryTodoApi {
        InMemoryTodoApi::new(Arc::new(test_clock()))
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let api = api();

        let first = api.create(TodoDraft::new("a")).await.unwrap();
        let second = api.create(TodoDraft::new("b")).await.unwrap();

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert_eq!(first.created_at, epoch());
        assert!(!first.completed);
        assert_eq!(api.fetch_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_todos() {
        let api = api().with_sample_data();
        let todo = api.create(TodoDraft::new("d")).await.unwrap();
        assert_eq!(todo.id.as_str(), "4");
        assert_eq!(api.stored().await.len(), 4);
    }

    #[tokio::test]
    async fn seeding_the_largest_id_does_not_overflow() {
        let top = Todo::new(u64::MAX.to_string(), "last", epoch());
        let api = api().with_todos(vec![top.clone()]);
        assert_eq!(api.stored().await, vec![top]);
    }

    #[tokio::test]
    async fn toggle_flips_and_stamps() {
        let api = InMemoryTodoApi::new(Arc::new(stepping_clock()));
        let todo = api.create(TodoDraft::new("a")).await.unwrap();

        let toggled = api.toggle(todo.id.clone()).await.unwrap();
        assert!(toggled.completed);
        assert!(toggled.updated_at.is_some_and(|at| at > todo.created_at));

        let toggled_back = api.toggle(todo.id).await.unwrap();
        assert!(!toggled_back.completed);
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let api = api();
        let todo = api.create(TodoDraft::new("a")).await.unwrap();

        let updated = api.update(todo.id.clone(), TodoPatch::text("b")).await.unwrap();

        assert_eq!(updated.text, "b");
        assert_eq!(updated.id, todo.id);
        assert_eq!(api.stored().await, vec![updated]);
    }

    #[tokio::test]
    async fn remove_deletes_by_id() {
        let api = api().with_sample_data();
        api.remove(TodoId::from("2")).await.unwrap();

        let ids: Vec<_> = api.stored().await.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TodoId::from("1"), TodoId::from("3")]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let api = api();
        let missing = TodoId::from("9");

        assert_eq!(api.toggle(missing.clone()).await, Err(ApiError::NotFound(missing.clone())));
        assert_eq!(
            api.update(missing.clone(), TodoPatch::completed(true)).await,
            Err(ApiError::NotFound(missing.clone()))
        );
        assert_eq!(api.remove(missing.clone()).await, Err(ApiError::NotFound(missing)));
    }

    #[tokio::test]
    async fn failure_rate_one_always_rejects() {
        let api = InMemoryTodoApi::with_config(
            Arc::new(test_clock()),
            MockApiConfig::instant().with_failure_rate(1.0),
        );

        let error = api.create(TodoDraft::new("a")).await.unwrap_err();
        assert_eq!(error.message().as_deref(), Some(SIMULATED_FAILURE));
        assert!(api.stored().await.is_empty(), "a rejected call must not mutate storage");
    }

    #[tokio::test]
    async fn latency_delays_the_call() {
        let api = InMemoryTodoApi::with_config(
            Arc::new(test_clock()),
            MockApiConfig::instant().with_latency_ms(20),
        );

        let started = std::time::Instant::now();
        api.fetch_all().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
