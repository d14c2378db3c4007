//! Integration tests for the todo pipeline running inside a Store
//!
//! These drive request intents through the combined reducer, let the spawned
//! effects call a backend, and check the snapshots the Store publishes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use todo::{
    todo_reducer, ApiError, ApiFuture, InMemoryTodoApi, MockApiConfig, Phase, Todo, TodoAction,
    TodoApi, TodoDraft, TodoEnvironment, TodoFilter, TodoId, TodoListState, TodoPatch, TodoReducer,
    Verb,
};
use todo_pipeline_runtime::{Store, StoreError};
use todo_pipeline_testing::{init_test_tracing, mocks::epoch, test_clock};

type TodoStore = Store<TodoListState, TodoAction, TodoEnvironment, TodoReducer>;

const SETTLE: Duration = Duration::from_secs(5);

fn store_with(api: Arc<dyn TodoApi>) -> TodoStore {
    init_test_tracing();
    Store::new(TodoListState::new(), todo_reducer(), TodoEnvironment::new(api))
}

fn mock(config: MockApiConfig) -> InMemoryTodoApi {
    InMemoryTodoApi::with_config(Arc::new(test_clock()), config)
}

async fn settle(store: &TodoStore, action: TodoAction) -> Arc<TodoListState> {
    let mut handle = store.send(action).await.unwrap();
    handle.wait_with_timeout(SETTLE).await.unwrap();
    store.snapshot()
}

/// Backend with a canned list and per-operation delays
struct CannedApi {
    listed: Vec<Todo>,
    fetch_delay: Duration,
    write_delay: Duration,
}

impl TodoApi for CannedApi {
    fn fetch_all(&self) -> ApiFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            tokio::time::sleep(self.fetch_delay).await;
            Ok(self.listed.clone())
        })
    }

    fn create(&self, draft: TodoDraft) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            tokio::time::sleep(self.write_delay).await;
            Ok(Todo::new("created", draft.text, epoch()))
        })
    }

    fn update(&self, id: TodoId, _updates: TodoPatch) -> ApiFuture<'_, Todo> {
        Box::pin(async move { Err(ApiError::NotFound(id)) })
    }

    fn remove(&self, _id: TodoId) -> ApiFuture<'_, ()> {
        Box::pin(async { Err(ApiError::Unknown) })
    }

    fn toggle(&self, id: TodoId) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            tokio::time::sleep(self.write_delay).await;
            Ok(Todo::new(id, "toggled", epoch()).with_completed(true))
        })
    }
}

#[tokio::test]
async fn test_fetch_loads_todos() {
    let api = mock(MockApiConfig::instant().with_latency_ms(100))
        .with_todos(vec![Todo::new("1", "buy milk", epoch())]);
    let store = store_with(Arc::new(api));

    let mut handle = store.send(TodoAction::fetch_request()).await.unwrap();

    let pending = store.snapshot();
    assert!(pending.todos.is_empty());
    assert!(pending.loading);
    assert_eq!(pending.error, None);

    handle.wait_with_timeout(SETTLE).await.unwrap();

    let settled = store.snapshot();
    assert_eq!(settled.todos, vec![Todo::new("1", "buy milk", epoch())]);
    assert!(!settled.loading);
    assert_eq!(settled.error, None);
}

#[tokio::test]
async fn test_failed_add_keeps_todos_and_records_error() {
    let store = store_with(Arc::new(mock(MockApiConfig::instant().with_failure_rate(1.0))));

    let state = settle(&store, TodoAction::add_request(TodoDraft::new("walk dog"))).await;

    assert!(state.todos.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Simulated network failure"));
}

#[tokio::test]
async fn test_full_crud_cycle() {
    let store = store_with(Arc::new(mock(MockApiConfig::instant())));

    settle(&store, TodoAction::add_request(TodoDraft::new("buy milk"))).await;
    let state = settle(&store, TodoAction::add_request(TodoDraft::new("walk dog"))).await;
    assert_eq!(state.count(), 2);
    let (first, second) = (state.todos[0].id.clone(), state.todos[1].id.clone());

    let state = settle(&store, TodoAction::toggle_request(first.clone())).await;
    assert_eq!(state.todos[0].id, first, "toggle keeps position");
    assert!(state.todos[0].completed);
    assert_eq!(state.completed_count(), 1);

    let rename = TodoAction::update_request(second.clone(), TodoPatch::text("walk cat"));
    let state = settle(&store, rename).await;
    assert_eq!(state.todos[1].text, "walk cat");
    assert_eq!(
        state.visible(TodoFilter::Active).map(|t| t.id.clone()).collect::<Vec<_>>(),
        vec![second]
    );

    let state = settle(&store, TodoAction::delete_request(first)).await;
    assert_eq!(state.count(), 1);
    assert_eq!(state.todos[0].text, "walk cat");

    // A fresh fetch agrees with what the pipeline applied
    let fetched = settle(&store, TodoAction::fetch_request()).await;
    assert_eq!(fetched.todos, state.todos);
    assert!(!fetched.loading);
    assert_eq!(fetched.error, None);
}

#[tokio::test]
async fn test_toggle_of_unknown_id_reports_not_found() {
    let store = store_with(Arc::new(mock(MockApiConfig::instant())));

    let state = settle(&store, TodoAction::toggle_request("42")).await;

    assert_eq!(state.error.as_deref(), Some("Todo with id 42 not found"));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_rejection_without_message_uses_default() {
    let api = CannedApi {
        listed: vec![],
        fetch_delay: Duration::ZERO,
        write_delay: Duration::ZERO,
    };
    let store = store_with(Arc::new(api));

    let state = settle(&store, TodoAction::delete_request("1")).await;

    assert_eq!(state.error.as_deref(), Some("Failed to delete todo"));
}

#[tokio::test]
async fn test_new_request_clears_error_immediately() {
    let store = store_with(Arc::new(mock(
        MockApiConfig::instant().with_latency_ms(100).with_failure_rate(1.0),
    )));

    let failed = settle(&store, TodoAction::fetch_request()).await;
    assert!(failed.error.is_some());

    let mut handle = store.send(TodoAction::fetch_request()).await.unwrap();
    let retrying = store.snapshot();
    assert!(retrying.loading);
    assert_eq!(retrying.error, None);

    handle.wait_with_timeout(SETTLE).await.unwrap();
    assert!(store.snapshot().error.is_some());
}

#[tokio::test]
async fn test_results_apply_in_completion_order() {
    let api = CannedApi {
        listed: vec![Todo::new("1", "buy milk", epoch())],
        fetch_delay: Duration::from_millis(150),
        write_delay: Duration::ZERO,
    };
    let store = store_with(Arc::new(api));
    let mut observed = store.subscribe_actions();

    let mut fetch = store.send(TodoAction::fetch_request()).await.unwrap();
    let mut add = store.send(TodoAction::add_request(TodoDraft::new("walk dog"))).await.unwrap();

    add.wait_with_timeout(SETTLE).await.unwrap();
    let after_add = store.snapshot();
    assert_eq!(after_add.todos, vec![Todo::new("created", "walk dog", epoch())]);
    assert!(!after_add.loading, "one flag for all requests: any terminal intent clears it");

    // The slower fetch lands last and replaces the whole list
    fetch.wait_with_timeout(SETTLE).await.unwrap();
    let after_fetch = store.snapshot();
    assert_eq!(after_fetch.todos, vec![Todo::new("1", "buy milk", epoch())]);

    let mut kinds = Vec::new();
    while let Ok(action) = observed.try_recv() {
        kinds.push((action.verb(), action.phase()));
    }
    assert_eq!(
        kinds,
        vec![
            (Verb::Fetch, Phase::Request),
            (Verb::Add, Phase::Request),
            (Verb::Add, Phase::Success),
            (Verb::Fetch, Phase::Success),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_adds_all_land() {
    let store = store_with(Arc::new(mock(MockApiConfig::instant().with_latency_ms(10))));

    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut handle = store
                    .send(TodoAction::add_request(TodoDraft::new(format!("task {i}"))))
                    .await
                    .unwrap();
                handle.wait_with_timeout(SETTLE).await.unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.expect("add task panicked");
    }

    let state = store.snapshot();
    assert_eq!(state.count(), 10);
    assert!(!state.loading);

    let mut ids: Vec<_> = state.todos.iter().map(|t| t.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10, "ids are unique");
}

#[tokio::test]
async fn test_send_and_wait_for_terminal_intent() {
    let store = store_with(Arc::new(mock(MockApiConfig::instant())));

    let terminal = store
        .send_and_wait_for(
            TodoAction::add_request(TodoDraft::new("buy milk")),
            TodoAction::is_terminal,
            SETTLE,
        )
        .await
        .unwrap();

    let TodoAction::AddSuccess { todo } = terminal else {
        unreachable!("add against a healthy backend succeeds, got {terminal:?}");
    };
    assert_eq!(todo.text, "buy milk");
    assert_eq!(store.snapshot().todos, vec![todo]);
}

#[tokio::test]
async fn test_unchanged_state_keeps_snapshot() {
    let api = mock(MockApiConfig::instant()).with_sample_data();
    let store = store_with(Arc::new(api));
    let settled = settle(&store, TodoAction::fetch_request()).await;

    // Nothing to delete: the value is unchanged, so is the snapshot
    let _ = store.send(TodoAction::delete_success("missing")).await.unwrap();
    assert!(Arc::ptr_eq(&settled, &store.snapshot()));

    let _ = store.send(TodoAction::delete_success("1")).await.unwrap();
    assert!(!Arc::ptr_eq(&settled, &store.snapshot()));
}

#[tokio::test]
async fn test_subscribers_see_settled_state() {
    let api = mock(MockApiConfig::instant()).with_sample_data();
    let store = store_with(Arc::new(api));
    let mut snapshots = store.subscribe();

    settle(&store, TodoAction::fetch_request()).await;

    assert!(snapshots.has_changed().unwrap());
    let latest = snapshots.borrow_and_update().clone();
    assert_eq!(latest.count(), 3);
    assert_eq!(latest.active_count(), 2);
}

#[tokio::test]
async fn test_shutdown_lets_in_flight_requests_settle() {
    let store = store_with(Arc::new(
        mock(MockApiConfig::instant().with_latency_ms(50)).with_sample_data(),
    ));

    let _ = store.send(TodoAction::fetch_request()).await.unwrap();
    store.shutdown(SETTLE).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.count(), 3);
    assert!(!state.loading);

    let rejected = store.send(TodoAction::fetch_request()).await;
    assert_eq!(rejected.unwrap_err(), StoreError::ShutdownInProgress);
}

/// Backend whose calls never settle
struct StalledApi;

impl TodoApi for StalledApi {
    fn fetch_all(&self) -> ApiFuture<'_, Vec<Todo>> {
        Box::pin(std::future::pending())
    }

    fn create(&self, _draft: TodoDraft) -> ApiFuture<'_, Todo> {
        Box::pin(std::future::pending())
    }

    fn update(&self, _id: TodoId, _updates: TodoPatch) -> ApiFuture<'_, Todo> {
        Box::pin(std::future::pending())
    }

    fn remove(&self, _id: TodoId) -> ApiFuture<'_, ()> {
        Box::pin(std::future::pending())
    }

    fn toggle(&self, _id: TodoId) -> ApiFuture<'_, Todo> {
        Box::pin(std::future::pending())
    }
}

#[tokio::test]
async fn test_unsettled_call_keeps_loading() {
    let store = store_with(Arc::new(StalledApi));

    let mut handle = store.send(TodoAction::fetch_request()).await.unwrap();
    let waited = handle.wait_with_timeout(Duration::from_millis(100)).await;

    assert_eq!(waited, Err(StoreError::Timeout));
    assert_eq!(handle.pending(), 1);

    let state = store.snapshot();
    assert!(state.loading);
    assert_eq!(state.error, None);
    assert!(state.todos.is_empty());
}
