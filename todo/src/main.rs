//! Command-line demo of the todo intent pipeline.
//!
//! Drives a full fetch / add / toggle / update / delete cycle against the
//! in-memory backend and prints the state after every settled request.
//! Latency, failure rate and seeding are read from the environment
//! (`TODO_API_LATENCY_MS`, `TODO_API_FAILURE_RATE`, `TODO_SEED_SAMPLE_DATA`),
//! as is the filter of the final listing (`TODO_FILTER`).

use std::sync::Arc;
use todo::{
    todo_reducer, Config, InMemoryTodoApi, TodoAction, TodoDraft, TodoEnvironment, TodoFilter,
    TodoListState, TodoPatch, TodoReducer,
};
use todo_pipeline_core::environment::SystemClock;
use todo_pipeline_runtime::{Store, StoreError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type TodoStore = Store<TodoListState, TodoAction, TodoEnvironment, TodoReducer>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    println!("=== Todo Intent Pipeline ===\n");
    tracing::info!(
        latency_ms = config.api.latency_ms,
        failure_rate = config.api.failure_rate,
        seed = config.seed_sample_data,
        "Starting demo"
    );

    let mut api = InMemoryTodoApi::with_config(Arc::new(SystemClock), config.api.clone());
    if config.seed_sample_data {
        api = api.with_sample_data();
    }
    let store = Store::new(
        TodoListState::new(),
        todo_reducer(),
        TodoEnvironment::new(Arc::new(api)),
    );

    // Log every applied intent
    let mut actions = store.subscribe_actions();
    let observer = tokio::spawn(async move {
        while let Ok(action) = actions.recv().await {
            tracing::debug!(verb = %action.verb(), phase = ?action.phase(), "Intent applied");
        }
    });

    println!("Fetching todos...");
    let state = settle(&store, TodoAction::fetch_request()).await?;
    print_state(&state, TodoFilter::All);

    println!("\nAdding two todos...");
    settle(&store, TodoAction::add_request(TodoDraft::new("Buy milk"))).await?;
    let draft = TodoDraft::new("Write documentation");
    let state = settle(&store, TodoAction::add_request(draft)).await?;
    print_state(&state, TodoFilter::All);

    if let Some(first) = state.todos.first() {
        println!("\nToggling '{}'...", first.text);
        let state = settle(&store, TodoAction::toggle_request(first.id.clone())).await?;
        print_state(&state, TodoFilter::Completed);
    }

    if let Some(last) = state.todos.last() {
        println!("\nRenaming '{}'...", last.text);
        let patch = TodoPatch::text(format!("{} (edited)", last.text));
        let state = settle(&store, TodoAction::update_request(last.id.clone(), patch)).await?;
        print_state(&state, TodoFilter::Active);

        println!("\nDeleting '{}'...", last.id);
        let state = settle(&store, TodoAction::delete_request(last.id.clone())).await?;
        print_state(&state, TodoFilter::All);
    }

    println!("\nToggling a todo that does not exist...");
    let state = settle(&store, TodoAction::toggle_request("missing")).await?;
    print_state(&state, config.filter);

    store.shutdown_default().await?;
    observer.abort();

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Sends a request, waits for its terminal intent and returns the snapshot
async fn settle(store: &TodoStore, action: TodoAction) -> Result<Arc<TodoListState>, StoreError> {
    let mut handle = store.send(action).await?;
    println!("  loading: {}", store.snapshot().loading);
    handle.wait().await;
    Ok(store.snapshot())
}

fn print_state(state: &TodoListState, filter: TodoFilter) {
    if let Some(error) = &state.error {
        println!("  error: {error}");
    }

    println!(
        "  {} todos ({} active, {} completed), showing {filter}:",
        state.count(),
        state.active_count(),
        state.completed_count()
    );
    for todo in state.visible(filter) {
        let status = if todo.completed { "✓" } else { " " };
        println!("    [{status}] {} {}", todo.id, todo.text);
    }
}
