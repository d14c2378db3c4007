//! # Todo Pipeline Testing
//!
//! Testing utilities for the todo intent pipeline.
//!
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Effect assertions
//! - [`effects`]: Drive returned effects to completion without a store
//! - [`mocks`]: Deterministic environment implementations
//!
//! # Example
//!
//! ```
//! use todo_pipeline_testing::mocks::FixedClock;
//! use todo_pipeline_core::environment::Clock;
//! use chrono::Utc;
//!
//! let clock = FixedClock::new(Utc::now());
//! assert_eq!(clock.now(), clock.now());
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use todo_pipeline_core::environment::Clock;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Mutex, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read
    ///
    /// Useful where creation and mutation timestamps must differ.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` per call to `now()`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a stepping clock starting at [`epoch`] that advances one second per read
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch(), Duration::seconds(1))
    }
}

/// Helpers for running the effects a reducer returned.
pub mod effects {
    use futures::future::{join_all, BoxFuture};
    use todo_pipeline_core::effect::Effect;

    fn flatten<A>(effect: Effect<A>, out: &mut Vec<BoxFuture<'static, Option<A>>>) {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                for effect in effects {
                    flatten(effect, out);
                }
            },
            Effect::Future(fut) => out.push(fut),
        }
    }

    /// Run every effect concurrently and collect the actions they produce
    ///
    /// Actions are returned in effect order, not completion order.
    pub async fn run_effects<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut futures = Vec::new();
        for effect in effects {
            flatten(effect, &mut futures);
        }

        join_all(futures).await.into_iter().flatten().collect()
    }
}

/// Install a test `tracing` subscriber once (honours `RUST_LOG`).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{stepping_clock, test_clock, FixedClock, SteppingClock};
