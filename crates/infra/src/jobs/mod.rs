//! Bounded, single-shot task execution.
//!
//! ## Design
//!
//! - One fresh tokio task per operation, never joined
//! - The caller races the result against its `CancellationToken` and a fixed deadline
//! - Losing the race stops the wait, not the work: the task finishes in the background
//!   and its result is dropped
//! - No pooling, queueing, retries or persistence of in-flight work
//!
//! ## Components
//!
//! - `BoundedExecutor`: dispatch + three-way race
//! - `ExecutorConfig`: timeout (30 s by default) and a name for logs
//! - `ExecError`: operation error, cancellation, timeout, lost worker

pub mod executor;

pub use executor::{BoundedExecutor, DEFAULT_TIMEOUT, ExecError, ExecutorConfig, ExecutorStats};
