//! Single-shot task executor with a deadline and caller cancellation.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Deadline applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// How long a caller waits before giving up on an operation
    pub timeout: Duration,
    /// Name for logging
    pub name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            name: "bounded-executor".to_string(),
        }
    }
}

impl ExecutorConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Why a caller did not get the operation's own result.
#[derive(Debug, Error)]
pub enum ExecError<E> {
    /// The operation finished and failed; its error is passed through untouched.
    #[error("{0}")]
    Operation(E),

    /// The caller's token was cancelled before the operation finished.
    #[error("operation cancelled")]
    Cancelled,

    /// The deadline elapsed before the operation finished.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),

    /// The worker went away without handing over a result (it panicked).
    #[error("worker exited without delivering a result")]
    WorkerLost,
}

/// Executor runtime statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    pub dispatched: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub timed_out: u64,
    pub workers_lost: u64,
    /// Results produced after their caller had already stopped waiting.
    pub late_results: u64,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    completed: AtomicU64,
    cancelled: AtomicU64,
    timed_out: AtomicU64,
    workers_lost: AtomicU64,
    late_results: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ExecutorStats {
        ExecutorStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            workers_lost: self.workers_lost.load(Ordering::Relaxed),
            late_results: self.late_results.load(Ordering::Relaxed),
        }
    }
}

/// Runs one operation per call on its own tokio task and waits for it, but never
/// longer than the configured timeout and never past the caller's cancellation.
///
/// Exactly one of three outcomes reaches the caller: the operation's result, a
/// cancellation error, or a timeout error. The spawned task is neither joined nor
/// aborted when the caller stops waiting. It runs to completion and its result is
/// dropped. The operation receives no cancellation signal of its own.
///
/// The result travels over a `oneshot` channel: one slot, and `send` never blocks,
/// so a worker finishing after its caller left exits immediately.
///
/// There is no pooling, queueing or retry. Every call spawns a fresh task.
#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    config: ExecutorConfig,
    counters: Arc<Counters>,
}

impl Default for BoundedExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl BoundedExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(ExecutorConfig::default().with_timeout(timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Current executor statistics.
    pub fn stats(&self) -> ExecutorStats {
        self.counters.snapshot()
    }

    /// Dispatch `operation` and race its result against `cancel` and the deadline.
    ///
    /// `operation` must own everything it touches (`'static`), so it cannot race
    /// with the caller's state after dispatch. When the result is ready at the same
    /// time as a cancellation or the deadline, the result wins.
    pub async fn execute<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<T, ExecError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Result<T, E>>();

        let counters = Arc::clone(&self.counters);
        let name = self.config.name.clone();
        Counters::bump(&counters.dispatched);
        tokio::spawn(async move {
            let result = operation().await;
            if tx.send(result).is_err() {
                Counters::bump(&counters.late_results);
                debug!(executor = %name, "caller stopped waiting; dropping late result");
            }
        });

        let timeout = self.config.timeout;
        tokio::select! {
            biased;

            received = rx => match received {
                Ok(result) => {
                    Counters::bump(&self.counters.completed);
                    result.map_err(ExecError::Operation)
                }
                Err(_) => {
                    Counters::bump(&self.counters.workers_lost);
                    error!(executor = %self.config.name, "worker dropped its result channel");
                    Err(ExecError::WorkerLost)
                }
            },
            _ = cancel.cancelled() => {
                Counters::bump(&self.counters.cancelled);
                warn!(executor = %self.config.name, "caller cancelled; operation left running");
                Err(ExecError::Cancelled)
            }
            _ = tokio::time::sleep(timeout) => {
                Counters::bump(&self.counters.timed_out);
                warn!(
                    executor = %self.config.name,
                    ?timeout,
                    "operation timed out; operation left running"
                );
                Err(ExecError::TimedOut(timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Notify;

    #[derive(Debug, PartialEq, Eq)]
    struct Boom(&'static str);

    async fn wait_for_late_result(executor: &BoundedExecutor, expected: u64) {
        for _ in 0..200 {
            if executor.stats().late_results >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("late result was never observed: {:?}", executor.stats());
    }

    #[tokio::test]
    async fn returns_operation_value() {
        let executor = BoundedExecutor::with_timeout(Duration::from_secs(1));
        let cancel = CancellationToken::new();

        let value = executor
            .execute(&cancel, || async { Ok::<_, Boom>(41 + 1) })
            .await
            .unwrap();

        assert_eq!(value, 42);
        let stats = executor.stats();
        assert_eq!((stats.dispatched, stats.completed), (1, 1));
    }

    #[tokio::test]
    async fn passes_operation_error_through_unchanged() {
        let executor = BoundedExecutor::with_timeout(Duration::from_secs(1));
        let cancel = CancellationToken::new();

        let err = executor
            .execute(&cancel, || async { Err::<(), _>(Boom("disk full")) })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Operation(Boom("disk full"))));
    }

    #[tokio::test]
    async fn slow_operation_times_out_but_still_runs_to_completion() {
        let executor = BoundedExecutor::with_timeout(Duration::from_millis(20));
        let cancel = CancellationToken::new();
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        let err = executor
            .execute(&cancel, move || async move {
                tokio::time::sleep(Duration::from_millis(80)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, Boom>("saved")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::TimedOut(d) if d == Duration::from_millis(20)));
        assert!(!finished.load(Ordering::SeqCst));

        wait_for_late_result(&executor, 1).await;
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(executor.stats().timed_out, 1);
        assert_eq!(executor.stats().completed, 0);
    }

    #[tokio::test]
    async fn cancellation_is_distinct_from_timeout() {
        let executor = BoundedExecutor::with_timeout(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        let gate = Arc::new(Notify::new());

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let release = Arc::clone(&gate);
        let err = executor
            .execute(&cancel, move || async move {
                release.notified().await;
                Ok::<_, Boom>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Cancelled));
        assert_eq!(executor.stats().cancelled, 1);
        assert_eq!(executor.stats().timed_out, 0);

        // The abandoned worker is still parked; releasing it must not block it.
        gate.notify_one();
        wait_for_late_result(&executor, 1).await;
    }

    #[tokio::test]
    async fn already_cancelled_token_still_dispatches_the_operation() {
        let executor = BoundedExecutor::with_timeout(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        let err = executor
            .execute(&cancel, move || async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, Boom>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Cancelled));
        wait_for_late_result(&executor, 1).await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_worker_is_reported_as_lost() {
        let executor = BoundedExecutor::with_timeout(Duration::from_secs(5));
        let cancel = CancellationToken::new();

        let err = executor
            .execute(&cancel, || async {
                if true {
                    panic!("worker blew up");
                }
                Ok::<(), Boom>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::WorkerLost));
        assert_eq!(executor.stats().workers_lost, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_deadline_is_thirty_seconds() {
        let executor = BoundedExecutor::default();
        assert_eq!(executor.timeout(), DEFAULT_TIMEOUT);
        let cancel = CancellationToken::new();

        let started = tokio::time::Instant::now();
        let err = executor
            .execute(&cancel, || async {
                tokio::time::sleep(Duration::from_secs(31)).await;
                Ok::<_, Boom>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::TimedOut(_)));
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(30) && waited < Duration::from_secs(31));
    }

    #[tokio::test]
    async fn concurrent_calls_each_get_their_own_outcome() {
        let executor = BoundedExecutor::with_timeout(Duration::from_millis(50));
        let cancel = CancellationToken::new();

        let fast = executor.execute(&cancel, || async { Ok::<_, Boom>(1) });
        let slow = executor.execute(&cancel, || async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, Boom>(2)
        });
        let (fast, slow) = tokio::join!(fast, slow);

        assert_eq!(fast.unwrap(), 1);
        assert!(matches!(slow, Err(ExecError::TimedOut(_))));
        assert_eq!(executor.stats().dispatched, 2);
    }
}
