//! Task runner — join-all execution of independent tasks plus a detached
//! fire-and-forget mode.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use litera_core::error::AppError;
use litera_core::result::AppResult;

use crate::monitor::ExecutionMonitor;

/// A boxed unit of work accepted by [`TaskRunner::run_concurrently`].
pub type TaskFuture<T> = BoxFuture<'static, AppResult<T>>;

/// Runs independent units of work on the tokio runtime.
///
/// Two modes:
/// - `run_concurrently` spawns every task and blocks the caller until all of
///   them resolve (a deliberate join barrier, bounded by `join_timeout`)
/// - `run_detached` spawns a task the caller never waits on; its failure is
///   logged and counted but never propagated
#[derive(Clone)]
pub struct TaskRunner {
    /// Shared activity counters.
    monitor: Arc<ExecutionMonitor>,
    /// Upper bound on any `run_concurrently` join.
    join_timeout: Duration,
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("join_timeout", &self.join_timeout)
            .finish()
    }
}

impl TaskRunner {
    /// Create a new task runner.
    pub fn new(monitor: Arc<ExecutionMonitor>, join_timeout: Duration) -> Self {
        Self {
            monitor,
            join_timeout,
        }
    }

    /// Run every task concurrently and wait for all of them.
    ///
    /// Results are returned in the order the tasks were supplied, not the
    /// order they completed in. The first task error is propagated after the
    /// join; a panicked task surfaces as an internal error. If the join does
    /// not resolve within `join_timeout` the call fails closed with a
    /// service-unavailable error and the caller must not proceed.
    pub async fn run_concurrently<T>(&self, tasks: Vec<TaskFuture<T>>) -> AppResult<Vec<T>>
    where
        T: Send + 'static,
    {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                self.monitor.task_started();
                let monitor = Arc::clone(&self.monitor);
                tokio::spawn(async move {
                    let result = task.await;
                    match &result {
                        Ok(_) => monitor.task_completed(),
                        Err(_) => monitor.task_failed(),
                    }
                    result
                })
            })
            .collect();

        let join_all = async {
            let mut results = Vec::with_capacity(handles.len());
            for handle in handles {
                let value = handle
                    .await
                    .map_err(|e| AppError::internal(format!("Concurrent task panicked: {e}")))??;
                results.push(value);
            }
            Ok::<_, AppError>(results)
        };

        tokio::time::timeout(self.join_timeout, join_all)
            .await
            .map_err(|_| {
                AppError::service_unavailable(format!(
                    "Concurrent tasks did not complete within {:?}",
                    self.join_timeout
                ))
            })?
    }

    /// Spawn a task the caller never waits on.
    ///
    /// The task runs to completion or fails on its own; a failure is logged
    /// and counted, and can never reach the initiating flow. Ordering
    /// relative to the caller is unspecified.
    pub fn run_detached<F>(&self, label: &str, task: F)
    where
        F: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.monitor.task_started();
        let monitor = Arc::clone(&self.monitor);
        let label = label.to_string();
        tokio::spawn(async move {
            match task.await {
                Ok(()) => {
                    monitor.task_completed();
                    tracing::debug!(task = %label, "Detached task completed");
                }
                Err(e) => {
                    monitor.task_failed();
                    tracing::error!(task = %label, error = %e, "Detached task failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use litera_core::error::ErrorKind;

    fn runner_with_timeout(timeout: Duration) -> (TaskRunner, Arc<ExecutionMonitor>) {
        let monitor = Arc::new(ExecutionMonitor::new());
        (TaskRunner::new(Arc::clone(&monitor), timeout), monitor)
    }

    #[tokio::test]
    async fn test_run_concurrently_preserves_input_order() {
        let (runner, _) = runner_with_timeout(Duration::from_secs(5));

        let tasks: Vec<TaskFuture<u32>> = vec![
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(1)
            }),
            Box::pin(async { Ok(2) }),
        ];

        let results = runner.run_concurrently(tasks).await.unwrap();
        assert_eq!(results, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_run_concurrently_propagates_task_error() {
        let (runner, _) = runner_with_timeout(Duration::from_secs(5));

        let tasks: Vec<TaskFuture<u32>> = vec![
            Box::pin(async { Ok(1) }),
            Box::pin(async { Err(AppError::database("connection lost")) }),
        ];

        let err = runner.run_concurrently(tasks).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_run_concurrently_fails_closed_on_timeout() {
        let (runner, _) = runner_with_timeout(Duration::from_millis(50));

        let tasks: Vec<TaskFuture<u32>> = vec![Box::pin(async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        })];

        let err = runner.run_concurrently(tasks).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_detached_failure_is_isolated_and_counted() {
        let (runner, monitor) = runner_with_timeout(Duration::from_secs(5));

        runner.run_detached("doomed", async { Err(AppError::internal("boom")) });
        runner.run_detached("fine", async { Ok(()) });

        // Give the detached tasks a moment to run.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.tasks_started, 2);
        assert_eq!(snapshot.tasks_completed, 1);
        assert_eq!(snapshot.tasks_failed, 1);
        assert_eq!(snapshot.tasks_in_flight, 0);
    }
}
