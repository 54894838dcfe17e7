//! Execution monitor — process-wide task counters and a periodic
//! observability snapshot.
//!
//! Purely observational: nothing here sits on the success or failure path of
//! any request.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// Process-wide counters for task execution.
///
/// Thread-safe via atomics; shared between the task runner and the snapshot
/// loop.
#[derive(Debug, Default)]
pub struct ExecutionMonitor {
    /// Total tasks handed to the runner.
    tasks_started: AtomicU64,
    /// Tasks that resolved successfully.
    tasks_completed: AtomicU64,
    /// Tasks that resolved with an error.
    tasks_failed: AtomicU64,
}

/// Point-in-time view of the monitor counters and runtime gauges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    /// Total tasks started since process start.
    pub tasks_started: u64,
    /// Tasks completed successfully.
    pub tasks_completed: u64,
    /// Tasks that failed.
    pub tasks_failed: u64,
    /// Tasks currently running.
    pub tasks_in_flight: u64,
}

impl ExecutionMonitor {
    /// Create a new monitor with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a task handed to the runner.
    pub fn task_started(&self) {
        self.tasks_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a successful task resolution.
    pub fn task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed task resolution.
    pub fn task_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> MonitorSnapshot {
        let started = self.tasks_started.load(Ordering::Relaxed);
        let completed = self.tasks_completed.load(Ordering::Relaxed);
        let failed = self.tasks_failed.load(Ordering::Relaxed);

        MonitorSnapshot {
            tasks_started: started,
            tasks_completed: completed,
            tasks_failed: failed,
            tasks_in_flight: started.saturating_sub(completed + failed),
        }
    }

    /// Periodic snapshot loop — runs until the cancel signal is received.
    ///
    /// Emits the counter snapshot together with runtime thread/task gauges
    /// and, where the platform exposes it, resident memory.
    pub async fn run(self: Arc<Self>, interval: Duration, mut cancel: watch::Receiver<bool>) {
        tracing::info!(interval_seconds = interval.as_secs(), "Execution monitor started");

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Execution monitor received shutdown signal");
                        break;
                    }
                }
                _ = tokio::time::sleep(interval) => {
                    self.emit_snapshot();
                }
            }
        }
    }

    fn emit_snapshot(&self) {
        let snapshot = self.snapshot();
        let metrics = tokio::runtime::Handle::current().metrics();

        match resident_memory_mb() {
            Some(memory_mb) => tracing::info!(
                worker_threads = metrics.num_workers(),
                alive_tasks = metrics.num_alive_tasks(),
                tasks_started = snapshot.tasks_started,
                tasks_completed = snapshot.tasks_completed,
                tasks_failed = snapshot.tasks_failed,
                tasks_in_flight = snapshot.tasks_in_flight,
                memory_mb,
                "Execution monitor snapshot"
            ),
            None => tracing::info!(
                worker_threads = metrics.num_workers(),
                alive_tasks = metrics.num_alive_tasks(),
                tasks_started = snapshot.tasks_started,
                tasks_completed = snapshot.tasks_completed,
                tasks_failed = snapshot.tasks_failed,
                tasks_in_flight = snapshot.tasks_in_flight,
                "Execution monitor snapshot"
            ),
        }
    }
}

/// Resident set size in megabytes, when the platform exposes it.
#[cfg(target_os = "linux")]
fn resident_memory_mb() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(resident_pages * 4096 / (1024 * 1024))
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_mb() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts_in_flight() {
        let monitor = ExecutionMonitor::new();
        monitor.task_started();
        monitor.task_started();
        monitor.task_started();
        monitor.task_completed();
        monitor.task_failed();

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.tasks_started, 3);
        assert_eq!(snapshot.tasks_completed, 1);
        assert_eq!(snapshot.tasks_failed, 1);
        assert_eq!(snapshot.tasks_in_flight, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let monitor = Arc::new(ExecutionMonitor::new());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(Arc::clone(&monitor).run(Duration::from_secs(60), rx));
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("monitor loop did not stop on cancel")
            .unwrap();
    }
}
