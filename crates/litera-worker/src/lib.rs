//! Concurrent task execution for Litera.
//!
//! This crate provides:
//! - A task runner with join-all semantics for independent units of work
//!   and a fire-and-forget mode for best-effort background tasks
//! - An execution monitor that counts task activity and periodically emits
//!   an observability snapshot

pub mod monitor;
pub mod runner;

pub use monitor::{ExecutionMonitor, MonitorSnapshot};
pub use runner::{TaskFuture, TaskRunner};
