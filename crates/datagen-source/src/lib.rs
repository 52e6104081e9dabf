//! Source adapter runtime for datagen-connect.
//!
//! This crate implements the connector/task lifecycle a host streaming
//! platform drives:
//!
//! - [`DatagenConnector`] - owns the validated job configuration and
//!   fans one job out into N identical worker configurations
//! - [`DatagenTask`] - owns one worker's generation context and serves
//!   the pull-based, cancellable polling contract
//!
//! # Lifecycle
//!
//! The host creates one connector, calls `start` with the raw property
//! map, asks for `task_configs(max_tasks)`, and runs one task per
//! returned configuration, each in its own host-owned execution
//! context. Each task is polled repeatedly until the host stops it.
//!
//! Tasks never share state with each other or with the connector after
//! fan-out: worker configurations are copied, not referenced.

pub mod connector;
pub mod task;

pub use connector::DatagenConnector;
pub use task::{DatagenTask, TaskState, TaskStopHandle};

/// Adapter version reported to the host.
///
/// A pure compile-time constant. Deliberately not routed through the
/// engine abstraction: `version()` must be callable before anything
/// else is initialized, so it can never touch a lazily-initialized
/// subsystem.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
