//! Core types for the datagen-connect framework.
//!
//! This crate provides the foundational types shared by the source
//! adapter and by generation-engine implementations:
//!
//! - [`ConfigDef`] / [`ConfigKey`] - declarative configuration schema
//! - [`JobConfig`] / [`WorkerConfig`] - validated job and per-worker configuration
//! - [`SourceRecord`] / [`RecordBatch`] - generated records returned from a poll
//! - [`GenerationEngine`] - the trait any concrete engine implements
//! - [`ConnectError`] - the error taxonomy surfaced to the host
//!
//! # Architecture
//!
//! ```text
//! datagen-core (this crate)
//!    │
//!    ├─── datagen-source   (connector + task lifecycle, depends on these types)
//!    │
//!    └─── engine crates    (implement GenerationEngine for a concrete generator)
//! ```
//!
//! # Dependency Direction
//!
//! Engine crates depend on datagen-core, never on datagen-source. The
//! adapter talks to engines only through [`GenerationEngine`], so an
//! engine can live in-process, in a subprocess, or behind a network
//! client without the adapter knowing.

pub mod config;
pub mod engine;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use config::{ConfigDef, ConfigKey, ConfigType, Importance, JobConfig, WorkerConfig};
pub use engine::GenerationEngine;
pub use error::{ConnectError, Result};
pub use record::{RecordBatch, SourceRecord};
