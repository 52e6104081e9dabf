//! Job coordinator: configuration ownership and worker fan-out.

use std::collections::HashMap;

use datagen_core::{ConfigDef, ConfigKey, ConfigType, ConnectError, Importance, JobConfig, Result, WorkerConfig};
use tracing::{debug, info};

/// Coordinates one logical generation job.
///
/// Owns the configuration schema and, once started, the validated job
/// configuration. Fan-out via [`task_configs`](Self::task_configs) is
/// pure replication: every worker receives an identical copy, no
/// partitioning of work. The stored configuration is read-only after
/// start, so fan-out is safe to call concurrently with running tasks.
pub struct DatagenConnector {
    config_def: ConfigDef,
    config: Option<JobConfig>,
}

impl DatagenConnector {
    /// Create a connector with the built-in configuration definition.
    ///
    /// The built-in definition declares the keys the adapter itself
    /// cares about; everything else passes through to the engine.
    pub fn new() -> Self {
        Self::with_config_def(default_config_def())
    }

    /// Create a connector with a custom configuration definition.
    pub fn with_config_def(config_def: ConfigDef) -> Self {
        Self {
            config_def,
            config: None,
        }
    }

    /// Validate and store the job configuration.
    ///
    /// Fails with [`ConnectError::Configuration`] naming the offending
    /// key when a required key is missing or a value is type-invalid.
    /// On failure the connector stays unstarted and fan-out remains
    /// unreachable.
    pub fn start(&mut self, props: HashMap<String, String>) -> Result<()> {
        let config = self.config_def.parse(&props)?;
        info!(keys = config.len(), "Datagen connector started");
        self.config = Some(config);
        Ok(())
    }

    /// Produce `max_tasks` independent worker configurations.
    ///
    /// Deterministic and side-effect-free: repeated calls on a started
    /// connector yield equal sets, which is what the host relies on
    /// when it rebalances workers.
    pub fn task_configs(&self, max_tasks: usize) -> Result<Vec<WorkerConfig>> {
        let config = self.config.as_ref().ok_or(ConnectError::InvalidState {
            operation: "task_configs",
            state: "unstarted",
        })?;
        debug!(max_tasks, "Replicating job configuration for workers");
        Ok((0..max_tasks).map(|_| config.replicate()).collect())
    }

    /// Release the held configuration. Idempotent.
    pub fn stop(&mut self) {
        if self.config.take().is_some() {
            info!("Datagen connector stopped");
        }
    }

    /// The configuration schema, for the host's validation tooling.
    pub fn config(&self) -> &ConfigDef {
        &self.config_def
    }

    /// Static adapter version.
    ///
    /// Must stay a pure constant with no reliance on the engine or any
    /// other lazily-initialized subsystem: the host calls this before
    /// `start`, on an arbitrary thread.
    pub fn version(&self) -> &'static str {
        crate::VERSION
    }
}

impl Default for DatagenConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in configuration definition for the datagen connector.
///
/// Values are passed through to the engine, never interpreted here.
fn default_config_def() -> ConfigDef {
    ConfigDef::new()
        .define(ConfigKey::required(
            "topics",
            ConfigType::String,
            Importance::High,
            "Comma-separated topics to generate records for",
        ))
        .define(ConfigKey::optional(
            "throughput",
            ConfigType::Long,
            Importance::Medium,
            None,
            "Target records per second, interpreted by the engine's pacing",
        ))
}
