//! Configuration schema and validated configuration types.
//!
//! The host hands a connector a flat string-to-string property map. A
//! [`ConfigDef`] declares which keys the connector recognizes, with a
//! type and an importance tag the host's configuration tooling can
//! render. Parsing the raw map against the definition produces a
//! [`JobConfig`]; fanning a job out produces one [`WorkerConfig`] copy
//! per worker.
//!
//! Keys not declared in the definition pass through untouched. They
//! belong to the generation engine, which interprets them when the
//! worker context is built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConnectError, Result};

/// Value type of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    /// Free-form string.
    String,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point.
    Double,
    /// `true` or `false`.
    Boolean,
    /// Comma-separated list of strings.
    List,
}

impl ConfigType {
    fn name(&self) -> &'static str {
        match self {
            ConfigType::String => "string",
            ConfigType::Int => "int",
            ConfigType::Long => "long",
            ConfigType::Double => "double",
            ConfigType::Boolean => "boolean",
            ConfigType::List => "list",
        }
    }
}

/// Importance tag shown by the host's configuration tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Must usually be set for the connector to be useful.
    High,
    /// Commonly tuned.
    Medium,
    /// Rarely touched.
    Low,
}

/// One recognized configuration key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKey {
    /// Key name as it appears in the property map.
    pub name: String,
    /// Expected value type.
    pub config_type: ConfigType,
    /// Importance tag for host tooling.
    pub importance: Importance,
    /// Whether the key must be present (and has no default).
    pub required: bool,
    /// Default applied when an optional key is absent.
    pub default: Option<String>,
    /// Human-readable description.
    pub doc: String,
}

impl ConfigKey {
    /// Declare a key that must be present in the job configuration.
    pub fn required(
        name: impl Into<String>,
        config_type: ConfigType,
        importance: Importance,
        doc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            config_type,
            importance,
            required: true,
            default: None,
            doc: doc.into(),
        }
    }

    /// Declare an optional key, with an optional default value.
    pub fn optional(
        name: impl Into<String>,
        config_type: ConfigType,
        importance: Importance,
        default: Option<&str>,
        doc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            config_type,
            importance,
            required: false,
            default: default.map(|d| d.to_string()),
            doc: doc.into(),
        }
    }
}

/// Declarative set of recognized configuration keys.
///
/// An empty definition is valid: every key then passes through to the
/// engine unvalidated. Key order is preserved for host tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDef {
    keys: Vec<ConfigKey>,
}

impl ConfigDef {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key to the definition, builder style.
    pub fn define(mut self, key: ConfigKey) -> Self {
        self.keys.push(key);
        self
    }

    /// All declared keys, in declaration order.
    pub fn keys(&self) -> &[ConfigKey] {
        &self.keys
    }

    /// Look up a declared key by name.
    pub fn get(&self, name: &str) -> Option<&ConfigKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Validate raw properties against this definition.
    ///
    /// A missing required key or a type-invalid value fails with
    /// [`ConnectError::Configuration`] naming the offending key.
    /// Defaults are filled in for absent optional keys that declare
    /// one. Undeclared keys are kept as-is.
    pub fn parse(&self, props: &HashMap<String, String>) -> Result<JobConfig> {
        let mut entries = props.clone();

        for key in &self.keys {
            match entries.get(&key.name) {
                Some(value) => validate_value(key, value)?,
                None if key.required => {
                    return Err(ConnectError::Configuration {
                        key: key.name.clone(),
                        message: "missing required key".to_string(),
                    });
                }
                None => {
                    if let Some(default) = &key.default {
                        entries.insert(key.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(JobConfig { entries })
    }
}

/// Check that a value parses as the key's declared type.
fn validate_value(key: &ConfigKey, value: &str) -> Result<()> {
    let ok = match key.config_type {
        ConfigType::String | ConfigType::List => true,
        ConfigType::Int => value.parse::<i32>().is_ok(),
        ConfigType::Long => value.parse::<i64>().is_ok(),
        ConfigType::Double => value.parse::<f64>().is_ok(),
        ConfigType::Boolean => matches!(value, "true" | "false"),
    };

    if ok {
        Ok(())
    } else {
        Err(ConnectError::Configuration {
            key: key.name.clone(),
            message: format!("value '{}' is not a valid {}", value, key.config_type.name()),
        })
    }
}

/// Validated job-level configuration.
///
/// Created only by [`ConfigDef::parse`] and immutable afterwards.
/// Lives for the whole job; dropped at connector stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    entries: HashMap<String, String>,
}

impl JobConfig {
    /// Value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produce one independent worker copy of this configuration.
    ///
    /// Fan-out is pure replication: every worker receives the same
    /// content, and copies never alias the job configuration.
    pub fn replicate(&self) -> WorkerConfig {
        WorkerConfig {
            entries: self.entries.clone(),
        }
    }
}

/// Per-worker copy of the job configuration.
///
/// Owned by exactly one worker for its whole lifetime. All worker
/// configurations for one job are identical in content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    entries: HashMap<String, String>,
}

impl WorkerConfig {
    /// Value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    /// The full property map, for handing off to the engine.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.entries
    }
}
