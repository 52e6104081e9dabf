//! Generation engine trait.
//!
//! The adapter depends only on this trait, never on a concrete
//! generator. Any engine works: an in-process library, a subprocess
//! wrapper, or a network client. This replaces name-based dynamic
//! resolution of engine entry points with an explicit capability,
//! which also keeps engine initialization out of paths like
//! `version()` that must stay pure.

use async_trait::async_trait;

use crate::config::WorkerConfig;
use crate::error::Result;
use crate::record::RecordBatch;

/// A source of synthetic record batches.
///
/// One engine instance may serve many workers; per-worker state lives
/// in the [`Context`](GenerationEngine::Context), built once per
/// worker and owned exclusively by that worker's task.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Per-worker generation state. Mutated only by [`generate`]
    /// across successive polls; never shared across workers.
    ///
    /// [`generate`]: GenerationEngine::generate
    type Context: Send;

    /// Build the per-worker context from the worker configuration.
    ///
    /// Called exactly once per worker lifetime, before any poll. An
    /// error here (e.g. malformed generation rules) fails that worker
    /// with [`ConnectError::EngineInitialization`].
    ///
    /// [`ConnectError::EngineInitialization`]: crate::error::ConnectError::EngineInitialization
    async fn build_context(&self, config: &WorkerConfig) -> Result<Self::Context>;

    /// Produce the next batch of records.
    ///
    /// May await to honor the engine's own pacing; the adapter races
    /// this future against its stop signal, so a long wait must be
    /// cancellation-safe. Returns zero or more records; an empty batch
    /// means "no data ready, poll again".
    async fn generate(&self, context: &mut Self::Context) -> Result<RecordBatch>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigDef;
    use crate::record::SourceRecord;
    use std::collections::HashMap;

    /// Minimal engine emitting every other poll, to exercise the
    /// empty-batch ("no data ready") half of the contract.
    struct AlternatingEngine;

    #[async_trait]
    impl GenerationEngine for AlternatingEngine {
        type Context = u64;

        async fn build_context(&self, _config: &WorkerConfig) -> Result<Self::Context> {
            Ok(0)
        }

        async fn generate(&self, polls: &mut Self::Context) -> Result<RecordBatch> {
            *polls += 1;
            if *polls % 2 == 0 {
                Ok(vec![])
            } else {
                Ok(vec![SourceRecord::new("t1", format!("v{polls}"))])
            }
        }
    }

    #[tokio::test]
    async fn test_engine_contract_allows_empty_batches() {
        let engine = AlternatingEngine;
        let config = ConfigDef::new()
            .parse(&HashMap::new())
            .unwrap()
            .replicate();

        let mut context = engine.build_context(&config).await.unwrap();
        assert_eq!(engine.generate(&mut context).await.unwrap().len(), 1);
        assert!(engine.generate(&mut context).await.unwrap().is_empty());
        assert_eq!(
            engine.generate(&mut context).await.unwrap(),
            vec![SourceRecord::new("t1", "v3")]
        );
    }
}
