//! Worker poller: per-worker generation context and the polling contract.

use std::sync::Arc;

use datagen_core::{ConnectError, GenerationEngine, RecordBatch, Result, WorkerConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle state of one worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created but not yet started.
    Uninitialized,
    /// Started; polling is valid.
    Running,
    /// Stop requested; an in-flight poll has been (or is being)
    /// interrupted, final cleanup pending.
    Stopping,
    /// Stopped; all further polls fail.
    Stopped,
}

impl TaskState {
    fn name(&self) -> &'static str {
        match self {
            TaskState::Uninitialized => "uninitialized",
            TaskState::Running => "running",
            TaskState::Stopping => "stopping",
            TaskState::Stopped => "stopped",
        }
    }
}

/// Cloneable handle that requests a task to stop.
///
/// The host holds one of these per task so it can interrupt a blocked
/// [`DatagenTask::poll`] from another thread. Triggering the handle
/// only signals; the owning side completes the stop via
/// [`DatagenTask::stop`].
#[derive(Clone)]
pub struct TaskStopHandle {
    cancel: CancellationToken,
}

impl TaskStopHandle {
    /// Request the task to stop. A blocked poll observes the signal
    /// and returns promptly with [`ConnectError::Cancelled`].
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// One worker's polling loop endpoint.
///
/// Owns the engine-built context for its whole lifetime; the context
/// is never shared across workers. State machine:
/// `Uninitialized → Running → Stopping → Stopped`.
pub struct DatagenTask<E: GenerationEngine> {
    engine: Arc<E>,
    context: Option<E::Context>,
    state: TaskState,
    cancel: CancellationToken,
}

impl<E: GenerationEngine> DatagenTask<E> {
    /// Create an unstarted task backed by the given engine.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            context: None,
            state: TaskState::Uninitialized,
            cancel: CancellationToken::new(),
        }
    }

    /// Build the worker context and transition to `Running`.
    ///
    /// Called exactly once per worker lifetime, before any poll. If
    /// the engine rejects the configuration the task becomes unusable
    /// and the error surfaces as [`ConnectError::EngineInitialization`]
    /// so the host knows a restart with the same configuration will
    /// fail again.
    pub async fn start(&mut self, config: WorkerConfig) -> Result<()> {
        if self.state != TaskState::Uninitialized {
            return Err(ConnectError::InvalidState {
                operation: "start",
                state: self.state.name(),
            });
        }

        match self.engine.build_context(&config).await {
            Ok(context) => {
                self.context = Some(context);
                self.state = TaskState::Running;
                info!("Datagen task started");
                Ok(())
            }
            Err(err) => {
                self.state = TaskState::Stopped;
                let message = match err {
                    ConnectError::EngineInitialization(message) => message,
                    other => other.to_string(),
                };
                Err(ConnectError::EngineInitialization(message))
            }
        }
    }

    /// Produce the next batch from the engine.
    ///
    /// Valid only in `Running`. May block while the engine paces its
    /// next batch; a stop request interrupts the wait and the call
    /// returns [`ConnectError::Cancelled`] promptly, discarding any
    /// partially generated records (each poll is atomic: it yields a
    /// whole batch or nothing). Engine failures surface as
    /// [`ConnectError::Generation`] and leave the task `Running` so
    /// the host can decide whether to poll again.
    pub async fn poll(&mut self) -> Result<RecordBatch> {
        if self.state != TaskState::Running {
            return Err(ConnectError::InvalidState {
                operation: "poll",
                state: self.state.name(),
            });
        }
        let mut context = match self.context.take() {
            Some(context) => context,
            None => {
                return Err(ConnectError::InvalidState {
                    operation: "poll",
                    state: self.state.name(),
                })
            }
        };

        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.engine.generate(&mut context) => Some(result),
        };

        match outcome {
            None => {
                // Interrupted wait: the context (and any partial batch
                // it held) is dropped here, not handed back.
                self.state = TaskState::Stopping;
                debug!("Poll interrupted by stop request");
                Err(ConnectError::Cancelled)
            }
            Some(Ok(batch)) => {
                self.context = Some(context);
                debug!(records = batch.len(), "Poll produced a batch");
                Ok(batch)
            }
            Some(Err(err)) => {
                self.context = Some(context);
                Err(match err {
                    ConnectError::Generation(message) => ConnectError::Generation(message),
                    other => ConnectError::Generation(other.to_string()),
                })
            }
        }
    }

    /// Signal cancellation, release the context, and transition to
    /// `Stopped`. Idempotent; safe to pair with a concurrent blocked
    /// poll interrupted through [`TaskStopHandle`].
    pub fn stop(&mut self) {
        if self.state == TaskState::Stopped {
            return;
        }
        self.cancel.cancel();
        self.context = None;
        self.state = TaskState::Stopped;
        info!("Datagen task stopped");
    }

    /// Handle for requesting a stop from another thread while a poll
    /// is blocked.
    pub fn stop_handle(&self) -> TaskStopHandle {
        TaskStopHandle {
            cancel: self.cancel.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Static adapter version.
    pub fn version(&self) -> &'static str {
        crate::VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use datagen_core::SourceRecord;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Engine that emits one numbered record per poll for the
    /// configured topic.
    struct CountingEngine;

    struct CountingContext {
        topic: String,
        polls: u64,
    }

    #[async_trait]
    impl GenerationEngine for CountingEngine {
        type Context = CountingContext;

        async fn build_context(&self, config: &WorkerConfig) -> Result<Self::Context> {
            let topic = config
                .get("topics")
                .ok_or_else(|| ConnectError::EngineInitialization("no topics configured".to_string()))?;
            Ok(CountingContext {
                topic: topic.to_string(),
                polls: 0,
            })
        }

        async fn generate(&self, context: &mut Self::Context) -> Result<RecordBatch> {
            context.polls += 1;
            Ok(vec![SourceRecord::new(
                context.topic.clone(),
                format!("record-{}", context.polls),
            )])
        }
    }

    /// Engine whose generate fails every time.
    struct FailingEngine {
        calls: AtomicU64,
    }

    #[async_trait]
    impl GenerationEngine for FailingEngine {
        type Context = ();

        async fn build_context(&self, _config: &WorkerConfig) -> Result<Self::Context> {
            Ok(())
        }

        async fn generate(&self, _context: &mut Self::Context) -> Result<RecordBatch> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ConnectError::Generation("downstream unavailable".to_string()))
        }
    }

    fn worker_config(pairs: &[(&str, &str)]) -> WorkerConfig {
        let props: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        datagen_core::ConfigDef::new()
            .parse(&props)
            .unwrap()
            .replicate()
    }

    #[tokio::test]
    async fn test_poll_before_start_fails() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        let err = task.poll().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectError::InvalidState {
                operation: "poll",
                state: "uninitialized"
            }
        ));
    }

    #[tokio::test]
    async fn test_start_then_poll_yields_engine_batch() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();
        assert_eq!(task.state(), TaskState::Running);

        let batch = task.poll().await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].topic, "t1");
        assert_eq!(batch[0].value, "record-1");

        // Context state persists across polls.
        let batch = task.poll().await.unwrap();
        assert_eq!(batch[0].value, "record-2");
    }

    #[tokio::test]
    async fn test_double_start_fails() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();
        let err = task.start(worker_config(&[("topics", "t1")])).await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_engine_rejection_surfaces_as_initialization_error() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        let err = task.start(worker_config(&[])).await.unwrap_err();
        assert!(matches!(err, ConnectError::EngineInitialization(_)));
        assert_eq!(task.state(), TaskState::Stopped);
        // The task is unusable afterwards.
        assert!(task.poll().await.is_err());
    }

    #[tokio::test]
    async fn test_poll_after_stop_fails() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();
        task.stop();
        assert_eq!(task.state(), TaskState::Stopped);
        let err = task.poll().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectError::InvalidState {
                operation: "poll",
                state: "stopped"
            }
        ));
    }

    #[tokio::test]
    async fn test_stop_idempotent() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();
        task.stop();
        task.stop();
        assert_eq!(task.state(), TaskState::Stopped);
    }

    #[tokio::test]
    async fn test_generation_error_leaves_task_running() {
        let engine = Arc::new(FailingEngine {
            calls: AtomicU64::new(0),
        });
        let mut task = DatagenTask::new(Arc::clone(&engine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();

        let err = task.poll().await.unwrap_err();
        assert!(matches!(err, ConnectError::Generation(_)));
        assert_eq!(task.state(), TaskState::Running);

        // The host may poll again; the context survived the failure.
        let _ = task.poll().await.unwrap_err();
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pre_cancelled_poll_returns_cancelled_then_invalid_state() {
        let mut task = DatagenTask::new(Arc::new(CountingEngine));
        task.start(worker_config(&[("topics", "t1")])).await.unwrap();

        task.stop_handle().stop();
        let err = task.poll().await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(task.state(), TaskState::Stopping);

        let err = task.poll().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectError::InvalidState {
                operation: "poll",
                state: "stopping"
            }
        ));
    }
}
