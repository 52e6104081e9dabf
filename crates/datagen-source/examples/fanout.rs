use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use datagen_core::{GenerationEngine, RecordBatch, Result, SourceRecord, WorkerConfig};
use datagen_source::{DatagenConnector, DatagenTask};

/// Example demonstrating the connector/task fan-out lifecycle
///
/// This example shows how to:
/// 1. Start a connector with a raw property map
/// 2. Fan the job out into multiple worker configurations
/// 3. Run one task per configuration, each in its own tokio task
/// 4. Poll each task for batches and stop everything cleanly
///
/// To run this example:
///   cargo run --example fanout

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    match run_main().await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e:?}");
            std::process::exit(1);
        }
    }
}

/// Toy engine that emits a numbered greeting once per second.
struct TickerEngine;

struct TickerContext {
    topic: String,
    count: u64,
}

#[async_trait]
impl GenerationEngine for TickerEngine {
    type Context = TickerContext;

    async fn build_context(&self, config: &WorkerConfig) -> Result<Self::Context> {
        let topic = config.get("topics").unwrap_or("example").to_string();
        Ok(TickerContext { topic, count: 0 })
    }

    async fn generate(&self, context: &mut Self::Context) -> Result<RecordBatch> {
        // Engine-side pacing: one record per second.
        tokio::time::sleep(Duration::from_secs(1)).await;
        context.count += 1;
        Ok(vec![SourceRecord::new(
            context.topic.clone(),
            format!("hello #{}", context.count),
        )])
    }
}

async fn run_main() -> anyhow::Result<()> {
    let props: HashMap<String, String> = [
        ("topics".to_string(), "greetings".to_string()),
        ("throughput".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();

    let mut connector = DatagenConnector::new();
    println!("datagen-connect version {}", connector.version());
    connector.start(props)?;

    let engine = Arc::new(TickerEngine);
    let mut workers = Vec::new();
    let mut handles = Vec::new();

    for (i, config) in connector.task_configs(3)?.into_iter().enumerate() {
        let mut task = DatagenTask::new(Arc::clone(&engine));
        task.start(config).await?;
        handles.push(task.stop_handle());

        workers.push(tokio::spawn(async move {
            loop {
                match task.poll().await {
                    Ok(batch) => {
                        for record in batch {
                            println!("worker {i}: {} -> {}", record.topic, record.value);
                        }
                    }
                    Err(e) if e.is_cancelled() => break,
                    Err(e) => {
                        eprintln!("worker {i}: poll failed: {e}");
                        break;
                    }
                }
            }
            task.stop();
        }));
    }

    // Let the workers produce a few batches, then shut everything down.
    tokio::time::sleep(Duration::from_secs(5)).await;
    for handle in handles {
        handle.stop();
    }
    for worker in workers {
        worker.await?;
    }

    connector.stop();
    Ok(())
}
