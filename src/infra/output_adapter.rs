use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::app::ports::{ExtractOutputPort, NormalizeOutputPort};
use crate::domain::{ExtractedEvent, ValidationResult};
use crate::pipeline::processing::normalize::NormalizeOutcome;

/// File-based output adapter writing one JSON object per line (NDJSON).
pub struct NdjsonOutputAdapter {
    writer: Mutex<BufWriter<File>>,
    path: String,
}

impl NdjsonOutputAdapter {
    pub fn new(path: &str) -> anyhow::Result<Self> {
        if let Some(dir) = Path::new(path).parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        info!("Writing pipeline output to {}", path);
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn write_line(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().await;
        serde_json::to_writer(&mut *writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ExtractOutputPort for NdjsonOutputAdapter {
    async fn write_extracted_event(
        &self,
        event: &ExtractedEvent,
        validation: &ValidationResult,
    ) -> anyhow::Result<()> {
        let line = serde_json::json!({
            "event": event,
            "validation": validation,
        });
        self.write_line(&line).await
    }
}

#[async_trait]
impl NormalizeOutputPort for NdjsonOutputAdapter {
    async fn write_outcome(&self, outcome: &NormalizeOutcome) -> anyhow::Result<()> {
        let line = serde_json::to_value(outcome)?;
        self.write_line(&line).await
    }
}

/// In-memory adapter used by tests and dry runs.
#[derive(Default)]
pub struct InMemoryOutputAdapter {
    pub events: Mutex<Vec<(ExtractedEvent, ValidationResult)>>,
    pub outcomes: Mutex<Vec<NormalizeOutcome>>,
}

impl InMemoryOutputAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtractOutputPort for InMemoryOutputAdapter {
    async fn write_extracted_event(
        &self,
        event: &ExtractedEvent,
        validation: &ValidationResult,
    ) -> anyhow::Result<()> {
        self.events
            .lock()
            .await
            .push((event.clone(), validation.clone()));
        Ok(())
    }
}

#[async_trait]
impl NormalizeOutputPort for InMemoryOutputAdapter {
    async fn write_outcome(&self, outcome: &NormalizeOutcome) -> anyhow::Result<()> {
        self.outcomes.lock().await.push(outcome.clone());
        Ok(())
    }
}
