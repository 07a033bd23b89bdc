use async_trait::async_trait;

use crate::domain::{ExtractedEvent, ValidationResult};
use crate::pipeline::processing::normalize::NormalizeOutcome;

/// Downstream sink for extracted events and their validation results.
#[async_trait]
pub trait ExtractOutputPort: Send + Sync {
    async fn write_extracted_event(
        &self,
        event: &ExtractedEvent,
        validation: &ValidationResult,
    ) -> anyhow::Result<()>;
}

/// Downstream sink for normalization outcomes (record + provenance report).
#[async_trait]
pub trait NormalizeOutputPort: Send + Sync {
    async fn write_outcome(&self, outcome: &NormalizeOutcome) -> anyhow::Result<()>;
}
