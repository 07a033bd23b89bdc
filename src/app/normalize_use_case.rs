use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::app::ports::NormalizeOutputPort;
use crate::config::ExtractorConfig;
use crate::observability::{metrics, PipelineStats};
use crate::pipeline::processing::normalize::{NormalizeOutcome, SchemaNormalizer, SchemaType};

/// Use case wrapping the schema normalizer with metrics, stats, and the
/// downstream output port.
pub struct NormalizeUseCase {
    normalizer: SchemaNormalizer,
    stats: Arc<PipelineStats>,
    output: Box<dyn NormalizeOutputPort>,
}

impl NormalizeUseCase {
    pub fn new(
        config: &ExtractorConfig,
        stats: Arc<PipelineStats>,
        output: Box<dyn NormalizeOutputPort>,
    ) -> Self {
        Self {
            normalizer: SchemaNormalizer::with_config(config.clone()),
            stats,
            output,
        }
    }

    /// Normalize one payload. Input-shape problems (unknown schema type,
    /// unusable payload) propagate as errors; data-quality problems come
    /// back inside the outcome.
    pub async fn normalize_payload(
        &self,
        payload: &Value,
        schema_type: &str,
        source_url: &str,
    ) -> Result<NormalizeOutcome> {
        let started = Instant::now();
        let schema: SchemaType = schema_type.parse().inspect_err(|_| {
            metrics::normalize::failure();
        })?;

        match self.normalizer.normalize(payload, schema, source_url) {
            Ok(outcome) => {
                metrics::normalize::record_processed();
                metrics::normalize::confidence(outcome.confidence);
                metrics::normalize::issues_recorded(outcome.issues.len() as u64);

                self.stats.record_normalization(
                    source_url,
                    started.elapsed().as_secs_f64() * 1000.0,
                    outcome.confidence,
                    true,
                );

                self.output.write_outcome(&outcome).await?;
                info!(
                    confidence = outcome.confidence,
                    issues = outcome.issues.len(),
                    has_record = outcome.record.is_some(),
                    source_url,
                    "normalize: payload processed"
                );
                Ok(outcome)
            }
            Err(err) => {
                metrics::normalize::failure();
                self.stats.record_normalization(
                    source_url,
                    started.elapsed().as_secs_f64() * 1000.0,
                    0.0,
                    false,
                );
                warn!(source_url, error = %err, "normalize: payload rejected");
                Err(err.into())
            }
        }
    }
}
