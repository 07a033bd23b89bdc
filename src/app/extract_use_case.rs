use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::app::ports::ExtractOutputPort;
use crate::config::ExtractorConfig;
use crate::domain::{ExtractedEvent, ValidationResult};
use crate::observability::{metrics, PipelineStats};
use crate::pipeline::processing::extractor::FieldExtractor;
use crate::pipeline::processing::segmenter::BlockSegmenter;
use crate::pipeline::processing::validator::{RecordValidator, ValidationMode};

/// Use case composing segmentation, field extraction, and validation for one
/// raw text document.
pub struct ExtractUseCase {
    segmenter: BlockSegmenter,
    extractor: FieldExtractor,
    validator: RecordValidator,
    stats: Arc<PipelineStats>,
    output: Box<dyn ExtractOutputPort>,
}

impl ExtractUseCase {
    pub fn new(
        config: &ExtractorConfig,
        stats: Arc<PipelineStats>,
        output: Box<dyn ExtractOutputPort>,
    ) -> Self {
        Self {
            segmenter: BlockSegmenter::with_config(config),
            extractor: FieldExtractor::with_config(config),
            validator: RecordValidator::new(),
            stats,
            output,
        }
    }

    /// Extract every candidate event from a document, score each, and hand
    /// the results to the output port. Extraction itself cannot fail; only
    /// the output port can surface an error.
    pub async fn extract_document(
        &self,
        raw_text: &str,
        source_url: &str,
    ) -> Result<Vec<(ExtractedEvent, ValidationResult)>> {
        let started = Instant::now();

        let blocks = self.segmenter.segment(raw_text);
        metrics::segmenter::document_processed();
        metrics::segmenter::blocks_produced(blocks.len() as u64);

        let mut results = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let event = self.extractor.extract(block);
            let validation = self.validator.validate(&event, ValidationMode::PreConversion);

            metrics::validator::record_validated();
            if !validation.is_valid {
                metrics::validator::record_invalid();
            }
            metrics::validator::score(validation.confidence);

            self.output.write_extracted_event(&event, &validation).await?;
            results.push((event, validation));
        }

        metrics::extractor::events_extracted(results.len() as u64);
        metrics::extractor::duration(started.elapsed().as_secs_f64());

        let avg_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|(_, v)| v.confidence).sum::<f64>() / results.len() as f64
        };
        self.stats.record_extraction(
            source_url,
            started.elapsed().as_secs_f64() * 1000.0,
            avg_score,
            true,
        );

        info!(
            events = results.len(),
            source_url, "extract: document processed"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::ExtractOutputPort;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct MockExtractOutput {
        pub events: Arc<Mutex<Vec<ExtractedEvent>>>,
    }

    impl MockExtractOutput {
        fn new() -> Self {
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ExtractOutputPort for MockExtractOutput {
        async fn write_extracted_event(
            &self,
            event: &ExtractedEvent,
            _validation: &ValidationResult,
        ) -> Result<()> {
            self.events.lock().await.push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn extract_use_case_writes_every_event() {
        let output = Box::new(MockExtractOutput::new());
        let events_ref = output.events.clone();
        let stats = Arc::new(PipelineStats::new());
        let use_case = ExtractUseCase::new(&ExtractorConfig::default(), stats.clone(), output);

        let text = "# Toddler Story Time\nWhere: Greenwood Library\n\n# Family Art Workshop\nCost: $10\n";
        let results = use_case
            .extract_document(text, "https://example.com/calendar")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(events_ref.lock().await.len(), 2);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.extraction_attempts, 1);
        assert_eq!(snapshot.extraction_successes, 1);
    }

    #[tokio::test]
    async fn empty_document_is_a_successful_empty_extraction() {
        let output = Box::new(MockExtractOutput::new());
        let stats = Arc::new(PipelineStats::new());
        let use_case = ExtractUseCase::new(&ExtractorConfig::default(), stats, output);

        let results = use_case
            .extract_document("", "https://example.com")
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
