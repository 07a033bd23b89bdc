//! Simple metrics module for the family activity extractor
//!
//! This module provides a straightforward API for recording metrics using
//! the standard Prometheus naming conventions.

use std::fmt;

use once_cell::sync::OnceCell;

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Segmenter metrics
    SegmenterDocumentsProcessed,
    SegmenterBlocksProduced,
    SegmenterBlocksDropped,

    // Extractor metrics
    ExtractorEventsExtracted,
    ExtractorDuration,

    // Validator metrics
    ValidatorRecordsValidated,
    ValidatorRecordsInvalid,
    ValidatorScore,

    // Normalize metrics
    NormalizeRecordsProcessed,
    NormalizeFailures,
    NormalizeConfidence,
    NormalizeIssuesRecorded,
    NormalizeFallbackArrayUsed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Segmenter metrics
            MetricName::SegmenterDocumentsProcessed => "fae_segmenter_documents_processed_total",
            MetricName::SegmenterBlocksProduced => "fae_segmenter_blocks_produced_total",
            MetricName::SegmenterBlocksDropped => "fae_segmenter_blocks_dropped_total",

            // Extractor metrics
            MetricName::ExtractorEventsExtracted => "fae_extractor_events_extracted_total",
            MetricName::ExtractorDuration => "fae_extractor_duration_seconds",

            // Validator metrics
            MetricName::ValidatorRecordsValidated => "fae_validator_records_validated_total",
            MetricName::ValidatorRecordsInvalid => "fae_validator_records_invalid_total",
            MetricName::ValidatorScore => "fae_validator_score",

            // Normalize metrics
            MetricName::NormalizeRecordsProcessed => "fae_normalize_records_processed_total",
            MetricName::NormalizeFailures => "fae_normalize_failures_total",
            MetricName::NormalizeConfidence => "fae_normalize_confidence",
            MetricName::NormalizeIssuesRecorded => "fae_normalize_issues_recorded_total",
            MetricName::NormalizeFallbackArrayUsed => "fae_normalize_fallback_array_used_total",
        }
    }

    /// Get metric metadata for dashboard generation
    /// Returns (phase, description)
    pub fn metadata(&self) -> (&'static str, &'static str) {
        match self {
            MetricName::SegmenterDocumentsProcessed => ("segmenter", "Documents segmented"),
            MetricName::SegmenterBlocksProduced => ("segmenter", "Candidate blocks produced"),
            MetricName::SegmenterBlocksDropped => ("segmenter", "Blocks dropped past the cap"),

            MetricName::ExtractorEventsExtracted => ("extractor", "Events extracted from blocks"),
            MetricName::ExtractorDuration => ("extractor", "Extraction duration in seconds"),

            MetricName::ValidatorRecordsValidated => ("validator", "Records validated"),
            MetricName::ValidatorRecordsInvalid => ("validator", "Records judged invalid"),
            MetricName::ValidatorScore => ("validator", "Validation score distribution"),

            MetricName::NormalizeRecordsProcessed => ("normalize", "Payloads normalized"),
            MetricName::NormalizeFailures => ("normalize", "Normalization input errors"),
            MetricName::NormalizeConfidence => ("normalize", "Normalization confidence level"),
            MetricName::NormalizeIssuesRecorded => ("normalize", "Data-quality issues recorded"),
            MetricName::NormalizeFallbackArrayUsed => {
                ("normalize", "Payloads resolved through an alternative array key")
            }
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static RECORDER: OnceCell<metrics_exporter_prometheus::PrometheusHandle> = OnceCell::new();

/// Initialize the metrics system. Idempotent: only the first call installs
/// the Prometheus recorder.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    if RECORDER.get().is_some() {
        return Ok(());
    }
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    RECORDER.set(handle).ok();
    Ok(())
}

/// Render the currently collected metrics in Prometheus text format.
pub fn render() -> Option<String> {
    RECORDER.get().map(|handle| handle.render())
}

// ============================================================================
// Segmenter Metrics
// ============================================================================

pub mod segmenter {
    use super::MetricName;

    /// Record a segmented document
    pub fn document_processed() {
        ::metrics::counter!(MetricName::SegmenterDocumentsProcessed.as_str()).increment(1);
    }

    /// Record produced blocks
    pub fn blocks_produced(count: u64) {
        ::metrics::counter!(MetricName::SegmenterBlocksProduced.as_str()).increment(count);
    }

    /// Record blocks dropped past the cap
    #[allow(dead_code)]
    pub fn blocks_dropped(count: u64) {
        ::metrics::counter!(MetricName::SegmenterBlocksDropped.as_str()).increment(count);
    }
}

// ============================================================================
// Extractor Metrics
// ============================================================================

pub mod extractor {
    use super::MetricName;

    /// Record extracted events
    pub fn events_extracted(count: u64) {
        ::metrics::counter!(MetricName::ExtractorEventsExtracted.as_str()).increment(count);
    }

    /// Record extraction duration
    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::ExtractorDuration.as_str()).record(secs);
    }
}

// ============================================================================
// Validator Metrics
// ============================================================================

pub mod validator {
    use super::MetricName;

    /// Record a validated record
    pub fn record_validated() {
        ::metrics::counter!(MetricName::ValidatorRecordsValidated.as_str()).increment(1);
    }

    /// Record an invalid record
    pub fn record_invalid() {
        ::metrics::counter!(MetricName::ValidatorRecordsInvalid.as_str()).increment(1);
    }

    /// Record a validation score
    pub fn score(value: f64) {
        ::metrics::histogram!(MetricName::ValidatorScore.as_str()).record(value);
    }
}

// ============================================================================
// Normalize Metrics
// ============================================================================

pub mod normalize {
    use super::MetricName;

    /// Record a processed payload
    pub fn record_processed() {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str()).increment(1);
    }

    /// Record a normalization input error
    pub fn failure() {
        ::metrics::counter!(MetricName::NormalizeFailures.as_str()).increment(1);
    }

    /// Record the aggregate confidence of an outcome
    pub fn confidence(value: f64) {
        ::metrics::histogram!(MetricName::NormalizeConfidence.as_str()).record(value);
    }

    /// Record data-quality issues attached to an outcome
    pub fn issues_recorded(count: u64) {
        ::metrics::counter!(MetricName::NormalizeIssuesRecorded.as_str()).increment(count);
    }

    /// Record that the expected array key was missing and an alternative won
    #[allow(dead_code)]
    pub fn fallback_array_used() {
        ::metrics::counter!(MetricName::NormalizeFallbackArrayUsed.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_follow_prometheus_conventions() {
        assert_eq!(
            MetricName::SegmenterBlocksProduced.as_str(),
            "fae_segmenter_blocks_produced_total"
        );
        assert!(MetricName::NormalizeConfidence.as_str().starts_with("fae_"));
    }

    #[test]
    fn metadata_reports_the_owning_phase() {
        let (phase, _) = MetricName::ValidatorScore.metadata();
        assert_eq!(phase, "validator");
    }
}
