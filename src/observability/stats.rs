//! Explicit pipeline statistics sink.
//!
//! The aggregate is an ordinary value constructed by the caller and shared
//! via `Arc` into each use case, rather than a hidden process-wide global.
//! A single lock guards every read-modify-write, so independent extraction
//! calls can run fully in parallel and still report into one aggregate.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct SourceStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

#[derive(Debug, Default)]
struct StatsInner {
    extraction_attempts: u64,
    extraction_successes: u64,
    extraction_failures: u64,
    normalize_attempts: u64,
    normalize_successes: u64,
    normalize_failures: u64,
    avg_processing_ms: f64,
    avg_quality_score: f64,
    processed: u64,
    per_source: HashMap<String, SourceStats>,
}

/// Serializable point-in-time view of the aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub extraction_attempts: u64,
    pub extraction_successes: u64,
    pub extraction_failures: u64,
    pub normalize_attempts: u64,
    pub normalize_successes: u64,
    pub normalize_failures: u64,
    pub avg_processing_ms: f64,
    pub avg_quality_score: f64,
    pub per_source: std::collections::BTreeMap<String, SourceStats>,
}

/// Monotonically-updated counters and rolling averages for the pipeline.
#[derive(Debug, Default)]
pub struct PipelineStats {
    inner: Mutex<StatsInner>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_extraction(
        &self,
        source_url: &str,
        elapsed_ms: f64,
        quality_score: f64,
        success: bool,
    ) {
        let mut inner = self.lock();
        inner.extraction_attempts += 1;
        if success {
            inner.extraction_successes += 1;
        } else {
            inner.extraction_failures += 1;
        }
        Self::record_shared(&mut inner, source_url, elapsed_ms, quality_score, success);
    }

    pub fn record_normalization(
        &self,
        source_url: &str,
        elapsed_ms: f64,
        confidence: f64,
        success: bool,
    ) {
        let mut inner = self.lock();
        inner.normalize_attempts += 1;
        if success {
            inner.normalize_successes += 1;
        } else {
            inner.normalize_failures += 1;
        }
        Self::record_shared(&mut inner, source_url, elapsed_ms, confidence, success);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.lock();
        StatsSnapshot {
            extraction_attempts: inner.extraction_attempts,
            extraction_successes: inner.extraction_successes,
            extraction_failures: inner.extraction_failures,
            normalize_attempts: inner.normalize_attempts,
            normalize_successes: inner.normalize_successes,
            normalize_failures: inner.normalize_failures,
            avg_processing_ms: inner.avg_processing_ms,
            avg_quality_score: inner.avg_quality_score,
            per_source: inner
                .per_source
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn record_shared(
        inner: &mut StatsInner,
        source_url: &str,
        elapsed_ms: f64,
        quality_score: f64,
        success: bool,
    ) {
        inner.processed += 1;
        let n = inner.processed as f64;
        inner.avg_processing_ms += (elapsed_ms - inner.avg_processing_ms) / n;
        inner.avg_quality_score += (quality_score - inner.avg_quality_score) / n;

        let entry = inner
            .per_source
            .entry(source_url.to_string())
            .or_default();
        entry.attempts += 1;
        if success {
            entry.successes += 1;
        } else {
            entry.failures += 1;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatsInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // A poisoned lock only means another recorder panicked; the
            // counters themselves are still usable.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn rolling_averages_converge() {
        let stats = PipelineStats::new();
        stats.record_extraction("https://a.example.com", 10.0, 80.0, true);
        stats.record_extraction("https://a.example.com", 20.0, 60.0, true);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.extraction_attempts, 2);
        assert!((snapshot.avg_processing_ms - 15.0).abs() < f64::EPSILON);
        assert!((snapshot.avg_quality_score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn per_source_breakdown_tracks_failures() {
        let stats = PipelineStats::new();
        stats.record_normalization("https://a.example.com", 5.0, 90.0, true);
        stats.record_normalization("https://b.example.com", 5.0, 0.0, false);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.per_source["https://a.example.com"].successes, 1);
        assert_eq!(snapshot.per_source["https://b.example.com"].failures, 1);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let stats = Arc::new(PipelineStats::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    stats.record_extraction("https://example.com", 1.0, 50.0, true);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().extraction_attempts, 800);
    }
}
