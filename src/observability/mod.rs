// Observability: metrics facade and the explicit pipeline stats sink

pub mod metrics;
pub mod stats;

// Re-export main functions for ease of use
pub use self::metrics::init;
pub use self::stats::PipelineStats;
