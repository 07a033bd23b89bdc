//! Extraction and normalization core for family activity listings.
//!
//! Raw page text flows through the block segmenter and field extractor into
//! partial records; arbitrarily-shaped JSON payloads flow through the schema
//! normalizer into one canonical record with full field provenance. Both
//! paths are pure, synchronous transformations; the application layer adds
//! metrics, stats, and async output ports around them.

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

pub mod observability;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

use domain::ExtractedEvent;
use pipeline::processing::extractor::FieldExtractor;
use pipeline::processing::normalize::{NormalizeOutcome, SchemaNormalizer, SchemaType};
use pipeline::processing::segmenter::BlockSegmenter;

/// Segment a raw text document and extract a partial record per block.
/// Never fails: unextractable documents yield an empty list.
pub fn extract(raw_text: &str) -> Vec<ExtractedEvent> {
    let segmenter = BlockSegmenter::new();
    let extractor = FieldExtractor::new();
    segmenter
        .segment(raw_text)
        .iter()
        .map(|block| extractor.extract(block))
        .collect()
}

/// Normalize an arbitrarily-shaped payload into one canonical activity with
/// a field-provenance report. `schema_type` must be one of the literals in
/// [`constants::supported_schema_types`]; anything else is an input error.
pub fn normalize(
    payload: &serde_json::Value,
    schema_type: &str,
    source_url: &str,
) -> error::Result<NormalizeOutcome> {
    let schema: SchemaType = schema_type.parse()?;
    SchemaNormalizer::new().normalize(payload, schema, source_url)
}
