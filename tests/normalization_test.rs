use serde_json::{json, Value};

use fae_extractor::domain::{MappingKind, PriceType};
use fae_extractor::normalize;

const SOURCE: &str = "https://calendar.example.com/family";

#[test]
fn well_structured_payload_converts_with_high_confidence() {
    let payload = json!({"events": [{
        "title": "Family Art Workshop",
        "description": "Drop-in art making for kids and their grown-ups, materials provided.",
        "date": "2025-02-01",
        "time": "10:00 AM",
        "location": "Fremont Community Center",
        "price": "$10 per family",
        "ages": "toddlers to teens"
    }]});

    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    let record = outcome.record.expect("record should be present");
    assert!(outcome.confidence > 50.0);
    assert_eq!(record.title, "Family Art Workshop");
    assert_eq!(record.schedule.start_date, "2025-02-01");
    assert_eq!(record.schedule.start_time.as_deref(), Some("10:00"));
    assert_eq!(record.location.city, "Seattle");
    assert_eq!(record.pricing.price_type, PriceType::Paid);
    assert_eq!(record.pricing.cost, Some(10.0));
    assert_eq!(record.source.domain, "calendar.example.com");
}

#[test]
fn empty_events_array_is_a_success_with_null_record() {
    let payload = json!({"events": []});
    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    assert!(outcome.record.is_none());
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(outcome.issues, vec!["no events found".to_string()]);
}

#[test]
fn wrong_top_level_key_resolves_through_alternative_array() {
    let payload = json!({"activities": [{
        "name": "Test",
        "when": "2024-12-15",
        "where": "X",
        "cost": "$25"
    }]});

    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    let record = outcome.record.expect("alternative array should be used");
    assert_eq!(record.title, "Test");
    assert_eq!(record.schedule.start_date, "2024-12-15");
    assert_eq!(record.pricing.cost, Some(25.0));

    let title_mapping = &outcome.field_mappings["title"];
    assert_eq!(title_mapping.mapping_kind, MappingKind::Fallback);
    assert_eq!(title_mapping.source_field, "name");
    assert!(outcome
        .issues
        .iter()
        .any(|i| i.contains("expected key 'events' not found")));

    // The same data under canonical key names scores strictly higher.
    let canonical = json!({"events": [{
        "title": "Test",
        "date": "2024-12-15",
        "location": "X",
        "price": "$25"
    }]});
    let canonical_outcome = normalize(&canonical, "events", SOURCE).unwrap();
    assert!(outcome.confidence < canonical_outcome.confidence);
}

#[test]
fn any_event_ish_top_level_array_is_usable() {
    let payload = json!({
        "page": 1,
        "items": [{"title": "Puppet Show", "date": "2025-03-01"}]
    });
    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    assert_eq!(outcome.record.unwrap().title, "Puppet Show");
}

#[test]
fn null_payload_is_an_input_error() {
    assert!(normalize(&Value::Null, "events", SOURCE).is_err());
}

#[test]
fn empty_object_payload_is_an_input_error() {
    assert!(normalize(&json!({}), "events", SOURCE).is_err());
}

#[test]
fn unknown_schema_type_is_an_input_error() {
    let payload = json!({"events": []});
    assert!(normalize(&payload, "gatherings", SOURCE).is_err());
}

#[test]
fn expected_key_with_wrong_shape_is_an_input_error() {
    let payload = json!({"events": "not an array"});
    assert!(normalize(&payload, "events", SOURCE).is_err());
}

#[test]
fn payload_without_any_array_is_an_input_error() {
    let payload = json!({"note": "nothing to see here"});
    assert!(normalize(&payload, "custom", SOURCE).is_err());
}

#[test]
fn normalize_is_idempotent() {
    // scraped_at in the payload makes the record fully deterministic.
    let payload = json!({"events": [{
        "title": "Toddler Gym",
        "date": "Every Tuesday",
        "location": "Ballard Community Center",
        "price": "Free",
        "scraped_at": "2025-01-05T08:00:00Z"
    }]});

    let first = normalize(&payload, "events", SOURCE).unwrap();
    let second = normalize(&payload, "events", SOURCE).unwrap();
    assert_eq!(first.record, second.record);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.issues, second.issues);
}

#[test]
fn every_populated_field_carries_provenance() {
    let payload = json!({"events": [{
        "title": "Science Storytime",
        "date": "2025-04-12",
        "location": "Greenwood Library",
        "price": "Free"
    }]});

    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    assert!(outcome.record.is_some());
    for target in ["title", "date", "location", "price", "age_groups", "status"] {
        let mapping = outcome
            .field_mappings
            .get(target)
            .unwrap_or_else(|| panic!("missing mapping for {}", target));
        assert_eq!(mapping.target_field, target);
        assert!(!mapping.attempted_fields.is_empty() || target == "id");
    }
    // Resolved fields name their winning source; defaulted fields say so.
    assert_eq!(outcome.field_mappings["title"].source_field, "title");
    assert_eq!(outcome.field_mappings["status"].source_field, "default");
}

#[test]
fn custom_schema_searches_without_expectation_issues() {
    let payload = json!({"records": [{"title": "Harvest Festival", "date": "2024-10-05"}]});
    let outcome = normalize(&payload, "custom", SOURCE).unwrap();
    assert_eq!(outcome.record.unwrap().title, "Harvest Festival");
    assert!(!outcome
        .issues
        .iter()
        .any(|i| i.contains("expected key")));
}

#[tokio::test]
async fn ndjson_adapter_persists_outcomes() {
    use fae_extractor::app::normalize_use_case::NormalizeUseCase;
    use fae_extractor::config::ExtractorConfig;
    use fae_extractor::infra::output_adapter::NdjsonOutputAdapter;
    use fae_extractor::observability::PipelineStats;
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outcomes.ndjson");
    let adapter = NdjsonOutputAdapter::new(path.to_str().unwrap()).unwrap();
    let use_case = NormalizeUseCase::new(
        &ExtractorConfig::default(),
        Arc::new(PipelineStats::new()),
        Box::new(adapter),
    );

    let payload = json!({"events": [{"title": "Harvest Fair", "date": "2024-10-05"}]});
    use_case
        .normalize_payload(&payload, "events", SOURCE)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let line: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(line["record"]["title"], "Harvest Fair");
}

#[test]
fn all_structurally_bad_items_yield_null_record_success() {
    let payload = json!({"events": [null, 42, {}]});
    let outcome = normalize(&payload, "events", SOURCE).unwrap();
    assert!(outcome.record.is_none());
    assert_eq!(outcome.confidence, 0.0);
    assert!(outcome
        .issues
        .iter()
        .any(|i| i.contains("no convertible events found")));
}
