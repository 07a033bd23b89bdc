/// Schema type constants to ensure consistency across the codebase
/// These constants define the literal schema names accepted at the normalizer boundary

// Schema type names (used in CLI and by upstream extraction clients)
pub const EVENTS_SCHEMA: &str = "events";
pub const ACTIVITIES_SCHEMA: &str = "activities";
pub const VENUES_SCHEMA: &str = "venues";
pub const CUSTOM_SCHEMA: &str = "custom";

// Sentinel source-field names recorded in field mappings when no alias matched
pub const SOURCE_NOT_FOUND: &str = "not_found";
pub const SOURCE_DERIVED: &str = "derived";
pub const SOURCE_DEFAULT: &str = "default";

/// Get all supported schema type names
pub fn supported_schema_types() -> Vec<&'static str> {
    vec![EVENTS_SCHEMA, ACTIVITIES_SCHEMA, VENUES_SCHEMA, CUSTOM_SCHEMA]
}
