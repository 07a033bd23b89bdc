pub mod aliases;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::config::ExtractorConfig;
use crate::constants::{self, ACTIVITIES_SCHEMA, CUSTOM_SCHEMA, EVENTS_SCHEMA, VENUES_SCHEMA};
use crate::domain::{
    CanonicalActivity, FieldMapping, Location, MappingKind, PriceType, Pricing, Schedule,
    ScheduleType, SourceInfo, ValidationStatus,
};
use crate::error::{ExtractorError, Result};
use crate::pipeline::processing::extractor::patterns::match_age_categories;
use crate::pipeline::processing::extractor::title_case;
use crate::pipeline::processing::validator::{
    parse_flexible_date, parse_flexible_time, RecordValidator,
};

/// Declared shape of an incoming payload. Anything outside this list is an
/// input error at the boundary, not a recoverable data-quality problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Events,
    Activities,
    Venues,
    Custom,
}

impl SchemaType {
    /// The top-level key this schema is expected to keep its records under.
    /// Custom payloads have no expectation and are always searched.
    pub fn expected_key(&self) -> Option<&'static str> {
        match self {
            SchemaType::Events => Some("events"),
            SchemaType::Activities => Some("activities"),
            SchemaType::Venues => Some("venues"),
            SchemaType::Custom => None,
        }
    }
}

impl FromStr for SchemaType {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            EVENTS_SCHEMA => Ok(SchemaType::Events),
            ACTIVITIES_SCHEMA => Ok(SchemaType::Activities),
            VENUES_SCHEMA => Ok(SchemaType::Venues),
            CUSTOM_SCHEMA => Ok(SchemaType::Custom),
            other => Err(ExtractorError::UnknownSchemaType(other.to_string())),
        }
    }
}

/// Everything a normalization run produces: the canonical record (absent
/// when the payload legitimately contained nothing), the aggregate
/// confidence, recoverable issues, and per-field provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeOutcome {
    pub record: Option<CanonicalActivity>,
    pub confidence: f64,
    pub issues: Vec<String>,
    pub field_mappings: BTreeMap<String, FieldMapping>,
}

fn base_confidence(kind: MappingKind) -> f64 {
    match kind {
        MappingKind::Direct => 0.9,
        MappingKind::Fallback => 0.7,
        MappingKind::Derived => 0.6,
        MappingKind::Default => 0.3,
    }
}

/// Result of walking one alias list over a payload item.
struct Resolved {
    value: Option<String>,
    source_field: String,
    attempted: Vec<String>,
    kind: MappingKind,
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Duck-typed sources sometimes hand a list where a scalar belongs;
        // the string elements joined make a usable text value.
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

fn resolve_aliases(item: &Map<String, Value>, alias_list: &[&str]) -> Resolved {
    let mut attempted = Vec::new();
    for (idx, alias) in alias_list.iter().enumerate() {
        attempted.push(alias.to_string());
        if let Some(value) = item.get(*alias).and_then(value_as_text) {
            let kind = if idx == 0 {
                MappingKind::Direct
            } else {
                MappingKind::Fallback
            };
            return Resolved {
                value: Some(value),
                source_field: alias.to_string(),
                attempted,
                kind,
            };
        }
    }
    Resolved {
        value: None,
        source_field: constants::SOURCE_NOT_FOUND.to_string(),
        attempted,
        kind: MappingKind::Default,
    }
}

/// Host portion of a URL, tolerating a missing scheme.
pub fn domain_of(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .to_string()
}

static FREE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:free|no\s+cost|no\s+charge|complimentary)\b").unwrap());
static DONATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:donations?|pay\s+what\s+you\s+can|suggested\s+contribution)\b").unwrap()
});
static DOLLAR_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*(\d+(?:\.\d{1,2})?)").unwrap());
static BARE_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d{1,2})?)\b").unwrap());
static RECURRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:every|each|weekly|daily|monthly|recurring)\b|\b(?:Mon|Tues|Wednes|Thurs|Fri|Satur|Sun)days\b",
    )
    .unwrap()
});

/// Keyword tables for deriving activity type and category from title text.
const TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("class", "class"),
    ("workshop", "workshop"),
    ("camp", "camp"),
    ("festival", "festival"),
    ("fair", "festival"),
    ("concert", "performance"),
    ("show", "performance"),
    ("storytime", "storytime"),
    ("story time", "storytime"),
];

const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("music", "music"),
    ("concert", "music"),
    ("art", "arts"),
    ("craft", "arts"),
    ("science", "education"),
    ("stem", "education"),
    ("museum", "education"),
    ("story", "literacy"),
    ("book", "literacy"),
    ("hike", "outdoor"),
    ("nature", "outdoor"),
    ("park", "outdoor"),
    ("swim", "sports"),
    ("soccer", "sports"),
    ("yoga", "sports"),
];

/// Reconciles an arbitrarily-shaped payload into one [`CanonicalActivity`]
/// with full field provenance. Input-shape problems are hard errors;
/// everything else is recovered with a default, a lowered confidence, and a
/// recorded issue.
pub struct SchemaNormalizer {
    config: ExtractorConfig,
    validator: RecordValidator,
}

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            validator: RecordValidator::new(),
        }
    }

    pub fn normalize(
        &self,
        payload: &Value,
        schema_type: SchemaType,
        source_url: &str,
    ) -> Result<NormalizeOutcome> {
        let root = payload.as_object().ok_or_else(|| {
            ExtractorError::InvalidPayload("payload is not a JSON object".to_string())
        })?;
        if root.is_empty() {
            return Err(ExtractorError::InvalidPayload(
                "payload is an empty object".to_string(),
            ));
        }

        let mut issues = Vec::new();
        let items = self.resolve_array(root, schema_type, &mut issues)?;

        let mut chosen: Option<&Map<String, Value>> = None;
        let mut chosen_index = 0;
        for (index, item) in items.iter().enumerate() {
            match item.as_object() {
                Some(map) if !map.is_empty() => {
                    chosen = Some(map);
                    chosen_index = index;
                    break;
                }
                Some(_) => issues.push(format!("item {} is an empty object; skipped", index)),
                None => issues.push(format!("item {} is not an object; skipped", index)),
            }
        }

        let Some(item) = chosen else {
            if items.is_empty() {
                issues.push("no events found".to_string());
            } else {
                issues.push("no convertible events found".to_string());
            }
            return Ok(NormalizeOutcome {
                record: None,
                confidence: 0.0,
                issues,
                field_mappings: BTreeMap::new(),
            });
        };

        let remaining = items.len() - chosen_index - 1;
        if remaining > 0 {
            // Known single-record limitation; surfaced, never silent.
            issues.push(format!(
                "{} additional item(s) in payload were not converted",
                remaining
            ));
        }

        let (record, field_mappings) = self.convert_item(item, source_url, &mut issues);
        let confidence = self.overall_confidence(&field_mappings, &issues);
        debug!(confidence, issues = issues.len(), "normalize: item converted");

        Ok(NormalizeOutcome {
            record: Some(record),
            confidence,
            issues,
            field_mappings,
        })
    }

    /// Finds the record array: the schema's expected key when present, the
    /// best-scoring alternative array otherwise. A present-but-wrong-shape
    /// expected key and an array-free payload are both input errors.
    fn resolve_array<'a>(
        &self,
        root: &'a Map<String, Value>,
        schema_type: SchemaType,
        issues: &mut Vec<String>,
    ) -> Result<&'a Vec<Value>> {
        if let Some(key) = schema_type.expected_key() {
            match root.get(key) {
                Some(Value::Array(items)) => return Ok(items),
                Some(_) => {
                    return Err(ExtractorError::InvalidPayload(format!(
                        "expected '{}' to be an array",
                        key
                    )))
                }
                None => {}
            }
        }

        let mut best: Option<(&str, &'a Vec<Value>, i32)> = None;
        for (key, value) in root {
            if let Value::Array(items) = value {
                let key_lower = key.to_lowercase();
                let mut score = 0;
                if aliases::ARRAY_KEY_TERMS
                    .iter()
                    .any(|term| key_lower.contains(term))
                {
                    score += 2;
                }
                if !items.is_empty() && items.iter().all(|i| i.is_object()) {
                    score += 1;
                }
                let better = match &best {
                    Some((_, _, s)) => score > *s,
                    None => true,
                };
                if better {
                    best = Some((key.as_str(), items, score));
                }
            }
        }

        match best {
            Some((key, items, _)) => {
                if let Some(expected) = schema_type.expected_key() {
                    issues.push(format!(
                        "expected key '{}' not found; used '{}' instead",
                        expected, key
                    ));
                }
                Ok(items)
            }
            None => Err(ExtractorError::InvalidPayload(
                "no record array found under any top-level key".to_string(),
            )),
        }
    }

    fn mapping_from(&self, target: &str, resolved: &Resolved) -> FieldMapping {
        let (status, field_confidence) = match &resolved.value {
            Some(value) => self.validator.validate_field(target, value),
            None => (ValidationStatus::Invalid, 0.0),
        };
        FieldMapping {
            target_field: target.to_string(),
            source_field: resolved.source_field.clone(),
            attempted_fields: resolved.attempted.clone(),
            mapping_kind: resolved.kind,
            confidence: base_confidence(resolved.kind) * field_confidence,
            validation_status: status,
        }
    }

    fn derived_mapping(&self, target: &str, attempted: &[String], value: &str) -> FieldMapping {
        let (status, field_confidence) = self.validator.validate_field(target, value);
        FieldMapping {
            target_field: target.to_string(),
            source_field: constants::SOURCE_DERIVED.to_string(),
            attempted_fields: attempted.to_vec(),
            mapping_kind: MappingKind::Derived,
            confidence: base_confidence(MappingKind::Derived) * field_confidence,
            validation_status: status,
        }
    }

    fn default_mapping(&self, target: &str, attempted: &[String]) -> FieldMapping {
        FieldMapping {
            target_field: target.to_string(),
            source_field: constants::SOURCE_DEFAULT.to_string(),
            attempted_fields: attempted.to_vec(),
            mapping_kind: MappingKind::Default,
            confidence: base_confidence(MappingKind::Default),
            validation_status: ValidationStatus::NotValidated,
        }
    }

    fn convert_item(
        &self,
        item: &Map<String, Value>,
        source_url: &str,
        issues: &mut Vec<String>,
    ) -> (CanonicalActivity, BTreeMap<String, FieldMapping>) {
        let mut mappings = BTreeMap::new();

        let title_res = resolve_aliases(item, aliases::TITLE_ALIASES);
        let desc_res = resolve_aliases(item, aliases::DESCRIPTION_ALIASES);
        let date_res = resolve_aliases(item, aliases::DATE_ALIASES);
        let time_res = resolve_aliases(item, aliases::TIME_ALIASES);
        let end_time_res = resolve_aliases(item, aliases::END_TIME_ALIASES);
        let price_res = resolve_aliases(item, aliases::PRICE_ALIASES);
        let age_res = resolve_aliases(item, aliases::AGE_ALIASES);
        let type_res = resolve_aliases(item, aliases::TYPE_ALIASES);
        let category_res = resolve_aliases(item, aliases::CATEGORY_ALIASES);
        let status_res = resolve_aliases(item, aliases::STATUS_ALIASES);
        let frequency_res = resolve_aliases(item, aliases::FREQUENCY_ALIASES);
        let scraped_res = resolve_aliases(item, aliases::SCRAPED_AT_ALIASES);

        // Location first: the title derivation below may need its name.
        let (location, location_mapping) = self.build_location(item, source_url, issues);
        mappings.insert("location".to_string(), location_mapping);

        // Title: aliases, then "{type} at {location}", then a literal default.
        let title = match &title_res.value {
            Some(value) => {
                mappings.insert("title".to_string(), self.mapping_from("title", &title_res));
                value.clone()
            }
            None => match type_res.value.as_deref() {
                Some(kind) if !location.name.is_empty() => {
                    let derived = format!("{} at {}", title_case(kind), location.name);
                    mappings.insert(
                        "title".to_string(),
                        self.derived_mapping("title", &title_res.attempted, &derived),
                    );
                    issues.push("title not found; derived from type and location".to_string());
                    derived
                }
                _ => {
                    mappings.insert(
                        "title".to_string(),
                        self.default_mapping("title", &title_res.attempted),
                    );
                    issues.push("title not found; using default".to_string());
                    "Untitled Activity".to_string()
                }
            },
        };

        mappings.insert(
            "description".to_string(),
            self.mapping_from("description", &desc_res),
        );

        // Date: canonical YYYY-MM-DD when parseable, verbatim + issue when not.
        let start_date = match &date_res.value {
            Some(raw) => match parse_flexible_date(raw) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => {
                    issues.push(format!(
                        "date '{}' could not be parsed; kept verbatim (expected formats like 2024-12-15 or December 15, 2024)",
                        raw
                    ));
                    raw.clone()
                }
            },
            None => String::new(),
        };
        mappings.insert("date".to_string(), self.mapping_from("date", &date_res));

        // Times: canonical HH:MM where possible; a range feeds end_time too.
        let (start_time, range_end) = match &time_res.value {
            Some(raw) => {
                let start = match parse_flexible_time(raw) {
                    Some(t) => t.format("%H:%M").to_string(),
                    None => {
                        issues.push(format!("time '{}' could not be parsed; kept verbatim", raw));
                        raw.clone()
                    }
                };
                (Some(start), split_time_range_end(raw))
            }
            None => (None, None),
        };
        mappings.insert("time".to_string(), self.mapping_from("time", &time_res));

        let end_time = match &end_time_res.value {
            Some(raw) => {
                mappings.insert(
                    "end_time".to_string(),
                    self.mapping_from("end_time", &end_time_res),
                );
                Some(
                    parse_flexible_time(raw)
                        .map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_else(|| raw.clone()),
                )
            }
            None => range_end.inspect(|end| {
                mappings.insert(
                    "end_time".to_string(),
                    self.derived_mapping("end_time", &end_time_res.attempted, end),
                );
            }),
        };

        // Recurrence markers in the date or frequency text flip the schedule.
        let recurring_source = format!(
            "{} {}",
            date_res.value.as_deref().unwrap_or(""),
            frequency_res.value.as_deref().unwrap_or("")
        );
        let schedule_type = if RECURRING_RE.is_match(&recurring_source) {
            ScheduleType::Recurring
        } else {
            ScheduleType::OneTime
        };
        let frequency = frequency_res
            .value
            .clone()
            .or_else(|| derive_frequency(&recurring_source));

        let (pricing, price_mapping) = self.build_pricing(&price_res);
        mappings.insert("price".to_string(), price_mapping);

        // Age bands map through the same tables the field extractor uses.
        let age_groups = match &age_res.value {
            Some(text) => match_age_categories(text),
            None => Vec::new(),
        };
        mappings.insert(
            "age_groups".to_string(),
            self.mapping_from("age_groups", &age_res),
        );

        let activity_type = self.resolve_keyword_field(
            "activity_type",
            &type_res,
            &title,
            TYPE_KEYWORDS,
            "event",
            &mut mappings,
        );
        let category = self.resolve_keyword_field(
            "category",
            &category_res,
            &title,
            CATEGORY_KEYWORDS,
            "general",
            &mut mappings,
        );

        let status = match &status_res.value {
            Some(value) => {
                mappings.insert(
                    "status".to_string(),
                    self.mapping_from("status", &status_res),
                );
                value.to_lowercase()
            }
            None => {
                mappings.insert(
                    "status".to_string(),
                    self.default_mapping("status", &status_res.attempted),
                );
                "pending_review".to_string()
            }
        };

        let scraped_at = match scraped_res
            .value
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            Some(ts) => {
                mappings.insert(
                    "scraped_at".to_string(),
                    self.mapping_from("scraped_at", &scraped_res),
                );
                ts.with_timezone(&Utc)
            }
            None => {
                mappings.insert(
                    "scraped_at".to_string(),
                    self.default_mapping("scraped_at", &scraped_res.attempted),
                );
                Utc::now()
            }
        };

        // Deterministic id: the same payload and source always converge on
        // the same record identity.
        let id = Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            format!("{}|{}|{}", source_url, title, start_date).as_bytes(),
        );
        mappings.insert(
            "id".to_string(),
            self.derived_mapping("id", &[], &id.to_string()),
        );

        let record = CanonicalActivity {
            id,
            title,
            activity_type,
            category,
            status,
            schedule: Schedule {
                start_date,
                start_time,
                end_time,
                schedule_type,
                frequency,
            },
            location,
            pricing,
            age_groups,
            source: SourceInfo {
                url: source_url.to_string(),
                domain: domain_of(source_url),
                scraped_at,
            },
        };

        (record, mappings)
    }

    /// Resolves location from a string or nested object alias, falling back
    /// to a name derived from the source URL's domain.
    fn build_location(
        &self,
        item: &Map<String, Value>,
        source_url: &str,
        issues: &mut Vec<String>,
    ) -> (Location, FieldMapping) {
        let mut attempted = Vec::new();
        for (idx, alias) in aliases::LOCATION_ALIASES.iter().enumerate() {
            attempted.push(alias.to_string());
            let kind = if idx == 0 {
                MappingKind::Direct
            } else {
                MappingKind::Fallback
            };
            match item.get(*alias) {
                Some(Value::String(s)) if !s.trim().is_empty() => {
                    let text = s.trim();
                    let (city, region) = self.city_region_for(text);
                    let location = Location {
                        name: title_case(text),
                        address: text
                            .chars()
                            .any(|c| c.is_ascii_digit())
                            .then(|| text.to_string()),
                        city,
                        region,
                    };
                    let resolved = Resolved {
                        value: Some(text.to_string()),
                        source_field: alias.to_string(),
                        attempted: attempted.clone(),
                        kind,
                    };
                    return (location, self.mapping_from("location", &resolved));
                }
                Some(Value::Object(nested)) => {
                    let name = nested
                        .get("name")
                        .or_else(|| nested.get("title"))
                        .and_then(|v| v.as_str())
                        .map(str::trim);
                    if let Some(name) = name.filter(|n| !n.is_empty()) {
                        let address = nested
                            .get("address")
                            .or_else(|| nested.get("street"))
                            .and_then(|v| v.as_str())
                            .map(|s| s.trim().to_string());
                        let hint = format!("{} {}", name, address.as_deref().unwrap_or(""));
                        let (fallback_city, fallback_region) = self.city_region_for(&hint);
                        let city = nested
                            .get("city")
                            .and_then(|v| v.as_str())
                            .map(|s| s.trim().to_string())
                            .unwrap_or(fallback_city);
                        let region = nested
                            .get("region")
                            .or_else(|| nested.get("state"))
                            .and_then(|v| v.as_str())
                            .map(|s| s.trim().to_string())
                            .unwrap_or(fallback_region);
                        let location = Location {
                            name: title_case(name),
                            address,
                            city,
                            region,
                        };
                        let resolved = Resolved {
                            value: Some(name.to_string()),
                            source_field: alias.to_string(),
                            attempted: attempted.clone(),
                            kind,
                        };
                        return (location, self.mapping_from("location", &resolved));
                    }
                }
                _ => {}
            }
        }

        let domain = domain_of(source_url);
        if !domain.is_empty() {
            issues.push(format!(
                "location not found; derived venue name from source domain '{}'",
                domain
            ));
            let location = Location {
                name: domain.clone(),
                address: None,
                city: self.config.default_city.clone(),
                region: self.config.default_region.clone(),
            };
            return (
                location,
                self.derived_mapping("location", &attempted, &domain),
            );
        }

        issues.push("location not found".to_string());
        let location = Location {
            name: String::new(),
            address: None,
            city: self.config.default_city.clone(),
            region: self.config.default_region.clone(),
        };
        (location, self.default_mapping("location", &attempted))
    }

    /// Maps free location text onto the neighborhood dictionary.
    fn city_region_for(&self, text: &str) -> (String, String) {
        let lower = text.to_lowercase();
        for (neighborhood, city, region) in aliases::NEIGHBORHOODS {
            if lower.contains(neighborhood) {
                return (city.to_string(), region.to_string());
            }
        }
        (
            self.config.default_city.clone(),
            self.config.default_region.clone(),
        )
    }

    /// Classifies price text: free-ness wins unless a non-zero amount is
    /// present, donations beat numeric parsing, and anything unclassifiable
    /// becomes `variable` with the original text as its description.
    fn build_pricing(&self, price_res: &Resolved) -> (Pricing, FieldMapping) {
        let mapping = self.mapping_from("price", price_res);
        let Some(text) = price_res.value.as_deref() else {
            return (
                Pricing {
                    price_type: PriceType::Variable,
                    cost: None,
                    currency: self.config.default_currency.clone(),
                    description: String::new(),
                },
                mapping,
            );
        };

        let dollar_amount = DOLLAR_AMOUNT_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        let (price_type, cost) = if FREE_RE.is_match(text)
            && dollar_amount.map_or(true, |a| a == 0.0)
        {
            (PriceType::Free, Some(0.0))
        } else if DONATION_RE.is_match(text) && dollar_amount.is_none() {
            (PriceType::Donation, None)
        } else if let Some(amount) = dollar_amount.or_else(|| {
            BARE_AMOUNT_RE
                .captures(text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }) {
            (PriceType::Paid, Some(amount))
        } else {
            (PriceType::Variable, None)
        };

        (
            Pricing {
                price_type,
                cost,
                currency: self.config.default_currency.clone(),
                description: text.to_string(),
            },
            mapping,
        )
    }

    /// Shared direct/derived/default flow for the keyword-derivable scalar
    /// fields (activity type, category).
    fn resolve_keyword_field(
        &self,
        target: &str,
        resolved: &Resolved,
        title: &str,
        keywords: &[(&str, &str)],
        default_value: &str,
        mappings: &mut BTreeMap<String, FieldMapping>,
    ) -> String {
        if let Some(value) = &resolved.value {
            mappings.insert(target.to_string(), self.mapping_from(target, resolved));
            return value.to_lowercase();
        }
        let title_lower = title.to_lowercase();
        if let Some((_, derived)) = keywords.iter().find(|(kw, _)| title_lower.contains(kw)) {
            mappings.insert(
                target.to_string(),
                self.derived_mapping(target, &resolved.attempted, derived),
            );
            return derived.to_string();
        }
        mappings.insert(
            target.to_string(),
            self.default_mapping(target, &resolved.attempted),
        );
        default_value.to_string()
    }

    /// Overall score: 100 minus fixed penalties for source-missing core
    /// fields minus 5 per recorded issue, floored at 0.
    fn overall_confidence(
        &self,
        mappings: &BTreeMap<String, FieldMapping>,
        issues: &[String],
    ) -> f64 {
        let resolved_from_source = |target: &str| {
            mappings.get(target).is_some_and(|m| {
                matches!(m.mapping_kind, MappingKind::Direct | MappingKind::Fallback)
            })
        };
        let mut score = 100.0;
        if !resolved_from_source("title") {
            score -= 25.0;
        }
        if !resolved_from_source("description") {
            score -= 15.0;
        }
        if !resolved_from_source("location") {
            score -= 20.0;
        }
        if !resolved_from_source("date") {
            score -= 20.0;
        }
        score -= 5.0 * issues.len() as f64;
        score.max(0.0)
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulls the end of a clock range like "10:00 AM - 2:00 PM" into canonical
/// HH:MM, when the end parses on its own.
fn split_time_range_end(raw: &str) -> Option<String> {
    let (_, end) = raw.split_once('-').or_else(|| raw.split_once('–'))?;
    parse_flexible_time(end.trim()).map(|t| t.format("%H:%M").to_string())
}

fn derive_frequency(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if lower.contains("daily") || lower.contains("every day") {
        Some("daily".to_string())
    } else if lower.contains("monthly") {
        Some("monthly".to_string())
    } else if RECURRING_RE.is_match(text) {
        Some("weekly".to_string())
    } else {
        None
    }
}
