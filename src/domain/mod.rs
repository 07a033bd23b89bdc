use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unit used by an age range boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Months,
    Years,
}

/// Audience age bands recognized across extraction and normalization.
/// A block or payload may map to several bands at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeCategory {
    Infant,
    Toddler,
    Preschool,
    Elementary,
    Tween,
    Teen,
    Adult,
    AllAges,
}

impl AgeCategory {
    /// Canonical (min, max, unit) range for the band. Infants are measured
    /// in months, everything else in years.
    pub fn range(&self) -> (u32, u32, AgeUnit) {
        match self {
            AgeCategory::Infant => (0, 12, AgeUnit::Months),
            AgeCategory::Toddler => (1, 3, AgeUnit::Years),
            AgeCategory::Preschool => (3, 5, AgeUnit::Years),
            AgeCategory::Elementary => (5, 11, AgeUnit::Years),
            AgeCategory::Tween => (9, 12, AgeUnit::Years),
            AgeCategory::Teen => (13, 17, AgeUnit::Years),
            AgeCategory::Adult => (18, 99, AgeUnit::Years),
            AgeCategory::AllAges => (0, 99, AgeUnit::Years),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeCategory::Infant => "infant",
            AgeCategory::Toddler => "toddler",
            AgeCategory::Preschool => "preschool",
            AgeCategory::Elementary => "elementary",
            AgeCategory::Tween => "tween",
            AgeCategory::Teen => "teen",
            AgeCategory::Adult => "adult",
            AgeCategory::AllAges => "all-ages",
        }
    }
}

/// A contiguous span of source lines believed to describe one activity.
/// Ephemeral: produced by the segmenter, consumed once by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    pub title: String,
    pub lines: Vec<String>,
    /// Line index in the source document where this block starts.
    pub start_index: usize,
    /// Line index of the last line belonging to this block (inclusive).
    pub end_index: usize,
}

/// Partial record pulled out of one block, or supplied by an upstream
/// extraction client. Every field except `title` may legitimately be empty;
/// absence is the validator's business, not the extractor's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub title: String,
    pub description: String,
    pub date_text: String,
    pub time_text: String,
    pub location_text: String,
    pub price_text: String,
    pub age_group_tags: BTreeSet<AgeCategory>,
    pub raw_block_text: String,
}

/// Outcome of scoring a partial record. Recomputed on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// False only when a fatal problem (missing title) was found.
    pub is_valid: bool,
    /// 0.0 to 100.0, higher is more complete.
    pub confidence: f64,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// How often a scheduled activity repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleType {
    OneTime,
    Recurring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Canonical `YYYY-MM-DD` when the source date parsed; the verbatim
    /// source string otherwise (flagged as an issue by the normalizer).
    pub start_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub schedule_type: ScheduleType,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: Option<String>,
    pub city: String,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Free,
    Paid,
    Donation,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub price_type: PriceType,
    pub cost: Option<f64>,
    pub currency: String,
    /// The original price text, kept for operator review.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub url: String,
    pub domain: String,
    pub scraped_at: DateTime<Utc>,
}

/// The normalized target record handed off for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalActivity {
    pub id: Uuid,
    pub title: String,
    pub activity_type: String,
    pub category: String,
    pub status: String,
    pub schedule: Schedule,
    pub location: Location,
    pub pricing: Pricing,
    pub age_groups: Vec<AgeCategory>,
    pub source: SourceInfo,
}

/// How a target field's value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    /// The primary source field name matched.
    Direct,
    /// A lower-ranked alias matched.
    Fallback,
    /// Constructed from other fields or the source URL.
    Derived,
    /// Hardcoded default, lowest confidence.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Invalid,
    NotValidated,
}

/// Provenance for one target field of a normalized record. Created once per
/// normalization run and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub target_field: String,
    /// The winning source field name, or one of the `not_found` / `derived`
    /// / `default` sentinels from `constants`.
    pub source_field: String,
    /// Every source field name that was tried, in order, including the winner.
    pub attempted_fields: Vec<String>,
    pub mapping_kind: MappingKind,
    /// 0.0 to 1.0: mapping-kind base confidence scaled by field validation.
    pub confidence: f64,
    pub validation_status: ValidationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_category_serializes_to_kebab_case() {
        let json = serde_json::to_string(&AgeCategory::AllAges).unwrap();
        assert_eq!(json, "\"all-ages\"");
        let back: AgeCategory = serde_json::from_str("\"preschool\"").unwrap();
        assert_eq!(back, AgeCategory::Preschool);
    }

    #[test]
    fn infant_range_is_in_months() {
        let (min, max, unit) = AgeCategory::Infant.range();
        assert_eq!((min, max), (0, 12));
        assert_eq!(unit, AgeUnit::Months);
        let (_, _, unit) = AgeCategory::Teen.range();
        assert_eq!(unit, AgeUnit::Years);
    }
}
