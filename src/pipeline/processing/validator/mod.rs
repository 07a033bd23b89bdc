use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{ExtractedEvent, ValidationResult, ValidationStatus};

/// Whether the record being scored is raw extractor output or has already
/// been through schema conversion. Post-conversion, unparseable date/time
/// values were deliberately kept verbatim and flagged by the normalizer, so
/// the validator notes them without deducting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    PreConversion,
    PostConversion,
}

/// Fixed deduction weights for the completeness score. The scale starts at
/// 100 and is floored at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub missing_title: f64,
    pub short_title: f64,
    pub overlong_title: f64,
    pub missing_description: f64,
    pub short_description: f64,
    pub missing_date: f64,
    pub unparseable_date: f64,
    pub missing_time: f64,
    pub unparseable_time: f64,
    pub missing_location: f64,
    pub brief_location: f64,
    pub missing_price: f64,
    pub missing_age_groups: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            missing_title: 50.0,
            short_title: 10.0,
            overlong_title: 5.0,
            missing_description: 15.0,
            short_description: 10.0,
            missing_date: 20.0,
            unparseable_date: 10.0,
            missing_time: 15.0,
            unparseable_time: 5.0,
            missing_location: 25.0,
            brief_location: 10.0,
            missing_price: 10.0,
            missing_age_groups: 10.0,
        }
    }
}

/// Scores a partial record for completeness and shape. Only a missing title
/// is fatal; everything else lowers confidence so that sparse-but-present
/// records flow through annotated instead of being discarded.
pub struct RecordValidator {
    weights: ScoreWeights,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn validate(&self, event: &ExtractedEvent, mode: ValidationMode) -> ValidationResult {
        let w = &self.weights;
        let mut score = 100.0_f64;
        let mut issues = Vec::new();
        let mut warnings = Vec::new();
        let mut is_valid = true;

        let title = event.title.trim();
        if title.is_empty() {
            score -= w.missing_title;
            is_valid = false;
            issues.push("title is missing".to_string());
        } else {
            if title.len() < 3 {
                score -= w.short_title;
                warnings.push("title is shorter than 3 characters".to_string());
            }
            if title.len() > 100 {
                score -= w.overlong_title;
                warnings.push("title is longer than 100 characters".to_string());
            }
        }

        let description = event.description.trim();
        if description.is_empty() {
            score -= w.missing_description;
            issues.push("description is missing".to_string());
        } else if description.len() < 20 {
            score -= w.short_description;
            warnings.push("description is shorter than 20 characters".to_string());
        }

        let date_text = event.date_text.trim();
        if date_text.is_empty() {
            score -= w.missing_date;
            issues.push("date is missing".to_string());
        } else if parse_flexible_date(date_text).is_none() {
            if mode == ValidationMode::PreConversion {
                score -= w.unparseable_date;
            }
            warnings.push(format!(
                "date '{}' does not match a known format; kept as-is",
                date_text
            ));
        }

        let time_text = event.time_text.trim();
        if time_text.is_empty() {
            score -= w.missing_time;
            issues.push("time is missing".to_string());
        } else if parse_flexible_time(time_text).is_none() {
            if mode == ValidationMode::PreConversion {
                score -= w.unparseable_time;
            }
            warnings.push(format!(
                "time '{}' does not match a known format; kept as-is",
                time_text
            ));
        }

        let location = event.location_text.trim();
        if location.is_empty() {
            score -= w.missing_location;
            issues.push("location is missing".to_string());
        } else if location.len() < 3 {
            score -= w.brief_location;
            warnings.push("location is suspiciously brief".to_string());
        }

        if event.price_text.trim().is_empty() {
            score -= w.missing_price;
            issues.push("price is missing".to_string());
        }

        if event.age_group_tags.is_empty() {
            score -= w.missing_age_groups;
            issues.push("no age groups identified".to_string());
        }

        ValidationResult {
            is_valid,
            confidence: score.max(0.0),
            issues,
            warnings,
        }
    }

    /// Per-field validation used by the schema normalizer when composing
    /// field-mapping confidence. Returns a status and a 0.0-1.0 multiplier.
    pub fn validate_field(&self, target_field: &str, value: &str) -> (ValidationStatus, f64) {
        let value = value.trim();
        if value.is_empty() {
            return (ValidationStatus::Invalid, 0.0);
        }
        match target_field {
            "title" => {
                if value.len() < 3 {
                    (ValidationStatus::Warning, 0.5)
                } else if value.len() > 100 {
                    (ValidationStatus::Warning, 0.8)
                } else {
                    (ValidationStatus::Valid, 1.0)
                }
            }
            "description" => {
                if value.len() < 20 {
                    (ValidationStatus::Warning, 0.7)
                } else {
                    (ValidationStatus::Valid, 1.0)
                }
            }
            "date" => {
                if parse_flexible_date(value).is_some() {
                    (ValidationStatus::Valid, 1.0)
                } else {
                    (ValidationStatus::Warning, 0.6)
                }
            }
            "time" => {
                if parse_flexible_time(value).is_some() {
                    (ValidationStatus::Valid, 1.0)
                } else {
                    (ValidationStatus::Warning, 0.7)
                }
            }
            "location" => {
                if value.len() < 3 {
                    (ValidationStatus::Warning, 0.6)
                } else {
                    (ValidationStatus::Valid, 1.0)
                }
            }
            "price" => (ValidationStatus::Valid, 1.0),
            _ => (ValidationStatus::NotValidated, 1.0),
        }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept?|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*[-–]\s*\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s*(\d{4}))?",
    )
    .unwrap()
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%Y"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I %p", "%H:%M"];

fn month_number(name: &str) -> Option<u32> {
    let key = name.to_lowercase();
    let n = match &key[..3.min(key.len())] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parses a date from the fixed allow-list of literal formats: ISO, slash
/// and dash dates, and "Month D[, YYYY]" with an optional day range (the
/// range start wins). Anything else is a caller-side warning, never an error.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Some(caps) = MONTH_DATE_RE.captures(trimmed) {
        let month = month_number(caps.get(1)?.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => Utc::now().year(),
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parses a clock time from the fixed allow-list: 12-hour with am/pm,
/// 24-hour, or a range (the range start wins).
pub fn parse_flexible_time(text: &str) -> Option<NaiveTime> {
    let mut candidate = text.trim().to_uppercase();

    // For ranges like "10:00 AM - 2:00 PM", score the start.
    if let Some(split) = candidate.split_once('-').or_else(|| candidate.split_once('–')) {
        let start = split.0.trim();
        // A bare-start range ("10 - 2 PM") inherits the meridiem of the end.
        if !start.contains("AM") && !start.contains("PM") {
            let meridiem = if split.1.contains("PM") {
                " PM"
            } else if split.1.contains("AM") {
                " AM"
            } else {
                ""
            };
            candidate = format!("{}{}", start, meridiem);
        } else {
            candidate = start.to_string();
        }
    }
    let candidate = candidate.trim();

    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(candidate, format) {
            return Some(time);
        }
    }
    // "7 PM" style without minutes.
    if let Some((hour_part, meridiem)) = candidate.split_once(' ') {
        if meridiem == "AM" || meridiem == "PM" {
            if let Ok(hour) = hour_part.parse::<u32>() {
                if (1..=12).contains(&hour) {
                    let hour24 = match (hour, meridiem) {
                        (12, "AM") => 0,
                        (12, "PM") => 12,
                        (h, "PM") => h + 12,
                        (h, _) => h,
                    };
                    return NaiveTime::from_hms_opt(hour24, 0, 0);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgeCategory;
    use std::collections::BTreeSet;

    fn complete_event() -> ExtractedEvent {
        ExtractedEvent {
            title: "Pumpkin Patch & Fall Festival".to_string(),
            description: "Hay rides, corn maze, and a pumpkin cannon all month long.".to_string(),
            date_text: "October 1-31, 2024".to_string(),
            time_text: "10:00 AM - 6:00 PM".to_string(),
            location_text: "Harvest Farm".to_string(),
            price_text: "$15".to_string(),
            age_group_tags: BTreeSet::from([AgeCategory::AllAges]),
            raw_block_text: String::new(),
        }
    }

    #[test]
    fn complete_record_scores_full_marks() {
        let validator = RecordValidator::new();
        let result = validator.validate(&complete_event(), ValidationMode::PreConversion);
        assert!(result.is_valid);
        assert_eq!(result.confidence, 100.0);
        assert!(result.issues.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_title_is_fatal() {
        let validator = RecordValidator::new();
        let mut event = complete_event();
        event.title = String::new();
        let result = validator.validate(&event, ValidationMode::PreConversion);
        assert!(!result.is_valid);
        assert_eq!(result.confidence, 50.0);
    }

    #[test]
    fn sparse_record_is_still_valid_at_low_confidence() {
        let validator = RecordValidator::new();
        let event = ExtractedEvent {
            title: "Mystery Event".to_string(),
            ..Default::default()
        };
        let result = validator.validate(&event, ValidationMode::PreConversion);
        assert!(result.is_valid);
        // 100 - 15 - 20 - 15 - 25 - 10 - 10 = 5
        assert_eq!(result.confidence, 5.0);
        assert_eq!(result.issues.len(), 6);
    }

    #[test]
    fn score_floors_at_zero() {
        let validator = RecordValidator::new();
        let event = ExtractedEvent {
            title: "ab".to_string(),
            ..Default::default()
        };
        let result = validator.validate(&event, ValidationMode::PreConversion);
        assert!(result.confidence >= 0.0);
    }

    #[test]
    fn unparseable_date_warns_without_rejecting() {
        let validator = RecordValidator::new();
        let mut event = complete_event();
        event.date_text = "sometime next month".to_string();
        let result = validator.validate(&event, ValidationMode::PreConversion);
        assert!(result.is_valid);
        assert_eq!(result.confidence, 90.0);
        assert!(result.warnings.iter().any(|w| w.contains("sometime next month")));
    }

    #[test]
    fn post_conversion_mode_skips_verbatim_date_deduction() {
        let validator = RecordValidator::new();
        let mut event = complete_event();
        event.date_text = "sometime next month".to_string();
        let result = validator.validate(&event, ValidationMode::PostConversion);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn parses_allow_listed_date_formats() {
        assert_eq!(
            parse_flexible_date("2024-12-15"),
            NaiveDate::from_ymd_opt(2024, 12, 15)
        );
        assert_eq!(
            parse_flexible_date("12/15/2024"),
            NaiveDate::from_ymd_opt(2024, 12, 15)
        );
        assert_eq!(
            parse_flexible_date("December 15, 2024"),
            NaiveDate::from_ymd_opt(2024, 12, 15)
        );
        assert_eq!(
            parse_flexible_date("October 1-31, 2024"),
            NaiveDate::from_ymd_opt(2024, 10, 1)
        );
        assert!(parse_flexible_date("whenever").is_none());
    }

    #[test]
    fn parses_allow_listed_time_formats() {
        assert_eq!(
            parse_flexible_time("10:30 AM"),
            NaiveTime::from_hms_opt(10, 30, 0)
        );
        assert_eq!(
            parse_flexible_time("7 pm"),
            NaiveTime::from_hms_opt(19, 0, 0)
        );
        assert_eq!(
            parse_flexible_time("14:45"),
            NaiveTime::from_hms_opt(14, 45, 0)
        );
        assert_eq!(
            parse_flexible_time("10:00 AM - 2:00 PM"),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert!(parse_flexible_time("noonish").is_none());
    }

    #[test]
    fn field_validation_scales_confidence() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate_field("title", "Fall Festival"),
            (ValidationStatus::Valid, 1.0)
        );
        assert_eq!(
            validator.validate_field("location", "X"),
            (ValidationStatus::Warning, 0.6)
        );
        assert_eq!(
            validator.validate_field("date", "not a date"),
            (ValidationStatus::Warning, 0.6)
        );
        assert_eq!(
            validator.validate_field("title", ""),
            (ValidationStatus::Invalid, 0.0)
        );
    }
}
