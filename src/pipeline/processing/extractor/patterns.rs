//! Ordered pattern tables for field extraction.
//!
//! Each field has a prioritized rule list: rules are tried top to bottom and
//! the first match wins. Precedence is data, not code — reordering a table
//! changes behavior, and the tests below pin the orderings that matter
//! (labeled lines beat free-text keywords, free-ness beats bare numbers).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::AgeCategory;

/// One prioritized extraction rule. `name` shows up in logs and tests.
pub struct FieldRule {
    pub name: &'static str,
    pub regex: Regex,
}

fn rule(name: &'static str, pattern: &'static str) -> FieldRule {
    FieldRule {
        name,
        regex: Regex::new(pattern).unwrap(),
    }
}

pub static DATE_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        rule("labeled_date", r"(?im)^\s*(?:dates?|when)\s*:\s*(\S.*)$"),
        rule("iso_date", r"\b(\d{4}-\d{2}-\d{2})\b"),
        rule(
            "month_name_date",
            r"(?i)\b((?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept?|oct|nov|dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:\s*[-–]\s*\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s*\d{4})?)\b",
        ),
        rule("slash_date", r"\b(\d{1,2}/\d{1,2}/\d{2,4})\b"),
        rule(
            "recurring_weekday",
            r"(?i)\b((?:every|each)\s+(?:mon|tues?|wed(?:nes)?|thu(?:rs)?|fri|sat(?:ur)?|sun)[a-z]*(?:\s*(?:and|&|,)\s*(?:mon|tues?|wed(?:nes)?|thu(?:rs)?|fri|sat(?:ur)?|sun)[a-z]*)*)\b",
        ),
        rule(
            "plural_weekday",
            r"\b((?:Mon|Tues|Wednes|Thurs|Fri|Satur|Sun)days)\b",
        ),
    ]
});

pub static TIME_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        rule("labeled_time", r"(?im)^\s*(?:times?|hours?)\s*:\s*(\S.*)$"),
        rule(
            "clock_range",
            r"(?i)\b(\d{1,2}(?::\d{2})?\s*(?:am|pm)?\s*[-–]\s*\d{1,2}(?::\d{2})?\s*(?:am|pm))\b",
        ),
        rule("twelve_hour", r"(?i)\b(\d{1,2}(?::\d{2})?\s*(?:am|pm))\b"),
        rule("twenty_four_hour", r"\b((?:[01]?\d|2[0-3]):[0-5]\d)\b"),
    ]
});

pub static LOCATION_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        rule(
            "labeled_location",
            r"(?im)^\s*(?:locations?|venue|where|address)\s*:\s*(\S.*)$",
        ),
        rule(
            "at_proper_venue",
            r"\b[Aa]t\s+(?:[Tt]he\s+)?([A-Z][A-Za-z'&.-]*(?:\s+(?:[A-Z&][A-Za-z'&.-]*|of|the|and))*\s+(?:Library|Park|Center|Centre|Museum|Theater|Theatre|Zoo|Aquarium|School|Church|Gym|Studio|Hall|Playground|Farm|Gardens?))\b",
        ),
        rule(
            "venue_keyword",
            r"(?i)\b((?:[\w'&.-]+\s+){0,4}(?:library|park|community center|center|centre|museum|theater|theatre|zoo|aquarium|playground|farm|gardens?))\b",
        ),
    ]
});

pub static PRICE_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        rule(
            "labeled_price",
            r"(?im)^\s*(?:prices?|costs?|admission|fees?|tickets?)\s*:\s*(\S.*)$",
        ),
        rule(
            "dollar_amount",
            r"(\$\s?\d+(?:\.\d{2})?(?:\s*[-–]\s*\$?\d+(?:\.\d{2})?)?(?:\s*(?:per|/)\s*\w+)?)",
        ),
        rule(
            "free_keyword",
            r"(?i)\b(free(?:\s+(?:admission|entry|event))?|no\s+cost|no\s+charge|complimentary|donations?\s+(?:welcome|appreciated|accepted)|pay\s+what\s+you\s+can)\b",
        ),
        rule("worded_amount", r"(?i)\b(\d+(?:\.\d{2})?\s+dollars?)\b"),
    ]
});

/// One age-mapping rule. Unlike the tables above, every matching rule
/// contributes its category — age bands are multi-valued.
pub struct AgeRule {
    pub name: &'static str,
    pub regex: Regex,
    pub category: AgeCategory,
}

fn age_rule(name: &'static str, pattern: &'static str, category: AgeCategory) -> AgeRule {
    AgeRule {
        name,
        regex: Regex::new(pattern).unwrap(),
        category,
    }
}

pub static AGE_RULES: Lazy<Vec<AgeRule>> = Lazy::new(|| {
    vec![
        age_rule(
            "infant",
            r"(?i)\b(?:infants?|bab(?:y|ies)|newborns?|0\s*[-–]\s*12\s*months?|under\s+(?:1|one)\b)",
            AgeCategory::Infant,
        ),
        age_rule(
            "toddler",
            r"(?i)\b(?:toddlers?|little\s+ones|ages?\s*1\s*[-–]\s*3\b)",
            AgeCategory::Toddler,
        ),
        age_rule(
            "preschool",
            r"(?i)\b(?:pre[-\s]?school(?:ers?)?|pre[-\s]?k|ages?\s*3\s*[-–]\s*5\b)",
            AgeCategory::Preschool,
        ),
        age_rule(
            "elementary",
            r"(?i)\b(?:elementary|grade[-\s]school(?:ers?)?|school[-\s]age|kids?|children|ages?\s*5\s*[-–]\s*1[01]\b)",
            AgeCategory::Elementary,
        ),
        age_rule(
            "tween",
            r"(?i)\b(?:tweens?|middle\s+school(?:ers?)?|ages?\s*9\s*[-–]\s*12\b)",
            AgeCategory::Tween,
        ),
        age_rule(
            "teen",
            r"(?i)\b(?:teens?|teenagers?|high\s+school(?:ers?)?|youth|ages?\s*13\s*[-–]\s*1[4-7]\b)",
            AgeCategory::Teen,
        ),
        age_rule(
            "adult",
            r"(?i)\b(?:adults?|grown[-\s]?ups?|parents?|caregivers?|(?:18|21)\s*\+)",
            AgeCategory::Adult,
        ),
        age_rule(
            "all_ages",
            r"(?i)\b(?:all[-\s]ages?|every(?:one|body)|whole\s+family|family[-\s]friendly|families)\b",
            AgeCategory::AllAges,
        ),
    ]
});

/// Returns the first rule match in table order, preferring capture group 1
/// when the rule defines one.
pub fn first_match(rules: &[FieldRule], text: &str) -> String {
    for rule in rules {
        if let Some(caps) = rule.regex.captures(text) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                return m.as_str().trim().to_string();
            }
        }
    }
    String::new()
}

/// Collects every age category whose rule matches, in canonical band order.
pub fn match_age_categories(text: &str) -> Vec<AgeCategory> {
    AGE_RULES
        .iter()
        .filter(|r| r.regex.is_match(text))
        .map(|r| r.category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_date_outranks_inline_date() {
        let text = "Dates: October 1-31, 2024\nVisit us on 2024-12-25 too";
        assert_eq!(first_match(&DATE_RULES, text), "October 1-31, 2024");
    }

    #[test]
    fn inline_iso_date_found_without_label() {
        assert_eq!(
            first_match(&DATE_RULES, "Next session 2024-11-02 at the studio"),
            "2024-11-02"
        );
    }

    #[test]
    fn labeled_location_outranks_venue_keyword() {
        let text = "Location: Ballard Community Center\nMeet near the fountain at Discovery Park";
        assert_eq!(
            first_match(&LOCATION_RULES, text),
            "Ballard Community Center"
        );
    }

    #[test]
    fn dollar_amount_outranks_free_keyword() {
        let text = "$15 adults, free under 2";
        assert_eq!(first_match(&PRICE_RULES, text), "$15");
    }

    #[test]
    fn free_keyword_outranks_bare_numbers() {
        // "2" alone must not be read as a price when free-ness is present.
        let text = "Free for all 2 days";
        assert_eq!(first_match(&PRICE_RULES, text), "Free");
    }

    #[test]
    fn age_matching_is_multi_valued() {
        let tags = match_age_categories("Perfect for toddlers and preschoolers; parents stay");
        assert!(tags.contains(&AgeCategory::Toddler));
        assert!(tags.contains(&AgeCategory::Preschool));
        assert!(tags.contains(&AgeCategory::Adult));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn time_range_outranks_single_time() {
        assert_eq!(
            first_match(&TIME_RULES, "Drop in 10:00 AM - 2:00 PM daily"),
            "10:00 AM - 2:00 PM"
        );
    }
}
