//! Ranked source-field alias lists for schema normalization.
//!
//! Order matters: the first alias is the canonical name and yields a
//! `direct` mapping; any later alias yields a `fallback` mapping at lower
//! base confidence.

pub const TITLE_ALIASES: &[&str] = &["title", "name", "event_name", "activity_name", "event_title"];

pub const DESCRIPTION_ALIASES: &[&str] = &["description", "desc", "summary", "details", "about"];

pub const DATE_ALIASES: &[&str] = &["date", "start_date", "event_date", "when", "day", "dates"];

pub const TIME_ALIASES: &[&str] = &["time", "start_time", "event_time", "times"];

pub const END_TIME_ALIASES: &[&str] = &["end_time", "ends_at", "until"];

pub const LOCATION_ALIASES: &[&str] = &["location", "venue", "where", "place", "address", "site"];

pub const PRICE_ALIASES: &[&str] = &["price", "cost", "admission", "fee", "price_text", "tickets"];

pub const AGE_ALIASES: &[&str] = &["age_range", "ages", "age_groups", "age", "audience"];

pub const TYPE_ALIASES: &[&str] = &["type", "event_type", "activity_type", "kind"];

pub const CATEGORY_ALIASES: &[&str] = &["category", "categories", "tags", "topic"];

pub const STATUS_ALIASES: &[&str] = &["status", "state"];

pub const FREQUENCY_ALIASES: &[&str] = &["frequency", "recurrence", "repeats"];

pub const SCRAPED_AT_ALIASES: &[&str] = &["scraped_at", "fetched_at", "retrieved_at"];

/// Terms that make a top-level array key look event-ish when the expected
/// key is absent and an alternative must be scored.
pub const ARRAY_KEY_TERMS: &[&str] = &["event", "activit", "item", "result", "data", "content", "listing"];

/// Known sub-city neighborhoods and the city/region they resolve to.
/// Lookup is lowercase-contains over free location text.
pub const NEIGHBORHOODS: &[(&str, &str, &str)] = &[
    ("ballard", "Seattle", "WA"),
    ("fremont", "Seattle", "WA"),
    ("greenwood", "Seattle", "WA"),
    ("wallingford", "Seattle", "WA"),
    ("capitol hill", "Seattle", "WA"),
    ("queen anne", "Seattle", "WA"),
    ("magnolia", "Seattle", "WA"),
    ("west seattle", "Seattle", "WA"),
    ("columbia city", "Seattle", "WA"),
    ("rainier beach", "Seattle", "WA"),
    ("georgetown", "Seattle", "WA"),
    ("university district", "Seattle", "WA"),
    ("u district", "Seattle", "WA"),
    ("beacon hill", "Seattle", "WA"),
    ("bellevue", "Bellevue", "WA"),
    ("redmond", "Redmond", "WA"),
    ("kirkland", "Kirkland", "WA"),
    ("issaquah", "Issaquah", "WA"),
    ("renton", "Renton", "WA"),
    ("shoreline", "Shoreline", "WA"),
    ("tacoma", "Tacoma", "WA"),
    ("everett", "Everett", "WA"),
];
