pub mod patterns;

use tracing::debug;

use crate::config::ExtractorConfig;
use crate::domain::{ExtractedEvent, RawBlock};
use crate::pipeline::processing::segmenter::METADATA_LABEL_RE;
use self::patterns::{
    first_match, match_age_categories, DATE_RULES, LOCATION_RULES, PRICE_RULES, TIME_RULES,
};

/// Pulls typed fields out of one candidate block using the prioritized
/// pattern tables in [`patterns`]. First match wins per field; age bands are
/// the exception and collect every match. No field is required — absence is
/// recorded as an empty string or empty set and left to the validator.
pub struct FieldExtractor {
    min_description_line: usize,
    max_description_line: usize,
    max_description_lines: usize,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::with_config(&ExtractorConfig::default())
    }

    pub fn with_config(config: &ExtractorConfig) -> Self {
        Self {
            min_description_line: config.description_min_line_len,
            max_description_line: config.description_max_line_len,
            max_description_lines: config.description_max_lines,
        }
    }

    pub fn extract(&self, block: &RawBlock) -> ExtractedEvent {
        let mut text = block.title.clone();
        for line in &block.lines {
            text.push('\n');
            text.push_str(line);
        }

        let date_text = first_match(&DATE_RULES, &text);
        let time_text = first_match(&TIME_RULES, &text);
        let location_text = title_case(&first_match(&LOCATION_RULES, &text));
        let price_text = first_match(&PRICE_RULES, &text);
        let age_group_tags = match_age_categories(&text).into_iter().collect();
        let description = self.assemble_description(&block.lines);

        debug!(
            title = %block.title,
            has_date = !date_text.is_empty(),
            has_location = !location_text.is_empty(),
            "extractor: block processed"
        );

        ExtractedEvent {
            title: block.title.trim().to_string(),
            description,
            date_text,
            time_text,
            location_text,
            price_text,
            age_group_tags,
            raw_block_text: text,
        }
    }

    /// Concatenates up to N non-metadata lines within the configured length
    /// band. Shorter lines are assumed to be fragments, longer ones
    /// boilerplate.
    fn assemble_description(&self, lines: &[String]) -> String {
        let mut picked = Vec::new();
        for line in lines {
            let trimmed = line.trim();
            if trimmed.len() < self.min_description_line
                || trimmed.len() > self.max_description_line
            {
                continue;
            }
            if METADATA_LABEL_RE.is_match(trimmed) {
                continue;
            }
            picked.push(trimmed);
            if picked.len() == self.max_description_lines {
                break;
            }
        }
        picked.join(" ")
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercases the first letter of each whitespace-separated word, leaving
/// the rest of the word untouched (acronyms survive).
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
