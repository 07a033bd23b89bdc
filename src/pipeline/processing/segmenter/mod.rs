use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::domain::RawBlock;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{0,3}(#{1,6})\s*(.*)$").unwrap());
static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,2}[.)])\s+(\S.*)$").unwrap());
static EVENT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(?:event|activity)\s*:\s*(.*)$").unwrap());
static HORIZONTAL_RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,}|={3,})\s*$").unwrap());

/// Labeled metadata lines (Date:, Time:, Price:, ...). These belong inside a
/// block and must never start a new one, however title-like they look.
pub static METADATA_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:dates?|when|times?|hours?|location|venue|where|address|at|prices?|costs?|admission|fees?|tickets?|ages?|age\s+range|registration|rsvp|contact|phone|email)\s*:",
    )
    .unwrap()
});

/// Words that strongly suggest a line names an activity.
const TITLE_KEYWORDS: &[&str] = &[
    "class",
    "classes",
    "workshop",
    "camp",
    "festival",
    "concert",
    "storytime",
    "story time",
    "show",
    "fair",
    "exhibit",
    "playgroup",
    "party",
    "performance",
    "meetup",
    "open house",
];

/// Pagination and footer phrases that terminate a block outright.
const FOOTER_PHRASES: &[&str] = &[
    "back to top",
    "more events",
    "view all",
    "see all events",
    "load more",
    "next page",
    "previous page",
    "privacy policy",
    "terms of service",
    "subscribe to our newsletter",
];

/// Splits raw (possibly markdown-flavored) text into candidate event blocks.
///
/// Over-segmentation is preferred to under-segmentation: extra low-confidence
/// blocks are cheaper downstream than two activities merged into one. Output
/// is capped; blocks past the cap are dropped, not merged. Never fails — an
/// empty document yields an empty list.
pub struct BlockSegmenter {
    max_blocks: usize,
}

impl BlockSegmenter {
    pub fn new() -> Self {
        Self::with_config(&ExtractorConfig::default())
    }

    pub fn with_config(config: &ExtractorConfig) -> Self {
        Self {
            max_blocks: config.max_blocks,
        }
    }

    pub fn segment(&self, text: &str) -> Vec<RawBlock> {
        let mut blocks: Vec<RawBlock> = Vec::new();
        let mut current: Option<RawBlock> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_end();

            if Self::terminates_block(line) {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                continue;
            }

            if Self::starts_block(line) {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(RawBlock {
                    title: Self::clean_title(line),
                    lines: Vec::new(),
                    start_index: index,
                    end_index: index,
                });
                continue;
            }

            if let Some(block) = current.as_mut() {
                block.lines.push(line.to_string());
                block.end_index = index;
            }
            // Lines outside any block (preamble, stray prose) are skipped.
        }

        if let Some(block) = current.take() {
            blocks.push(block);
        }

        blocks.retain(|b| !b.title.is_empty());

        if blocks.len() > self.max_blocks {
            debug!(
                dropped = blocks.len() - self.max_blocks,
                cap = self.max_blocks,
                "segmenter: dropping blocks past cap"
            );
            blocks.truncate(self.max_blocks);
        }

        debug!(blocks = blocks.len(), "segmenter: document segmented");
        blocks
    }

    /// Blank lines, horizontal rules, and footer phrases end the current block.
    fn terminates_block(line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        if HORIZONTAL_RULE_RE.is_match(line) {
            return true;
        }
        let lower = line.trim().to_lowercase();
        FOOTER_PHRASES.iter().any(|phrase| lower.contains(phrase))
    }

    fn starts_block(line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() || METADATA_LABEL_RE.is_match(trimmed) {
            return false;
        }
        if HEADING_RE.is_match(trimmed)
            || EVENT_PREFIX_RE.is_match(trimmed)
            || LIST_ITEM_RE.is_match(trimmed)
        {
            return true;
        }
        let lower = trimmed.to_lowercase();
        if TITLE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return true;
        }
        Self::looks_like_title(trimmed)
    }

    /// Title heuristic: 2-15 words with at least half of them capitalized.
    fn looks_like_title(line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 || words.len() > 15 {
            return false;
        }
        let capitalized = words
            .iter()
            .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
            .count();
        capitalized * 2 >= words.len()
    }

    /// Strips heading markers, list bullets, and Event:/Activity: prefixes.
    fn clean_title(line: &str) -> String {
        let trimmed = line.trim();
        if let Some(caps) = HEADING_RE.captures(trimmed) {
            return caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        }
        if let Some(caps) = EVENT_PREFIX_RE.captures(trimmed) {
            return caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        }
        if let Some(caps) = LIST_ITEM_RE.captures(trimmed) {
            return caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        }
        trimmed.to_string()
    }
}

impl Default for BlockSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_no_blocks() {
        let segmenter = BlockSegmenter::new();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("\n\n\n").is_empty());
    }

    #[test]
    fn marker_only_document_yields_no_blocks() {
        let segmenter = BlockSegmenter::new();
        // Headings with no text and horizontal rules produce nothing.
        assert!(segmenter.segment("#\n---\n***\n").is_empty());
    }

    #[test]
    fn heading_starts_a_block_and_absorbs_metadata_lines() {
        let segmenter = BlockSegmenter::new();
        let text = "## Pumpkin Patch & Fall Festival\nDates: October 1-31, 2024\nAdmission: $15 adults\n";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Pumpkin Patch & Fall Festival");
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[0].start_index, 0);
        assert_eq!(blocks[0].end_index, 2);
    }

    #[test]
    fn blank_line_ends_a_block() {
        let segmenter = BlockSegmenter::new();
        let text = "Event: Toddler Music Class\nTime: 10:00 AM\n\nsome unrelated prose here\n";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Toddler Music Class");
    }

    #[test]
    fn footer_phrase_ends_a_block() {
        let segmenter = BlockSegmenter::new();
        let text = "# Family Movie Night\nFree (donations appreciated)\nBack to top\nWhere: Community Hall\n";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 1);
        // The Where: line came after the footer, so it was never absorbed.
        assert_eq!(blocks[0].lines.len(), 1);
    }

    #[test]
    fn numbered_list_items_each_start_a_block() {
        let segmenter = BlockSegmenter::new();
        let text = "1. Toddler Story Time\n2. Preschool Art Workshop\n3. Family Yoga\n";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].title, "Toddler Story Time");
        assert_eq!(blocks[2].title, "Family Yoga");
    }

    #[test]
    fn title_heuristic_requires_capitalization() {
        assert!(BlockSegmenter::looks_like_title("Saturday Science Spectacular"));
        assert!(!BlockSegmenter::looks_like_title(
            "join us for a fun day of hands-on activities"
        ));
        assert!(!BlockSegmenter::looks_like_title("Word"));
    }

    #[test]
    fn metadata_labels_never_start_blocks() {
        assert!(!BlockSegmenter::starts_block("Dates: October 1-31, 2024"));
        assert!(!BlockSegmenter::starts_block("Where: Discovery Park"));
        assert!(BlockSegmenter::starts_block("# Harvest Fair"));
    }

    #[test]
    fn output_is_capped() {
        let segmenter = BlockSegmenter::new();
        let text = (0..40)
            .map(|i| format!("# Event Number {}\n", i))
            .collect::<String>();
        let blocks = segmenter.segment(&text);
        assert_eq!(blocks.len(), 15);
    }

    #[test]
    fn start_indices_strictly_increase_without_overlap() {
        let segmenter = BlockSegmenter::new();
        let text = "# First Show\nTime: 10 AM\n\n# Second Show\nTime: 2 PM\n\n# Third Show\n";
        let blocks = segmenter.segment(text);
        assert_eq!(blocks.len(), 3);
        for pair in blocks.windows(2) {
            assert!(pair[0].start_index < pair[1].start_index);
            assert!(pair[0].end_index < pair[1].start_index);
        }
    }
}
