//! "Found" lines and multi-line "items found" blocks.

use super::patterns::{ITEM_BLOCK_HEADERS, ITEM_FOUND_PREFIX};
use crate::facts::Fact;

/// Block items shorter than this (in characters) are treated as noise.
const MIN_ITEM_CHARS: usize = 4;

pub(super) fn extract_items(text: &str, facts: &mut Vec<Fact>) {
    let mut in_block = false;

    for line in text.lines().map(str::trim) {
        if let Some(header) = ITEM_BLOCK_HEADERS
            .iter()
            .find(|header| line.starts_with(**header))
        {
            // "Ви знайшли: Камінь" carries its item on the header line.
            match item_text(&line[header.len()..]) {
                Some(description) => facts.push(Fact::ItemFound { description }),
                None => in_block = true,
            }
            continue;
        }

        if in_block {
            if line.is_empty() {
                continue;
            }
            // Another section header closes the block.
            if line.ends_with(':') {
                in_block = false;
                continue;
            }
            if line.chars().count() >= MIN_ITEM_CHARS {
                facts.push(Fact::ItemFound {
                    description: line.to_owned(),
                });
            }
            continue;
        }

        if let Some(description) = single_find(line) {
            facts.push(Fact::ItemFound { description });
        }
    }
}

/// "Ви знайшли <item>!" or "Ви знайшли: <item>" on one line.
fn single_find(line: &str) -> Option<String> {
    let start = line.find(ITEM_FOUND_PREFIX)?;
    item_text(&line[start + ITEM_FOUND_PREFIX.len()..])
}

/// Item text after a "found" prefix, without the colon and closing
/// punctuation.
fn item_text(rest: &str) -> Option<String> {
    let item = rest
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, '!' | '.' | ':') || c.is_whitespace());
    (!item.is_empty()).then(|| item.to_owned())
}
