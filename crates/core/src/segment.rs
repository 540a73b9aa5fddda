//! Sentence segmentation for translation practice.

use crate::model::SentenceUnit;

/// Splits a passage into ordered sentence units.
///
/// A unit is a maximal run of text ending in one or more of `.`, `!`, `?`,
/// with the terminators retained. Whitespace between sentences is dropped.
/// Text with no terminal punctuation yields no units at all; callers must
/// treat a zero-unit passage as unsegmentable.
///
/// Pure and deterministic: the same passage always yields the same units.
#[must_use]
pub fn segment(passage: &str) -> Vec<SentenceUnit> {
    let mut units = Vec::new();
    let mut buf = String::new();
    let mut chars = passage.chars().peekable();

    while let Some(ch) = chars.next() {
        buf.push(ch);
        let run_ends = is_terminator(ch) && !chars.peek().copied().is_some_and(is_terminator);
        if run_ends {
            push_unit(&mut units, &mut buf);
        }
    }
    // Trailing text without a terminator is not a complete sentence.
    units
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn push_unit(units: &mut Vec<SentenceUnit>, buf: &mut String) {
    let text = buf.trim();
    // A unit needs some content besides its terminators.
    if text.chars().any(|ch| !is_terminator(ch)) {
        units.push(SentenceUnit {
            index: units.len(),
            text: text.to_string(),
        });
    }
    buf.clear();
}
