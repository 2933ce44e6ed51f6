//! Character-budget text fitting.
//!
//! Everything that ends up on the page goes through [`normalize`]; free-form
//! prose additionally goes through [`shorten`] with one of the budgets below.

/// Appended to every shortened string. Counts as one character.
pub const ELLIPSIS: char = '…';

/// Placeholder left behind by a bad decode of an apostrophe.
const MOJIBAKE: char = '\u{FFFD}';

/// Trailing punctuation dropped before the ellipsis.
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', ':'];

pub mod budget {
    pub const SUMMARY: usize = 320;
    pub const EXPERIENCE_DETAIL: usize = 200;
    pub const EXPERIENCE_OTHERS: usize = 180;
    pub const PROJECT_CONTEXT: usize = 160;
    pub const PROJECT_CONTRIBUTIONS: usize = 200;
    pub const CERTIFICATION: usize = 180;
    pub const RECOMMENDATION: usize = 200;
}

/// Collapse whitespace runs to one space, trim both ends and repair mojibake.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.contains(MOJIBAKE) {
        out = out.replace(MOJIBAKE, "'");
    }
    out
}

/// Normalize, then fit into `max_chars` characters without cutting a word.
///
/// Over-budget text is cut at the last space inside the first `max_chars`
/// characters, stripped of trailing `,.;:` and suffixed with [`ELLIPSIS`].
/// A prefix without any space, or one that would trim down to nothing, is
/// hard-cut at `max_chars` instead.
pub fn shorten(text: &str, max_chars: usize) -> String {
    let text = normalize(text);
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(idx, _)| idx);
    let prefix = &text[..cut];
    let kept = match prefix.rfind(' ') {
        Some(space) => &prefix[..space],
        None => prefix,
    };

    let trimmed = kept.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace());
    let mut out = if trimmed.is_empty() {
        prefix.trim_end().to_string()
    } else {
        trimmed.to_string()
    };
    out.push(ELLIPSIS);
    out
}
