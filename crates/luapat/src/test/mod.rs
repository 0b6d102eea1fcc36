pub mod test_sets;

use crate::*;

/// Span of the first match as char offsets.
pub fn span(source: &str, pattern: &str, init: isize) -> Option<(usize, usize)> {
    find_at(source, pattern, init)
        .unwrap()
        .map(|m| (m.start, m.end))
}

/// Single-value `match_pattern`, rendered as text.
pub fn matched(source: &str, pattern: &str) -> Option<String> {
    match_pattern(source, pattern).unwrap().map(|caps| {
        assert_eq!(caps.len(), 1, "expected a single capture for {pattern:?}");
        caps[0].to_string()
    })
}

/// `gsub` with a template, replacement text only.
pub fn sub(source: &str, pattern: &str, repl: &str) -> String {
    gsub(source, pattern, repl).unwrap().0
}
