// Lua-style pattern matching: char-oriented, zero-AST design
//
// 1. NO AST / parse phase: the pattern is interpreted directly during matching
// 2. Pattern and source are `&[char]`, walked with index arithmetic
// 3. Captures borrow the caller's `&str` (char index -> byte offset map)
// 4. Recursion-limited to prevent stack overflow on pathological patterns
// 5. The escape character is per-engine configuration, not global state
//
// Pattern syntax:
// - Character classes: ., %a, %c, %d, %g, %l, %p, %s, %u, %w, %x, %z
// - Sets: [set], [^set], ranges a-z, classes inside sets
// - Repetitions: *, +, - (lazy), ?
// - Captures: (pattern), position captures ()
// - Anchors: ^ (first char), $ (last char)
// - Back references %1-%9, balanced %bxy, frontier %f[set]

#[cfg(test)]
mod test;

mod capture;
mod class;
mod config;
mod engine;
mod error;
pub mod limits;
mod session;
mod subst;
mod text;

pub use capture::Capture;
pub use config::PatternConfig;
pub use error::{PatternError, Result};
pub use session::{GMatch, Match, PatternEngine};
pub use subst::{Lookup, PositionTable, Replacement};

/// Find the first match of `pattern` in `source`.
pub fn find<'s>(source: &'s str, pattern: &str) -> Result<Option<Match<'s>>> {
    PatternEngine::default().find(source, pattern, 0, false)
}

/// Find the first match at or after char offset `init` (negative counts as 0).
pub fn find_at<'s>(source: &'s str, pattern: &str, init: isize) -> Result<Option<Match<'s>>> {
    PatternEngine::default().find(source, pattern, init, false)
}

/// Plain substring search, pattern specials are ordinary characters.
pub fn find_plain<'s>(source: &'s str, needle: &str, init: isize) -> Result<Option<Match<'s>>> {
    PatternEngine::default().find(source, needle, init, true)
}

/// Captures of the first match (or the whole match if the pattern has none).
pub fn match_pattern<'s>(source: &'s str, pattern: &str) -> Result<Option<Vec<Capture<'s>>>> {
    PatternEngine::default().match_pattern(source, pattern, 0)
}

pub fn match_at<'s>(
    source: &'s str,
    pattern: &str,
    init: isize,
) -> Result<Option<Vec<Capture<'s>>>> {
    PatternEngine::default().match_pattern(source, pattern, init)
}

/// Iterate over every match; see `PatternEngine::gmatch`.
pub fn gmatch<'s>(source: &'s str, pattern: &str) -> Result<GMatch<'s>> {
    PatternEngine::default().gmatch(source, pattern)
}

/// Replace every match, returning the new text and the replacement count.
pub fn gsub<'r>(
    source: &str,
    pattern: &str,
    repl: impl Into<Replacement<'r>>,
) -> Result<(String, usize)> {
    PatternEngine::default().gsub(source, pattern, repl.into(), None)
}

/// Replace at most `limit` matches.
pub fn gsub_n<'r>(
    source: &str,
    pattern: &str,
    repl: impl Into<Replacement<'r>>,
    limit: usize,
) -> Result<(String, usize)> {
    PatternEngine::default().gsub(source, pattern, repl.into(), Some(limit))
}
