//! Pattern engine limits and fixed constants.
//!
//! All magic numbers that bound a matching session are collected here.

// ===== Captures =====

/// Maximum number of captures a single match may open.
pub const MAXCAPTURES: usize = 100;

// ===== Recursion =====

/// Maximum nesting depth of the backtracking matcher.
/// Exceeding it aborts the call with `PatternError::RecursionOverflow`
/// instead of overflowing the host stack.
pub const MAXRECURSION: usize = 200;

// ===== Syntax =====

/// Default escape character introducing classes, back-references,
/// `b` (balance) and `f` (frontier).
pub const DEFAULT_ESCAPE: char = '%';

/// Characters that make a pattern non-plain. A pattern containing none of
/// these (and not the escape character) can be searched as a substring.
pub const SPECIALS: &[char] = &['^', '$', '*', '+', '?', '.', '(', '[', '-'];

/// Characters that can never be used as the escape character.
pub const INVALID_ESCAPES: &[char] = &['^', '$', '*', '+', '?', '.', '(', '[', '-', ')', ']'];
