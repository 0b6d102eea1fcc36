//! Per-engine configuration.
//!
//! The escape character lives here instead of in process-wide state, so two
//! engines with different escapes can run side by side on different threads.

use crate::error::{PatternError, Result};
use crate::limits::{DEFAULT_ESCAPE, INVALID_ESCAPES, MAXCAPTURES, MAXRECURSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatternConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_escape"))]
    escape: char,
    /// Capture table capacity for one session.
    pub max_captures: usize,
    /// Recursion budget for one session.
    pub max_recursion: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            escape: DEFAULT_ESCAPE,
            max_captures: MAXCAPTURES,
            max_recursion: MAXRECURSION,
        }
    }
}

impl PatternConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn escape(&self) -> char {
        self.escape
    }

    /// Change the escape character. Structural specials (`^$*+?.([-)]`) are
    /// rejected and the previous escape is kept.
    pub fn set_escape(&mut self, escape: char) -> Result<()> {
        if INVALID_ESCAPES.contains(&escape) {
            let all: String = INVALID_ESCAPES.iter().collect();
            return Err(PatternError::InvalidEscape(format!(
                "escape cannot be any of \"{all}\""
            )));
        }
        self.escape = escape;
        Ok(())
    }

    /// Like `set_escape`, for callers holding the escape as a string.
    /// The string must hold exactly one character.
    pub fn set_escape_str(&mut self, escape: &str) -> Result<()> {
        let mut chars = escape.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.set_escape(c),
            _ => Err(PatternError::InvalidEscape(
                "escape must be a single character".to_string(),
            )),
        }
    }

    pub fn with_escape(mut self, escape: char) -> Result<Self> {
        self.set_escape(escape)?;
        Ok(self)
    }

    pub fn with_max_captures(mut self, max_captures: usize) -> Self {
        self.max_captures = max_captures;
        self
    }

    pub fn with_max_recursion(mut self, max_recursion: usize) -> Self {
        self.max_recursion = max_recursion;
        self
    }
}

#[cfg(feature = "serde")]
fn deserialize_escape<'de, D>(deserializer: D) -> std::result::Result<char, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let escape = <char as serde::Deserialize>::deserialize(deserializer)?;
    PatternConfig::default()
        .with_escape(escape)
        .map(|config| config.escape)
        .map_err(serde::de::Error::custom)
}
