//! Error types for the pattern engine.
//!
//! "No match" is never an error: every operation reports it as `Ok(None)`
//! (or an exhausted iterator). The variants below are hard failures that
//! abort the whole call.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatternError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// Malformed pattern or replacement template.
    #[error("{0}")]
    Syntax(String),

    /// The source has more characters than a capture offset can address.
    #[error("source string too long")]
    SourceTooLong,

    #[error("too many captures")]
    TooManyCaptures,

    #[error("pattern too complex, exceeded recursion limit")]
    RecursionOverflow,

    /// Rejected escape character in `PatternConfig`.
    #[error("invalid escape character: {0}")]
    InvalidEscape(String),
}

impl PatternError {
    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        PatternError::Syntax(msg.into())
    }

    /// True for the complexity failures (`TooManyCaptures`, `RecursionOverflow`).
    pub fn is_too_complex(&self) -> bool {
        matches!(
            self,
            PatternError::TooManyCaptures | PatternError::RecursionOverflow
        )
    }
}
