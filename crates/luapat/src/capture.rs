// Capture bookkeeping for one matching session.
//
// The store owns the capture slots, the recursion budget and the session's
// starting offset. It is created per operation call and reset before every
// new starting offset.

use std::fmt;

use crate::error::{PatternError, Result};
use crate::text::Text;

/// A capture value returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Capture<'s> {
    /// Substring of the source
    Str(&'s str),
    /// Zero-based char offset produced by `()`
    Position(usize),
}

impl<'s> Capture<'s> {
    pub fn as_str(&self) -> Option<&'s str> {
        match self {
            Capture::Str(s) => Some(s),
            Capture::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            Capture::Str(_) => None,
            Capture::Position(p) => Some(*p),
        }
    }

    /// Append the textual form of the capture to `out`.
    pub(crate) fn push_to(&self, out: &mut String) {
        match self {
            Capture::Str(s) => out.push_str(s),
            Capture::Position(p) => out.push_str(itoa::Buffer::new().format(*p)),
        }
    }
}

impl fmt::Display for Capture<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Str(s) => f.write_str(s),
            Capture::Position(p) => f.write_str(itoa::Buffer::new().format(*p)),
        }
    }
}

impl<'s> From<&'s str> for Capture<'s> {
    fn from(s: &'s str) -> Self {
        Capture::Str(s)
    }
}

impl From<usize> for Capture<'_> {
    fn from(p: usize) -> Self {
        Capture::Position(p)
    }
}

/// Capture length: a char count, a position marker, or still open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureLen {
    Len(usize),
    Position,
    Unfinished,
}

/// Kind requested when opening a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureKind {
    Position,
    Unfinished,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    start: usize,
    len: CaptureLen,
}

pub(crate) struct CaptureStore {
    slots: Vec<Slot>,
    max_captures: usize,
    depth: usize, // remaining recursion budget
    max_recursion: usize,
    srcstart: usize,
}

impl CaptureStore {
    pub fn new(max_captures: usize, max_recursion: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_captures.min(32)),
            max_captures,
            depth: max_recursion,
            max_recursion,
            srcstart: 0,
        }
    }

    /// Prepare for a new attempt at `init` (keeps the slot allocation)
    #[inline]
    pub fn reset(&mut self, init: usize) {
        self.slots.clear();
        self.depth = self.max_recursion;
        self.srcstart = init;
    }

    #[inline(always)]
    pub fn level(&self) -> usize {
        self.slots.len()
    }

    /// Spend one unit of the recursion budget.
    #[inline]
    pub fn enter(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(PatternError::RecursionOverflow);
        }
        self.depth -= 1;
        Ok(())
    }

    #[inline]
    pub fn leave(&mut self) {
        self.depth += 1;
    }

    pub fn open(&mut self, start: usize, kind: CaptureKind) -> Result<usize> {
        let n = self.slots.len();
        if n >= self.max_captures {
            return Err(PatternError::TooManyCaptures);
        }
        let len = match kind {
            CaptureKind::Position => CaptureLen::Position,
            CaptureKind::Unfinished => CaptureLen::Unfinished,
        };
        self.slots.push(Slot { start, len });
        Ok(n)
    }

    /// Undo the most recent `open`
    #[inline]
    pub fn pop(&mut self) {
        self.slots.pop();
    }

    pub fn close(&mut self, index: usize, end: usize) {
        let slot = &mut self.slots[index];
        slot.len = CaptureLen::Len(end - slot.start);
    }

    /// Undo a `close` while backtracking
    pub fn reopen(&mut self, index: usize) {
        self.slots[index].len = CaptureLen::Unfinished;
    }

    #[inline]
    pub fn is_unfinished(&self, index: usize) -> bool {
        self.slots[index].len == CaptureLen::Unfinished
    }

    /// Index of the most recent still-unfinished capture.
    pub fn capture_to_close(&self) -> Result<usize> {
        self.slots
            .iter()
            .rposition(|slot| slot.len == CaptureLen::Unfinished)
            .ok_or_else(|| PatternError::syntax("unmatched ')'"))
    }

    /// Validate the 1-based reference `%n` and return its 0-based index.
    pub fn check_capture(&self, n: usize, escape: char) -> Result<usize> {
        match n.checked_sub(1) {
            Some(index) if index < self.slots.len() && !self.is_unfinished(index) => Ok(index),
            _ => Err(PatternError::syntax(format!(
                "invalid capture index {escape}{n}"
            ))),
        }
    }

    /// Finished span of a string capture as `(start, len)`; `None` for
    /// position captures.
    pub fn span(&self, index: usize) -> Option<(usize, usize)> {
        let slot = &self.slots[index];
        match slot.len {
            CaptureLen::Len(len) => Some((slot.start, len)),
            _ => None,
        }
    }

    pub fn value<'s>(&self, index: usize, text: &Text<'s>) -> Result<Capture<'s>> {
        let slot = &self.slots[index];
        match slot.len {
            CaptureLen::Position => Ok(Capture::Position(slot.start)),
            CaptureLen::Len(len) => Ok(Capture::Str(text.slice(slot.start, slot.start + len))),
            CaptureLen::Unfinished => Err(PatternError::syntax("unfinished capture")),
        }
    }

    /// Explicit captures in open order (empty if the pattern opened none).
    pub fn explicit<'s>(&self, text: &Text<'s>) -> Result<Vec<Capture<'s>>> {
        (0..self.slots.len()).map(|i| self.value(i, text)).collect()
    }

    /// Explicit captures, or the implicit whole match `[srcstart, end)`
    /// when the pattern had none.
    pub fn all_captures<'s>(&self, end: usize, text: &Text<'s>) -> Result<Vec<Capture<'s>>> {
        if self.slots.is_empty() {
            Ok(vec![Capture::Str(text.slice(self.srcstart, end))])
        } else {
            self.explicit(text)
        }
    }
}
