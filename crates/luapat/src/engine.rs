// Core pattern matching engine: direct interpretation, no AST
//
// - MatchState holds text, pattern, escape and the capture store
// - do_match recursively walks the pattern with backtracking
// - Sequential atoms loop instead of recursing, so only choice points
//   (quantifiers, captures) spend recursion budget

use crate::capture::{CaptureKind, CaptureStore};
use crate::class::{class_end, match_bracket_class, single_match};
use crate::error::{PatternError, Result};
use crate::text::Text;

/// Match state: all matching context for one session
pub(crate) struct MatchState<'a, 's> {
    pub text: &'a Text<'s>,
    pub pat: &'a [char],
    pub escape: char,
    pub caps: CaptureStore,
}

impl<'a, 's> MatchState<'a, 's> {
    pub fn new(text: &'a Text<'s>, pat: &'a [char], escape: char, caps: CaptureStore) -> Self {
        Self {
            text,
            pat,
            escape,
            caps,
        }
    }

    /// Try to match `pat[pp..]` against the text starting at char `si`.
    /// Returns `Ok(Some(end))` on success (char index past the match),
    /// `Ok(None)` on failure and `Err` for hard errors.
    ///
    /// Every entry spends one unit of the recursion budget and gives it
    /// back on every exit path.
    pub fn do_match(&mut self, si: usize, pp: usize) -> Result<Option<usize>> {
        self.caps.enter()?;
        let result = self.match_inner(si, pp);
        self.caps.leave();
        result
    }

    fn match_inner(&mut self, mut si: usize, mut pp: usize) -> Result<Option<usize>> {
        let pat = self.pat;
        let esc = self.escape;
        // Tail-call optimization: loop instead of recursing for sequential elements
        loop {
            if pp >= pat.len() {
                // End of pattern: match succeeded
                return Ok(Some(si));
            }
            let pc = pat[pp];
            let pc1 = pat.get(pp + 1).copied();

            match pc {
                '(' => {
                    return if pc1 == Some(')') {
                        self.start_capture(si, pp + 2, CaptureKind::Position)
                    } else {
                        self.start_capture(si, pp + 1, CaptureKind::Unfinished)
                    };
                }
                ')' => return self.end_capture(si, pp + 1),
                '$' if pp + 1 == pat.len() => {
                    // Anchor at end: succeed only if text exhausted
                    return Ok((si == self.text.len()).then_some(si));
                }
                c if c == esc => match pc1 {
                    None => {
                        return Err(PatternError::syntax(format!(
                            "pattern ends with bare '{esc}'"
                        )));
                    }
                    Some('b') => match self.match_balance(si, pp + 2)? {
                        Some(end) => {
                            si = end;
                            pp += 4;
                            continue;
                        }
                        None => return Ok(None),
                    },
                    Some('f') => {
                        pp += 2;
                        if pat.get(pp) != Some(&'[') {
                            return Err(PatternError::syntax(format!(
                                "missing '[' after '{esc}f'"
                            )));
                        }
                        let ep = class_end(pat, pp, esc)?;
                        let set = &pat[pp + 1..ep - 1];
                        // virtual NUL at both ends of the text
                        let prev = si
                            .checked_sub(1)
                            .and_then(|i| self.text.at(i))
                            .unwrap_or('\0');
                        let next = self.text.at(si).unwrap_or('\0');
                        if !match_bracket_class(prev, set, esc)
                            && match_bracket_class(next, set, esc)
                        {
                            pp = ep;
                            continue;
                        }
                        return Ok(None);
                    }
                    Some(d) if d.is_ascii_digit() => {
                        let n = d as usize - '0' as usize;
                        match self.match_capture(si, n)? {
                            Some(end) => {
                                si = end;
                                pp += 2;
                                continue;
                            }
                            None => return Ok(None),
                        }
                    }
                    // Character class %x: fall through to normal match
                    Some(_) => {}
                },
                _ => {}
            }

            // Normal pattern element (literal, `.`, `%class`, `[set]`)
            let ep = class_end(pat, pp, esc)?; // index of the optional quantifier
            let quantifier = pat.get(ep).copied();

            if !single_match(self.text.at(si), pat, pp, ep, esc) {
                if matches!(quantifier, Some('*' | '?' | '-')) {
                    // zero occurrences accepted
                    pp = ep + 1;
                    continue;
                }
                return Ok(None);
            }

            // Matched once
            match quantifier {
                Some('?') => {
                    if let Some(end) = self.do_match(si + 1, ep + 1)? {
                        return Ok(Some(end));
                    }
                    pp = ep + 1;
                }
                Some('+') => return self.max_expand(si + 1, pp, ep),
                Some('*') => return self.max_expand(si, pp, ep),
                Some('-') => return self.min_expand(si, pp, ep),
                _ => {
                    si += 1;
                    pp = ep;
                }
            }
        }
    }

    /// Greedy repetition (`*`, and `+` after its first occurrence).
    /// Counts the longest run, then backs off one char at a time.
    fn max_expand(&mut self, si: usize, pp: usize, ep: usize) -> Result<Option<usize>> {
        let mut count = 0;
        while single_match(self.text.at(si + count), self.pat, pp, ep, self.escape) {
            count += 1;
        }
        // Try from most to least (greedy)
        loop {
            if let Some(end) = self.do_match(si + count, ep + 1)? {
                return Ok(Some(end));
            }
            if count == 0 {
                return Ok(None);
            }
            count -= 1;
        }
    }

    /// Lazy repetition (`-`): grow only while the rest of the pattern fails.
    fn min_expand(&mut self, mut si: usize, pp: usize, ep: usize) -> Result<Option<usize>> {
        loop {
            if let Some(end) = self.do_match(si, ep + 1)? {
                return Ok(Some(end));
            }
            if single_match(self.text.at(si), self.pat, pp, ep, self.escape) {
                si += 1;
            } else {
                return Ok(None);
            }
        }
    }

    /// Open a capture and match the rest of the pattern
    fn start_capture(&mut self, si: usize, pp: usize, kind: CaptureKind) -> Result<Option<usize>> {
        let index = self.caps.open(si, kind)?;
        let result = self.do_match(si, pp)?;
        match result {
            None => self.caps.pop(), // undo
            Some(_) if self.caps.is_unfinished(index) => {
                return Err(PatternError::syntax("unfinished capture"));
            }
            Some(_) => {}
        }
        Ok(result)
    }

    /// Close the most recent unfinished capture
    fn end_capture(&mut self, si: usize, pp: usize) -> Result<Option<usize>> {
        let index = self.caps.capture_to_close()?;
        self.caps.close(index, si);
        let result = self.do_match(si, pp)?;
        if result.is_none() {
            // Undo close on backtrack
            self.caps.reopen(index);
        }
        Ok(result)
    }

    /// Balanced match %bxy; `pp` points at `x`
    fn match_balance(&self, si: usize, pp: usize) -> Result<Option<usize>> {
        let (Some(&open), Some(&close)) = (self.pat.get(pp), self.pat.get(pp + 1)) else {
            return Err(PatternError::syntax(format!(
                "missing arguments to '{}b'",
                self.escape
            )));
        };
        let text = self.text.chars();
        if text.get(si) != Some(&open) {
            return Ok(None);
        }
        let mut level = 1usize;
        for (i, &c) in text.iter().enumerate().skip(si + 1) {
            if c == close {
                level -= 1;
                if level == 0 {
                    return Ok(Some(i + 1));
                }
            } else if c == open {
                level += 1;
            }
        }
        Ok(None)
    }

    /// Back reference %1-%9; a reference to a position capture never matches
    fn match_capture(&self, si: usize, n: usize) -> Result<Option<usize>> {
        let index = self.caps.check_capture(n, self.escape)?;
        let Some((start, len)) = self.caps.span(index) else {
            return Ok(None);
        };
        let text = self.text.chars();
        if len > text.len() - si {
            return Ok(None);
        }
        if text[si..si + len] == text[start..start + len] {
            Ok(Some(si + len))
        } else {
            Ok(None)
        }
    }
}
