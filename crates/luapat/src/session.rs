// Matching sessions and the public operations built on them.
//
// One session = one text, one pattern, one capture store. `find`,
// `match_pattern` and `gsub` run a single session; `gmatch` starts a fresh
// one for every step.

use std::iter::FusedIterator;
use std::ops::Range;

use log::{debug, trace};

use crate::capture::{Capture, CaptureStore};
use crate::config::PatternConfig;
use crate::engine::MatchState;
use crate::error::Result;
use crate::limits::SPECIALS;
use crate::subst::{Replacement, Substitution};
use crate::text::Text;

/// Clamp a caller-supplied start offset: negative means 0, past the end
/// means there is nothing to find.
#[inline]
fn start_offset(init: isize, len: usize) -> Option<usize> {
    let init = usize::try_from(init).unwrap_or(0);
    (init <= len).then_some(init)
}

struct Session<'a, 's> {
    ms: MatchState<'a, 's>,
    anchor: bool,
    pp_start: usize,
}

impl<'a, 's> Session<'a, 's> {
    /// With `anchoring` off a leading `^` is an ordinary character.
    fn new(config: &PatternConfig, text: &'a Text<'s>, pat: &'a [char], anchoring: bool) -> Self {
        let anchor = anchoring && pat.first() == Some(&'^');
        let caps = CaptureStore::new(config.max_captures, config.max_recursion);
        Self {
            ms: MatchState::new(text, pat, config.escape(), caps),
            anchor,
            pp_start: usize::from(anchor),
        }
    }

    /// Scan starting offsets `init..=len` (only `init` when anchored) and
    /// return the first match span.
    fn find_from(&mut self, init: usize) -> Result<Option<(usize, usize)>> {
        let len = self.ms.text.len();
        if init > len {
            return Ok(None);
        }
        let mut si = init;
        loop {
            self.ms.caps.reset(si);
            if let Some(end) = self.ms.do_match(si, self.pp_start)? {
                trace!("match at [{si}, {end})");
                return Ok(Some((si, end)));
            }
            if self.anchor || si >= len {
                return Ok(None);
            }
            si += 1;
        }
    }

    fn explicit_captures(&self) -> Result<Vec<Capture<'s>>> {
        self.ms.caps.explicit(self.ms.text)
    }

    fn all_captures(&self, end: usize) -> Result<Vec<Capture<'s>>> {
        self.ms.caps.all_captures(end, self.ms.text)
    }
}

/// A successful `find`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Match<'s> {
    /// Char offset of the first matched char
    pub start: usize,
    /// Char offset past the match
    pub end: usize,
    text: &'s str,
    captures: Vec<Capture<'s>>,
}

impl<'s> Match<'s> {
    pub fn as_str(&self) -> &'s str {
        self.text
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Explicit captures; empty when the pattern has none.
    pub fn captures(&self) -> &[Capture<'s>] {
        &self.captures
    }

    /// Captures, or the whole match when the pattern has none.
    pub fn into_values(self) -> Vec<Capture<'s>> {
        if self.captures.is_empty() {
            vec![Capture::Str(self.text)]
        } else {
            self.captures
        }
    }
}

/// Matching engine: a configuration plus the four pattern operations.
///
/// Each call builds its own session, so an engine can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternEngine {
    config: PatternConfig,
}

impl PatternEngine {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Engine with the default limits and a different escape character.
    pub fn with_escape(escape: char) -> Result<Self> {
        Ok(Self::new(PatternConfig::default().with_escape(escape)?))
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PatternConfig {
        &mut self.config
    }

    /// Check if pattern has no special characters (can be matched as plain text).
    #[inline]
    pub fn is_plain_pattern(&self, pattern: &str) -> bool {
        let escape = self.config.escape();
        !pattern.chars().any(|c| c == escape || SPECIALS.contains(&c))
    }

    /// Find the first match of `pattern` at or after char offset `init`.
    ///
    /// A negative `init` counts as 0; `init` past the end finds nothing.
    /// With `plain`, or when the pattern has no specials, this is a
    /// substring search.
    pub fn find<'s>(
        &self,
        source: &'s str,
        pattern: &str,
        init: isize,
        plain: bool,
    ) -> Result<Option<Match<'s>>> {
        debug!("find {pattern:?} in {} bytes from {init} (plain: {plain})", source.len());
        let text = Text::new(source)?;
        let Some(init) = start_offset(init, text.len()) else {
            return Ok(None);
        };

        // FAST PATH: plain pattern: use substring search
        if plain || self.is_plain_pattern(pattern) {
            let offset = source.len() - text.tail(init).len();
            return Ok(text.tail(init).find(pattern).map(|found| {
                let start = text.char_index(offset + found);
                let end = start + pattern.chars().count();
                Match {
                    start,
                    end,
                    text: text.slice(start, end),
                    captures: Vec::new(),
                }
            }));
        }

        let pat: Vec<char> = pattern.chars().collect();
        let mut session = Session::new(&self.config, &text, &pat, true);
        let Some((start, end)) = session.find_from(init)? else {
            return Ok(None);
        };
        Ok(Some(Match {
            start,
            end,
            text: text.slice(start, end),
            captures: session.explicit_captures()?,
        }))
    }

    /// Match `pattern` at or after `init` and return its captures, or the
    /// whole match when it has none.
    pub fn match_pattern<'s>(
        &self,
        source: &'s str,
        pattern: &str,
        init: isize,
    ) -> Result<Option<Vec<Capture<'s>>>> {
        debug!("match {pattern:?} in {} bytes from {init}", source.len());
        let text = Text::new(source)?;
        let Some(init) = start_offset(init, text.len()) else {
            return Ok(None);
        };
        let pat: Vec<char> = pattern.chars().collect();
        let mut session = Session::new(&self.config, &text, &pat, true);
        match session.find_from(init)? {
            Some((_, end)) => session.all_captures(end).map(Some),
            None => Ok(None),
        }
    }

    /// Iterate over all matches of `pattern` in `source`.
    ///
    /// A leading `^` is NOT an anchor here: it is matched as a literal `^`
    /// character wherever the scan is.
    pub fn gmatch<'s>(&self, source: &'s str, pattern: &str) -> Result<GMatch<'s>> {
        debug!("gmatch {pattern:?} in {} bytes", source.len());
        Ok(GMatch {
            config: self.config,
            text: Text::new(source)?,
            pat: pattern.chars().collect(),
            cursor: Some(0),
        })
    }

    /// Replace up to `limit` matches of `pattern` in `source`.
    ///
    /// Returns the new text and the number of replacements made. `limit`
    /// defaults to one more than the source length; an anchored pattern
    /// replaces at most once.
    pub fn gsub(
        &self,
        source: &str,
        pattern: &str,
        mut repl: Replacement<'_>,
        limit: Option<usize>,
    ) -> Result<(String, usize)> {
        debug!("gsub {pattern:?} in {} bytes (limit: {limit:?})", source.len());
        let text = Text::new(source)?;
        let pat: Vec<char> = pattern.chars().collect();
        let mut session = Session::new(&self.config, &text, &pat, true);
        let limit = if session.anchor {
            1
        } else {
            limit.unwrap_or(text.len() + 1)
        };

        let mut result = String::with_capacity(source.len());
        let mut count = 0usize;
        let mut init = 0usize;
        while count < limit {
            let Some((start, end)) = session.find_from(init)? else {
                break;
            };
            count += 1;
            // Copy text between last match end and this match start
            result.push_str(text.slice(init, start));

            let captures = session.all_captures(end)?;
            let m = Substitution {
                captures: &captures,
                explicit: session.ms.caps.level(),
                whole: text.slice(start, end),
            };
            repl.apply(&m, self.config.escape(), &mut result)?;

            init = end;
            if start == end {
                // empty match: copy one char forward to guarantee progress
                if let Some(c) = text.at(end) {
                    result.push(c);
                }
                init += 1;
            }
        }

        // Copy remaining text
        if init <= text.len() {
            result.push_str(text.tail(init));
        }
        debug!("gsub made {count} replacements");
        Ok((result, count))
    }
}

/// Iterator returned by `gmatch`.
///
/// Yields the captures of each match (or the whole match when the pattern
/// has none). Single pass; an error ends the iteration.
pub struct GMatch<'s> {
    config: PatternConfig,
    text: Text<'s>,
    pat: Vec<char>,
    cursor: Option<usize>,
}

impl<'s> Iterator for GMatch<'s> {
    type Item = Result<Vec<Capture<'s>>>;

    fn next(&mut self) -> Option<Self::Item> {
        let init = self.cursor.take()?;
        let mut session = Session::new(&self.config, &self.text, &self.pat, false);
        match session.find_from(init) {
            Ok(Some((start, end))) => {
                // after an empty match go forward at least one char
                self.cursor = Some(if start == end { end + 1 } else { end });
                Some(session.all_captures(end))
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl FusedIterator for GMatch<'_> {}
