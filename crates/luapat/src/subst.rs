//! Replacement sources for `gsub`.
//!
//! A replacement is one of three sources: a template string with `%n`
//! references, a function called with the captures, or a lookup table keyed
//! by the first capture. Each resolves a finished match to either new text
//! or `None`, and `None` keeps the matched text unchanged.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

use crate::capture::Capture;
use crate::error::{PatternError, Result};

/// Key-lookup replacement table.
///
/// `key` is the first capture of the match, or the whole match when the
/// pattern has no captures.
pub trait Lookup {
    fn lookup(&self, key: &Capture<'_>) -> Option<String>;
}

fn lookup_str<V: Display>(key: &Capture<'_>, get: impl FnOnce(&str) -> Option<V>) -> Option<String> {
    key.as_str().and_then(get).map(|v| v.to_string())
}

impl<K, V, S> Lookup for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    S: BuildHasher,
{
    fn lookup(&self, key: &Capture<'_>) -> Option<String> {
        lookup_str(key, |s| self.get(s))
    }
}

impl<K, V> Lookup for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn lookup(&self, key: &Capture<'_>) -> Option<String> {
        lookup_str(key, |s| self.get(s))
    }
}

/// Table keyed by position captures.
pub struct PositionTable<V>(pub HashMap<usize, V>);

impl<V: Display> Lookup for PositionTable<V> {
    fn lookup(&self, key: &Capture<'_>) -> Option<String> {
        key.position()
            .and_then(|p| self.0.get(&p))
            .map(|v| v.to_string())
    }
}

/// Replacement source for `gsub`
pub enum Replacement<'r> {
    /// Text with `%0`-`%9` and `%%` escapes (using the engine's escape char)
    Template(&'r str),
    /// Called with the captures; `None` keeps the match
    Function(&'r mut dyn FnMut(&[Capture<'_>]) -> Option<String>),
    /// Looked up by the first capture; a missing key keeps the match
    Table(&'r dyn Lookup),
}

impl<'r> From<&'r str> for Replacement<'r> {
    fn from(template: &'r str) -> Self {
        Replacement::Template(template)
    }
}

impl<'r> From<&'r String> for Replacement<'r> {
    fn from(template: &'r String) -> Self {
        Replacement::Template(template)
    }
}

impl<'r> Replacement<'r> {
    /// Wrap a replacement function. Closures passed inline get their
    /// argument types from this bound.
    pub fn function<F>(f: &'r mut F) -> Self
    where
        F: FnMut(&[Capture<'_>]) -> Option<String> + 'r,
    {
        Replacement::Function(f)
    }

    pub fn table(table: &'r dyn Lookup) -> Self {
        Replacement::Table(table)
    }
}

/// What one match looks like to a replacement source.
pub(crate) struct Substitution<'a, 's> {
    /// Captures, or the whole match when the pattern had none
    pub captures: &'a [Capture<'s>],
    /// Number of explicit captures opened by the pattern
    pub explicit: usize,
    pub whole: &'s str,
}

impl Replacement<'_> {
    /// Append the replacement for one match to `out`.
    pub(crate) fn apply(
        &mut self,
        m: &Substitution<'_, '_>,
        escape: char,
        out: &mut String,
    ) -> Result<()> {
        let value = match self {
            Replacement::Template(template) => {
                expand_template(template, m, escape, out)?;
                return Ok(());
            }
            Replacement::Function(f) => f(m.captures),
            Replacement::Table(table) => m.captures.first().and_then(|key| table.lookup(key)),
        };
        match value {
            Some(text) => out.push_str(&text),
            None => out.push_str(m.whole), // no-op substitution
        }
        Ok(())
    }
}

/// Expand `%0`-`%9` and `%%` in a replacement template
fn expand_template(
    template: &str,
    m: &Substitution<'_, '_>,
    escape: char,
    out: &mut String,
) -> Result<()> {
    let mut rest = template;
    while let Some(pos) = rest.find(escape) {
        // push the whole literal segment at once
        out.push_str(&rest[..pos]);
        let mut tail = rest[pos + escape.len_utf8()..].chars();
        let Some(c) = tail.next() else {
            return Err(PatternError::syntax(format!(
                "replacement string ends with bare '{escape}'"
            )));
        };
        match c {
            c if c == escape => out.push(escape),
            '0' => out.push_str(m.whole),
            // %1 is the first capture, or the whole match without captures
            '1' => m.captures[0].push_to(out),
            '2'..='9' => {
                let n = c as usize - '0' as usize;
                if n > m.explicit {
                    return Err(PatternError::syntax(format!(
                        "invalid capture index {escape}{n}"
                    )));
                }
                m.captures[n - 1].push_to(out);
            }
            c => {
                return Err(PatternError::syntax(format!(
                    "invalid '{escape}{c}' in replacement string"
                )));
            }
        }
        rest = tail.as_str();
    }
    out.push_str(rest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn apply(
        repl: &mut Replacement<'_>,
        captures: &[Capture<'_>],
        explicit: usize,
        whole: &str,
    ) -> Result<String> {
        let mut out = String::new();
        let m = Substitution {
            captures,
            explicit,
            whole,
        };
        repl.apply(&m, '%', &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_template_references() {
        let caps = [Capture::Str("abc"), Capture::Str("="), Capture::Str("xyz")];
        let out = apply(&mut "%3%2%1-%0".into(), &caps, 3, "abc=xyz").unwrap();
        assert_eq!(out, "xyz=abc-abc=xyz");
    }

    #[test]
    fn test_template_whole_match_as_first() {
        let caps = [Capture::Str("a")];
        assert_eq!(apply(&mut "%1%0".into(), &caps, 0, "a").unwrap(), "aa");
        assert_matches!(
            apply(&mut "%2".into(), &caps, 0, "a"),
            Err(PatternError::Syntax(m)) if m == "invalid capture index %2"
        );
    }

    #[test]
    fn test_template_position_and_escape() {
        let caps = [Capture::Position(12)];
        assert_eq!(apply(&mut "[%1] 100%%".into(), &caps, 1, "").unwrap(), "[12] 100%");
    }

    #[test]
    fn test_template_errors() {
        let caps = [Capture::Str("a")];
        assert_matches!(
            apply(&mut "fail%".into(), &caps, 0, "a"),
            Err(PatternError::Syntax(m)) if m == "replacement string ends with bare '%'"
        );
        assert_matches!(
            apply(&mut "%x".into(), &caps, 0, "a"),
            Err(PatternError::Syntax(m)) if m == "invalid '%x' in replacement string"
        );
    }

    #[test]
    fn test_template_multibyte_escape() {
        let caps = [Capture::Str("ü")];
        let mut out = String::new();
        let m = Substitution {
            captures: &caps,
            explicit: 1,
            whole: "ü",
        };
        Replacement::Template("<§1>§§").apply(&m, '§', &mut out).unwrap();
        assert_eq!(out, "<ü>§");
    }

    #[test]
    fn test_function_and_fallback() {
        let caps = [Capture::Str("dois")];
        let out = apply(
            &mut Replacement::function(&mut |c| c[0].as_str().map(str::to_uppercase)),
            &caps,
            1,
            "(dois)",
        );
        assert_eq!(out.unwrap(), "DOIS");

        let mut seen = Vec::new();
        let out = apply(
            &mut Replacement::function(&mut |c| {
                seen.push(c.len());
                None
            }),
            &caps,
            1,
            "(dois)",
        );
        assert_eq!(out.unwrap(), "(dois)");
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn test_tables() {
        let table: HashMap<&str, &str> = HashMap::from([("a", "AA"), ("l", "")]);
        let mut repl = Replacement::Table(&table);
        assert_eq!(apply(&mut repl, &[Capture::Str("a")], 1, "a").unwrap(), "AA");
        assert_eq!(apply(&mut repl, &[Capture::Str("l")], 1, "l").unwrap(), "");
        assert_eq!(apply(&mut repl, &[Capture::Str("o")], 1, "o").unwrap(), "o");

        let positions = PositionTable(HashMap::from([(0, 'x'), (1, 'y')]));
        let mut repl = Replacement::Table(&positions);
        assert_eq!(apply(&mut repl, &[Capture::Position(1)], 1, "l").unwrap(), "y");
        assert_eq!(apply(&mut repl, &[Capture::Position(5)], 1, "o").unwrap(), "o");

        let sorted: BTreeMap<String, u32> = BTreeMap::from([("k".to_string(), 7)]);
        let mut repl = Replacement::Table(&sorted);
        assert_eq!(apply(&mut repl, &[Capture::Str("k")], 1, "k").unwrap(), "7");
    }
}
