// Character class matching for patterns
// Handles %a, %d, %l, %u, %w, %s, %p, %c, %g, %x, %z and their uppercase inverses
// (letters, digits, punctuation and the C/Z groups by Unicode general category)
// Also handles [set] matching and atom boundaries

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::{PatternError, Result};

/// Numbers with digit value that are not decimal digits (`No` category):
/// superscripts, subscripts, circled and parenthesized digits and the like.
const DIGIT_TYPE: &[(char, char)] = &[
    ('\u{b2}', '\u{b3}'),
    ('\u{b9}', '\u{b9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19da}', '\u{19da}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247c}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24ea}', '\u{24ea}'),
    ('\u{24f5}', '\u{24fd}'),
    ('\u{24ff}', '\u{24ff}'),
    ('\u{2776}', '\u{277e}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278a}', '\u{2792}'),
    ('\u{10a40}', '\u{10a43}'),
    ('\u{10e60}', '\u{10e68}'),
    ('\u{11052}', '\u{1105a}'),
    ('\u{1e8c7}', '\u{1e8cf}'),
    ('\u{1f100}', '\u{1f10a}'),
];

/// Letters: every `L*` category.
#[inline]
fn is_letter(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic();
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Digits: decimal digits (`Nd`) plus the digit-valued `No` characters.
#[inline]
fn is_digit(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_digit();
    }
    match get_general_category(c) {
        GeneralCategory::DecimalNumber => true,
        GeneralCategory::OtherNumber => DIGIT_TYPE.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)),
        _ => false,
    }
}

/// Other (`C*`): controls, format chars, surrogates, private use, unassigned.
#[inline]
fn is_other(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

#[inline]
fn is_separator(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

#[inline]
fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// White space, including the information separators U+001C..U+001F.
#[inline]
fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

/// Check if a character matches a class letter.
/// Lowercase letters match the class, uppercase letters match its complement,
/// any other character after the escape matches itself literally.
#[inline]
pub fn match_class(c: char, cl: char) -> bool {
    let matched = match cl.to_ascii_lowercase() {
        'a' => is_letter(c),
        'c' => is_other(c),
        'd' => is_digit(c),
        'g' => !is_other(c) && !is_separator(c),
        'l' => c.is_lowercase(),
        'p' => is_punctuation(c),
        's' => is_space(c),
        'u' => c.is_uppercase(),
        'w' => is_letter(c) || is_digit(c),
        'x' => is_digit(c) || matches!(c, 'a'..='f' | 'A'..='F'),
        'z' => c == '\0',
        _ => return c == cl, // not a class letter, match literally
    };
    if cl.is_ascii_lowercase() { matched } else { !matched }
}

/// Match `c` against a set body (the characters between `[` and `]`).
/// A leading `^` negates the set. Items are scanned left to right and the
/// first matching item decides.
pub fn match_bracket_class(c: char, set: &[char], escape: char) -> bool {
    let (signal, mut i) = match set.first() {
        Some('^') => (false, 1),
        _ => (true, 0),
    };
    while i < set.len() {
        let pc = set[i];
        let next = set.get(i + 1).copied();
        if pc == escape {
            i += 1;
            if next.is_some_and(|cl| match_class(c, cl)) {
                return signal;
            }
        } else if next == Some('-') && i + 2 < set.len() {
            // Range: a-z
            i += 2;
            if pc <= c && c <= set[i] {
                return signal;
            }
        } else if pc == c {
            return signal;
        }
        i += 1;
    }
    !signal
}

/// Return the pattern index after the single atom at `pat[pp]`
/// (past `[set]`, `%x`, or one literal). Repetition suffixes are not consumed.
///
/// A `]` right after `[` or `[^` is a literal member; an escape inside the set
/// consumes the following character too, so `%]` never closes the set.
pub fn class_end(pat: &[char], pp: usize, escape: char) -> Result<usize> {
    let pc = pat[pp];
    let mut i = pp + 1;
    if pc == escape {
        // a bare trailing escape is rejected by the matcher before this point
        return Ok(i + 1);
    }
    if pc != '[' {
        return Ok(i);
    }
    let missing = || PatternError::syntax("missing ']'");
    if pat.get(i) == Some(&'^') {
        i += 1;
    }
    if pat.get(i) == Some(&']') {
        i += 1;
    }
    loop {
        match pat.get(i) {
            None => return Err(missing()),
            Some(']') => return Ok(i + 1),
            Some(&c) if c == escape && i + 1 < pat.len() => i += 2,
            Some(_) => i += 1,
        }
    }
}

/// Match the source character `c` against the atom `pat[pp..ep]`.
/// `None` (past the end of the source) never matches.
#[inline]
pub fn single_match(c: Option<char>, pat: &[char], pp: usize, ep: usize, escape: char) -> bool {
    let Some(c) = c else {
        return false;
    };
    match pat[pp] {
        '.' => true,
        pc if pc == escape => match_class(c, pat[pp + 1]),
        '[' => match_bracket_class(c, &pat[pp + 1..ep - 1], escape),
        pc => pc == c,
    }
}
