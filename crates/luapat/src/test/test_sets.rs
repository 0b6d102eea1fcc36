// Tests for sets, classes and ranges over the first 256 code points
use std::collections::BTreeSet;

use crate::*;
use rstest::rstest;

fn abc() -> String {
    (0u8..=255).map(char::from).collect()
}

/// Every char of `abc()` that `p` matches on its own.
fn strset(p: &str) -> BTreeSet<char> {
    let source = abc();
    let mut result = BTreeSet::new();
    gsub(
        &source,
        p,
        Replacement::function(&mut |c| {
            result.extend(c[0].as_str()?.chars());
            None
        }),
    )
    .unwrap();
    result
}

fn set_of(chars: &str) -> BTreeSet<char> {
    chars.chars().collect()
}

#[test]
fn test_hex_range_set() {
    assert_eq!(strset("[\u{c0}-\u{d0}]").len(), 17);
}

#[test]
fn test_range_set() {
    assert_eq!(strset("[a-z]"), set_of("abcdefghijklmnopqrstuvwxyz"));
}

#[test]
fn test_range_and_class_set() {
    assert_eq!(strset("[a-z%d]"), strset("[%da-uu-z]"));
}

#[test]
fn test_dash_at_end_of_set() {
    assert_eq!(strset("[a-]"), set_of("-a"));
}

#[test]
fn test_negated_set() {
    assert_eq!(strset("[^%W]"), strset("[%w]"));
}

#[test]
fn test_right_bracket_percent_set() {
    assert_eq!(strset("[]%%]"), set_of("%]"));
}

#[test]
fn test_escaped_dash_in_set() {
    assert_eq!(strset("[a%-z]"), set_of("-az"));
}

#[test]
fn test_escapes_in_set() {
    assert_eq!(strset("[%^%[%-a%]%-b]"), set_of("-[]^ab"));
}

#[test]
fn test_percent_z() {
    assert_eq!(strset("%Z"), strset(&format!("[\u{1}-{}]", char::MAX)));
    assert_eq!(strset("%z"), set_of("\0"));
}

#[test]
fn test_dot() {
    assert_eq!(strset("."), strset(&format!("[\u{1}-{}%z]", char::MAX)));
    assert_eq!(strset(".").len(), 256);
}

#[test]
fn test_percent_u() {
    let expected: BTreeSet<char> = abc().chars().filter(|c| c.is_uppercase()).collect();
    assert_eq!(strset("%u"), expected);
}

#[test]
fn test_class_complements_partition() {
    let all = strset(".");
    for cl in ['a', 'c', 'd', 'g', 'l', 'p', 's', 'u', 'w', 'x'] {
        let lower = strset(&format!("%{cl}"));
        let upper = strset(&format!("%{}", cl.to_ascii_uppercase()));
        assert!(lower.is_disjoint(&upper), "%{cl}");
        assert_eq!(&lower | &upper, all, "%{cl}");
    }
}

#[test]
fn test_ascii_classes() {
    assert_eq!(
        strset("%x").into_iter().filter(char::is_ascii).collect::<String>(),
        "0123456789ABCDEFabcdef"
    );
    assert_eq!(
        strset("%s").into_iter().filter(char::is_ascii).collect::<String>(),
        "\t\n\u{b}\u{c}\r\u{1c}\u{1d}\u{1e}\u{1f} "
    );
    // symbols such as `$` and `+` are not punctuation
    assert_eq!(
        strset("%p").into_iter().filter(char::is_ascii).collect::<String>(),
        "!\"#%&'()*,-./:;?@[\\]_{}"
    );
}

#[test]
fn test_latin1_classes() {
    let latin1 = |p: &str| -> String {
        strset(p).into_iter().filter(|c| *c as u32 >= 0x80).collect()
    };
    assert_eq!(latin1("%p"), "\u{a1}\u{a7}\u{ab}\u{b6}\u{b7}\u{bb}\u{bf}");
    assert_eq!(latin1("%d"), "\u{b2}\u{b3}\u{b9}");
    // soft hyphen is a format char, NBSP a separator
    assert!(latin1("%c").contains('\u{ad}'));
    assert!(!latin1("%g").contains('\u{ad}'));
    assert!(!latin1("%g").contains('\u{a0}'));
    assert!(latin1("%a").contains('\u{aa}'));
    assert!(!latin1("%a").contains('\u{bd}'));
}

#[rstest]
#[case("\u{ff01}", "%p", Some((0, 1)))]
#[case("\u{2e2e}", "%p", Some((0, 1)))]
#[case("\u{300c}x\u{300d}", "%p", Some((0, 1)))]
#[case("\u{20ac}", "%p", None)]
#[case("a\u{200b}b", "%c", Some((1, 2)))]
#[case("\u{200b}", "%g", None)]
#[case("\u{3000}x", "%g", Some((1, 2)))]
#[case("\u{bd}", "%d", None)]
#[case("\u{bd}", "%x", None)]
#[case("x\u{2075}", "%d", Some((1, 2)))]
#[case("\u{2460}", "%d", Some((0, 1)))]
#[case("\u{669}", "%d", Some((0, 1)))]
#[case("\u{2160}", "%a", None)]
#[case("\u{2160}", "%w", None)]
#[case("\u{2160}", "%W", Some((0, 1)))]
#[case("\u{5d0}\u{5d1}", "%a+", Some((0, 2)))]
#[case("\u{1c5}", "%a", Some((0, 1)))]
fn test_unicode_classes(
    #[case] source: &str,
    #[case] pattern: &str,
    #[case] expected: Option<(usize, usize)>,
) {
    assert_eq!(super::span(source, pattern, 0), expected);
}
