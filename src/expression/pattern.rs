//! SQL `LIKE` pattern translation.
//!
//! A `LIKE` pattern is rewritten into an anchored regular expression by a
//! three-state scan:
//!
//! - default: `%` matches any run of characters, `_` exactly one character,
//!   `\` starts an escape, `[` opens a character class, everything else is
//!   literal;
//! - escape: `%`, `_` and `!` are taken literally, any other character is
//!   matched as a backslash followed by that character;
//! - class start: the single character after `[` is a class member, with `!`
//!   turned into the negation marker `^`.
//!
//! Characters after the class start are class members until `]`. Ranges such
//! as `[a-z]` pass through. Matching is case-sensitive.

use crate::expression::{ExpressionError, ExpressionResult};
use log::warn;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    Escape,
    ClassStart,
}

/// Translate a `LIKE` pattern into the equivalent anchored regex source.
pub fn translate_like(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 6);
    out.push_str("^(?:");

    let mut state = ScanState::Default;
    let mut in_class = false;

    for c in pattern.chars() {
        state = match state {
            ScanState::Default => match c {
                '\\' => ScanState::Escape,
                '[' if !in_class => {
                    out.push('[');
                    in_class = true;
                    ScanState::ClassStart
                }
                ']' if in_class => {
                    out.push(']');
                    in_class = false;
                    ScanState::Default
                }
                '%' if !in_class => {
                    out.push_str(".*");
                    ScanState::Default
                }
                '_' if !in_class => {
                    out.push('.');
                    ScanState::Default
                }
                _ => {
                    push_literal(&mut out, c, in_class);
                    ScanState::Default
                }
            },
            ScanState::Escape => {
                if !matches!(c, '%' | '_' | '!') {
                    push_literal(&mut out, '\\', in_class);
                }
                push_literal(&mut out, c, in_class);
                ScanState::Default
            }
            ScanState::ClassStart => {
                if c == '!' {
                    out.push('^');
                } else {
                    push_literal(&mut out, c, true);
                }
                ScanState::Default
            }
        };
    }

    out.push_str(")$");
    out
}

fn push_literal(out: &mut String, c: char, in_class: bool) {
    // '-' stays unescaped inside a class so ranges like [a-z] work
    if in_class && c == '-' {
        out.push(c);
        return;
    }
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// A `LIKE` pattern compiled once and tested against many subjects
#[derive(Debug, Clone)]
pub struct LikePattern {
    pattern: String,
    regex: Regex,
}

impl LikePattern {
    pub fn compile(pattern: &str) -> ExpressionResult<Self> {
        let source = translate_like(pattern);
        let regex = Regex::new(&source).map_err(|e| ExpressionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whole-string match of `subject` against the pattern
    pub fn matches(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }
}

/// Test `subject LIKE pattern`.
///
/// A pattern that cannot be compiled (an unterminated `[` class) matches
/// nothing.
pub fn like_match(subject: &str, pattern: &str) -> bool {
    match LikePattern::compile(pattern) {
        Ok(compiled) => compiled.matches(subject),
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(translate_like("A%B_"), "^(?:A.*B.)$");
        assert_eq!(translate_like(r"A\%B"), "^(?:A%B)$");
        assert_eq!(translate_like("[!abc]"), "^(?:[^abc])$");
        assert_eq!(translate_like("a.c"), r"^(?:a\.c)$");
        assert_eq!(translate_like(r"a\b"), r"^(?:a\\b)$");
    }

    #[test]
    fn test_wildcards() {
        assert!(like_match("AxyzB9", "A%B_"));
        assert!(like_match("AB9", "A%B_"));
        assert!(!like_match("AxyzB", "A%B_"));
        assert!(!like_match("AxyzB99", "A%B_"));
        assert!(like_match("", "%"));
        assert!(like_match("é", "_"));
    }

    #[test]
    fn test_escapes() {
        assert!(like_match("A%B", r"A\%B"));
        assert!(!like_match("AxB", r"A\%B"));
        assert!(!like_match("AxyzB", r"A\%B"));

        assert!(like_match("a_b", r"a\_b"));
        assert!(!like_match("axb", r"a\_b"));
        assert!(like_match("!", r"\!"));

        // Non-special escapes keep the backslash
        assert!(like_match(r"a\b", r"a\b"));
        assert!(!like_match("ab", r"a\b"));

        // Trailing backslash is dropped
        assert!(like_match("ab", "ab\\"));
    }

    #[test]
    fn test_character_class() {
        assert!(like_match("d", "[!abc]"));
        assert!(!like_match("a", "[!abc]"));
        assert!(!like_match("c", "[!abc]"));
        assert!(!like_match("dd", "[!abc]"));
        assert!(!like_match("", "[!abc]"));

        assert!(like_match("bx", "[a-c]x"));
        assert!(!like_match("dx", "[a-c]x"));
        assert!(like_match("%", "[%]"));
        assert!(!like_match("x", "[%]"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(like_match("a.c", "a.c"));
        assert!(!like_match("abc", "a.c"));
        assert!(like_match("(x)+", "(x)+"));
        assert!(like_match("$1^", "$1^"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(like_match("abc", "abc"));
        assert!(!like_match("abc", "ABC"));
        assert!(!like_match("Hello", "h%"));
    }

    #[test]
    fn test_unterminated_class() {
        assert!(matches!(
            LikePattern::compile("[abc"),
            Err(ExpressionError::InvalidPattern { .. })
        ));
        assert!(!like_match("a", "[abc"));
    }

    #[test]
    fn test_compiled_pattern_reuse() {
        let pattern = LikePattern::compile("J%n").unwrap();
        assert_eq!(pattern.pattern(), "J%n");
        assert!(pattern.matches("John"));
        assert!(pattern.matches("Jan"));
        assert!(!pattern.matches("Jane"));
    }
}
