// report.rs - Build the normalized violation report
//
// A confirmed mismatch is reported by rewriting the host's message: every
// `an instance of <Word>` becomes the display phrase of the expected
// category. Everything else in the message (index, scope, function, trailing
// text) is copied byte for byte. An unrecognized expected type keeps the
// original message untouched.
//
// Preconditions: none.
// Postconditions: `report` always yields a failure value.
// Failure modes: none.
// Side effects: none.

use serde::Serialize;
use thiserror::Error;

use crate::lexer::{lex, Span, Token};
use crate::signal::Severity;
use crate::types::TypeCategory;

/// Why a violation was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value does not satisfy a recognized contract.
    ConfirmedMismatch,
    /// The declared type is outside the alias table; the host message is
    /// passed on unmodified.
    UnrecognizedExpectedType,
}

/// A type-contract violation, raised to the caller of the violating
/// function.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct TypeContractViolation {
    pub kind: ViolationKind,
    pub message: String,
    pub severity: Severity,
}

/// Produce the report for a genuine mismatch.
pub fn report(
    expected: Option<TypeCategory>,
    raw_message: &str,
    severity: Severity,
) -> TypeContractViolation {
    match expected {
        Some(category) => TypeContractViolation {
            kind: ViolationKind::ConfirmedMismatch,
            message: rewrite(raw_message, &category.display_phrase()),
            severity,
        },
        None => TypeContractViolation {
            kind: ViolationKind::UnrecognizedExpectedType,
            message: raw_message.to_string(),
            severity,
        },
    }
}

/// Replace each `an instance of <Word>` in `raw` with `phrase`.
///
/// `an` only has to end a word, so `Titan instance of X` becomes
/// `Tit<phrase>`. The type word is taken whole.
pub fn rewrite(raw: &str, phrase: &str) -> String {
    let tokens = lex(raw);
    let mut out = String::with_capacity(raw.len() + phrase.len());
    let mut copied = 0;
    let mut i = 0;

    while i < tokens.len() {
        match instance_of_at(&tokens[i..]) {
            Some((start, end)) => {
                out.push_str(&raw[copied..start]);
                out.push_str(phrase);
                copied = end;
                i += INSTANCE_OF_TOKENS;
            }
            None => i += 1,
        }
    }
    out.push_str(&raw[copied..]);
    out
}

// an ␠ instance ␠ of ␠ <Word>
const INSTANCE_OF_TOKENS: usize = 7;

/// If `tokens` starts with `an instance of <Word>`, the byte range from
/// `an` to the end of the type word.
fn instance_of_at(tokens: &[(Token, Span)]) -> Option<(usize, usize)> {
    let [
        (Token::Word(an), lead),
        (s1, _),
        (instance, _),
        (s2, _),
        (of, _),
        (s3, _),
        (Token::Word(_), ty),
        ..,
    ] = tokens
    else {
        return None;
    };
    let is_word = |t: &Token, w: &str| t.as_word() == Some(w);
    let spaces = [s1, s2, s3].iter().all(|t| **t == Token::Space);

    let phrase = an.ends_with("an") && is_word(instance, "instance") && is_word(of, "of");
    (phrase && spaces).then_some((lead.end - "an".len(), ty.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPED: &str = "Argument 2 passed to Foo::bar() must be an instance of int, string given";

    fn confirmed(declared: &str, raw: &str) -> String {
        let category = TypeCategory::from_declared(declared);
        assert!(category.is_some(), "{declared} should be recognized");
        let violation = report(category, raw, Severity::Recoverable);
        assert_eq!(violation.kind, ViolationKind::ConfirmedMismatch);
        violation.message
    }

    #[test]
    fn canonical_type_phrase() {
        assert_eq!(
            confirmed("int", SCOPED),
            "Argument 2 passed to Foo::bar() must be of the type integer, string given"
        );
    }

    #[test]
    fn pseudo_type_phrases() {
        let raw =
            |t: &str| format!("Argument 1 passed to f() must be an instance of {t}, string given");
        assert_eq!(
            confirmed("number", &raw("number")),
            "Argument 1 passed to f() must be a number, string given"
        );
        assert_eq!(
            confirmed("scalar", &raw("scalar")),
            "Argument 1 passed to f() must be a scalar, string given"
        );
        assert_eq!(
            confirmed("numeric", &raw("numeric")),
            "Argument 1 passed to f() must be a numeric value, string given"
        );
        assert_eq!(
            confirmed("callable", &raw("callable")),
            "Argument 1 passed to f() must be callable, string given"
        );
    }

    #[test]
    fn alias_reported_by_canonical_name() {
        let raw = "Argument 1 passed to f() must be an instance of real, string given";
        assert_eq!(
            confirmed("real", raw),
            "Argument 1 passed to f() must be of the type double, string given"
        );
    }

    #[test]
    fn trailing_text_preserved() {
        let raw = "Argument 1 passed to f() must be an instance of bool, string given, called in /a/b.php on line 9";
        assert_eq!(
            confirmed("bool", raw),
            "Argument 1 passed to f() must be of the type boolean, string given, called in /a/b.php on line 9"
        );
    }

    #[test]
    fn unrecognized_type_keeps_raw_message() {
        let raw = "Argument 1 passed to f() must be an instance of Widget, string given";
        let violation = report(None, raw, Severity::Recoverable);
        assert_eq!(violation.kind, ViolationKind::UnrecognizedExpectedType);
        assert_eq!(violation.message, raw);
    }

    #[test]
    fn severity_is_carried() {
        let violation = report(Some(TypeCategory::Integer), SCOPED, Severity::Other);
        assert_eq!(violation.severity, Severity::Other);
    }

    #[test]
    fn display_is_message() {
        let violation = report(Some(TypeCategory::Integer), SCOPED, Severity::Recoverable);
        assert_eq!(violation.to_string(), violation.message);
    }

    #[test]
    fn rewrite_replaces_every_occurrence() {
        assert_eq!(
            rewrite("an instance of A and an instance of B", "X"),
            "X and X"
        );
    }

    #[test]
    fn rewrite_without_pattern_is_identity() {
        let raw = "an instance of";
        assert_eq!(rewrite(raw, "X"), raw);
        assert_eq!(rewrite("", "X"), "");
        assert_eq!(rewrite("an  instance of A", "X"), "an  instance of A");
    }

    #[test]
    fn rewrite_matches_an_at_the_end_of_a_word() {
        assert_eq!(
            rewrite("Titan instance of Moon, an instance of int", "X"),
            "TitX, X"
        );
        assert_eq!(rewrite("anan instance of A", "X"), "anX");
        assert_eq!(rewrite("ant instance of A", "X"), "ant instance of A");
    }

    #[test]
    fn rewrite_keeps_non_ascii_around_match() {
        assert_eq!(rewrite("ü an instance of T ü", "X"), "ü X ü");
    }
}
