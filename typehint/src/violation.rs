// Structured form of a recognized violation message.
//
// Produced by the parser only when every field was extracted; there is no
// partially-filled state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based argument position as the host wrote it.
///
/// The digits are kept verbatim so a parsed message re-renders byte for
/// byte (`Argument 01 ...` stays `01`). The numeric value saturates at
/// `u64::MAX`; such an index never names a passed argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct ArgumentIndex {
    value: u64,
    digits: String,
}

impl ArgumentIndex {
    /// Read a run of ASCII digits. `None` for empty or non-digit text.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = digits.bytes().fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        });
        Some(Self {
            value,
            digits: digits.to_string(),
        })
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl From<u64> for ArgumentIndex {
    fn from(value: u64) -> Self {
        Self {
            value,
            digits: value.to_string(),
        }
    }
}

impl From<ArgumentIndex> for u64 {
    fn from(index: ArgumentIndex) -> Self {
        index.value
    }
}

impl fmt::Display for ArgumentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// The five fields carried by a type-hint violation message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedViolation {
    /// 1-based position of the offending argument.
    pub argument_index: ArgumentIndex,
    /// Enclosing type or module; `None` for free functions.
    pub scope_name: Option<String>,
    pub function_name: String,
    /// Type name as written in the declaration (may be an alias).
    pub expected_type_name: String,
    /// Canonical runtime name of the passed value's type.
    pub given_type_name: String,
}

impl ParsedViolation {
    /// Zero-based position of the offending argument.
    pub fn argument_offset(&self) -> usize {
        usize::try_from(self.argument_index.get().saturating_sub(1)).unwrap_or(usize::MAX)
    }

    /// `Scope::function` or just `function`.
    pub fn qualified_name(&self) -> String {
        match &self.scope_name {
            Some(scope) => format!("{scope}::{}", self.function_name),
            None => self.function_name.clone(),
        }
    }
}

/// Renders the message template the fields were extracted from (without any
/// trailing text the host appended after `given`).
impl fmt::Display for ParsedViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Argument {} passed to {}() must be an instance of {}, {} given",
            self.argument_index,
            self.qualified_name(),
            self.expected_type_name,
            self.given_type_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scope: Option<&str>) -> ParsedViolation {
        ParsedViolation {
            argument_index: 2u64.into(),
            scope_name: scope.map(str::to_string),
            function_name: "bar".into(),
            expected_type_name: "int".into(),
            given_type_name: "string".into(),
        }
    }

    #[test]
    fn display_method() {
        assert_eq!(
            sample(Some("Foo")).to_string(),
            "Argument 2 passed to Foo::bar() must be an instance of int, string given"
        );
    }

    #[test]
    fn display_free_function() {
        assert_eq!(
            sample(None).to_string(),
            "Argument 2 passed to bar() must be an instance of int, string given"
        );
    }

    #[test]
    fn argument_offset_is_zero_based() {
        assert_eq!(sample(None).argument_offset(), 1);
    }

    #[test]
    fn index_keeps_leading_zeros() {
        let index = ArgumentIndex::from_digits("007").unwrap();
        assert_eq!(index.get(), 7);
        assert_eq!(index.to_string(), "007");

        let mut v = sample(None);
        v.argument_index = index;
        assert_eq!(v.argument_offset(), 6);
        assert_eq!(
            v.to_string(),
            "Argument 007 passed to bar() must be an instance of int, string given"
        );
    }

    #[test]
    fn oversized_index_saturates() {
        let index = ArgumentIndex::from_digits("4294967296").unwrap();
        assert_eq!(index.get(), 4_294_967_296);
        let huge = ArgumentIndex::from_digits("99999999999999999999999").unwrap();
        assert_eq!(huge.get(), u64::MAX);
        assert_eq!(huge.as_str(), "99999999999999999999999");
    }

    #[test]
    fn non_digits_are_not_an_index() {
        assert_eq!(ArgumentIndex::from_digits(""), None);
        assert_eq!(ArgumentIndex::from_digits("1a"), None);
        assert_eq!(ArgumentIndex::from_digits("-1"), None);
    }

    #[test]
    fn index_serializes_as_number() {
        let json = serde_json::to_value(sample(Some("Foo"))).unwrap();
        assert_eq!(json["argument_index"], 2);
    }
}
