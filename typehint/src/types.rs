// types.rs - Type categories, alias folding, and name-only matching rules
//
// Declared type names are free-form (`int`, `float`, `numeric`, ...). They
// are folded onto a fixed set of categories; anything outside the table is
// unrecognized and surfaces as `None`.
//
// Preconditions: none.
// Postconditions: `matches_given` never consults argument values.
// Failure modes: none.
// Side effects: none.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical kinds and pseudo-kinds a declaration can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Boolean,
    Integer,
    Double,
    String,
    Resource,
    /// integer or double
    Number,
    /// boolean, integer, double or string
    Scalar,
    /// a value that passes the numeric-string test
    Numeric,
    /// a value that can be invoked
    Callable,
    /// anything
    Mixed,
}

impl TypeCategory {
    #[cfg(test)]
    pub const ALL: [TypeCategory; 10] = [
        TypeCategory::Boolean,
        TypeCategory::Integer,
        TypeCategory::Double,
        TypeCategory::String,
        TypeCategory::Resource,
        TypeCategory::Number,
        TypeCategory::Scalar,
        TypeCategory::Numeric,
        TypeCategory::Callable,
        TypeCategory::Mixed,
    ];

    /// Fold a declared type name onto its category.
    ///
    /// `bool`, `int`, `float` and `real` are aliases; every other known name
    /// is its own canonical form. Matching is case-sensitive.
    pub fn from_declared(name: &str) -> Option<TypeCategory> {
        let category = match name {
            "boolean" | "bool" => TypeCategory::Boolean,
            "integer" | "int" => TypeCategory::Integer,
            "double" | "float" | "real" => TypeCategory::Double,
            "string" => TypeCategory::String,
            "resource" => TypeCategory::Resource,
            "number" => TypeCategory::Number,
            "scalar" => TypeCategory::Scalar,
            "numeric" => TypeCategory::Numeric,
            "callable" => TypeCategory::Callable,
            "mixed" => TypeCategory::Mixed,
            _ => return None,
        };
        Some(category)
    }

    /// Canonical name after alias folding.
    pub fn canonical_name(self) -> &'static str {
        match self {
            TypeCategory::Boolean => "boolean",
            TypeCategory::Integer => "integer",
            TypeCategory::Double => "double",
            TypeCategory::String => "string",
            TypeCategory::Resource => "resource",
            TypeCategory::Number => "number",
            TypeCategory::Scalar => "scalar",
            TypeCategory::Numeric => "numeric",
            TypeCategory::Callable => "callable",
            TypeCategory::Mixed => "mixed",
        }
    }

    /// Whether deciding this category needs the live argument value.
    pub fn needs_value(self) -> bool {
        matches!(self, TypeCategory::Numeric | TypeCategory::Callable)
    }

    /// Name-only rule: does a value whose runtime type is `given` satisfy
    /// this category? Value-dependent categories always answer false here.
    pub fn matches_given(self, given: &str) -> bool {
        match self {
            TypeCategory::Boolean
            | TypeCategory::Integer
            | TypeCategory::Double
            | TypeCategory::String
            | TypeCategory::Resource => given == self.canonical_name(),
            TypeCategory::Number => matches!(given, "integer" | "double"),
            TypeCategory::Scalar => matches!(given, "boolean" | "integer" | "double" | "string"),
            TypeCategory::Mixed => true,
            TypeCategory::Numeric | TypeCategory::Callable => false,
        }
    }

    /// Phrase used in place of `an instance of <type>` in reports.
    pub fn display_phrase(self) -> String {
        match self {
            TypeCategory::Number => "a number".to_string(),
            TypeCategory::Scalar => "a scalar".to_string(),
            TypeCategory::Numeric => "a numeric value".to_string(),
            TypeCategory::Callable => "callable".to_string(),
            other => format!("of the type {}", other.canonical_name()),
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIVEN: [&str; 5] = ["boolean", "integer", "double", "string", "resource"];

    #[test]
    fn aliases_fold_to_canonical() {
        assert_eq!(TypeCategory::from_declared("bool"), Some(TypeCategory::Boolean));
        assert_eq!(TypeCategory::from_declared("int"), Some(TypeCategory::Integer));
        assert_eq!(TypeCategory::from_declared("float"), Some(TypeCategory::Double));
        assert_eq!(TypeCategory::from_declared("real"), Some(TypeCategory::Double));
    }

    #[test]
    fn canonical_names_round_trip() {
        for category in TypeCategory::ALL {
            assert_eq!(TypeCategory::from_declared(category.canonical_name()), Some(category));
        }
    }

    #[test]
    fn unknown_names_are_unrecognized() {
        assert_eq!(TypeCategory::from_declared("DateTime"), None);
        assert_eq!(TypeCategory::from_declared("Int"), None);
        assert_eq!(TypeCategory::from_declared("array"), None);
        assert_eq!(TypeCategory::from_declared(""), None);
    }

    #[test]
    fn resource_is_fully_supported() {
        let resource = TypeCategory::from_declared("resource").unwrap();
        assert!(resource.matches_given("resource"));
        assert!(!resource.matches_given("string"));
        assert_eq!(resource.display_phrase(), "of the type resource");
    }

    #[test]
    fn primitive_rules_match_only_themselves() {
        for declared in ["boolean", "integer", "double", "string", "resource"] {
            let category = TypeCategory::from_declared(declared).unwrap();
            for given in GIVEN {
                assert_eq!(
                    category.matches_given(given),
                    declared == given,
                    "{declared} vs {given}"
                );
            }
        }
    }

    #[test]
    fn number_rule() {
        let c = TypeCategory::Number;
        assert!(c.matches_given("integer"));
        assert!(c.matches_given("double"));
        assert!(!c.matches_given("string"));
        assert!(!c.matches_given("boolean"));
    }

    #[test]
    fn scalar_rule() {
        let c = TypeCategory::Scalar;
        for given in ["boolean", "integer", "double", "string"] {
            assert!(c.matches_given(given));
        }
        assert!(!c.matches_given("resource"));
        assert!(!c.matches_given("array"));
        assert!(!c.matches_given("NULL"));
    }

    #[test]
    fn mixed_matches_everything() {
        for given in GIVEN.iter().chain(["array", "object", "NULL"].iter()) {
            assert!(TypeCategory::Mixed.matches_given(given));
        }
    }

    #[test]
    fn value_dependent_categories_never_match_by_name() {
        for given in GIVEN {
            assert!(!TypeCategory::Numeric.matches_given(given));
            assert!(!TypeCategory::Callable.matches_given(given));
        }
        assert!(TypeCategory::Numeric.needs_value());
        assert!(TypeCategory::Callable.needs_value());
        assert!(!TypeCategory::Number.needs_value());
    }

    #[test]
    fn display_phrases() {
        assert_eq!(TypeCategory::Number.display_phrase(), "a number");
        assert_eq!(TypeCategory::Scalar.display_phrase(), "a scalar");
        assert_eq!(TypeCategory::Numeric.display_phrase(), "a numeric value");
        assert_eq!(TypeCategory::Callable.display_phrase(), "callable");
        assert_eq!(TypeCategory::Integer.display_phrase(), "of the type integer");
        assert_eq!(TypeCategory::Double.display_phrase(), "of the type double");
    }
}
