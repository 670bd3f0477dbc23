// resolve.rs - Decide whether a parsed violation is a real mismatch
//
// Two strategies, strictly in this order:
//   1. Simple: fold the declared name and apply the name-only rule table.
//   2. Complex: for `numeric` and `callable` only, find the violating call in
//      the context and test the argument value itself.
// The context is not read at all unless step 2 is entered.
//
// Preconditions: frames in `ctx` are innermost first.
// Postconditions: `Verdict::Mismatch` carries the folded expected category,
//   or `None` when the declared name is outside the alias table.
// Failure modes: none.
// Side effects: none.

use serde::Serialize;
use tracing::{debug, trace};

use crate::context::{CallContext, Frame};
use crate::types::TypeCategory;
use crate::violation::ParsedViolation;

/// Which strategy settled a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Simple,
    Complex,
}

/// Outcome of type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The value satisfies the declared contract; the signal was a false
    /// positive.
    Match(Resolution),
    /// Genuine violation. `expected` is `None` if the declared name was not
    /// recognized.
    Mismatch { expected: Option<TypeCategory> },
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match(_))
    }
}

/// Resolve a parsed violation against the call context.
pub fn resolve<C: CallContext + ?Sized>(parsed: &ParsedViolation, ctx: &C) -> Verdict {
    let expected = TypeCategory::from_declared(&parsed.expected_type_name);

    let Some(category) = expected else {
        debug!(
            expected = %parsed.expected_type_name,
            "unrecognized expected type"
        );
        return Verdict::Mismatch { expected: None };
    };

    if category.matches_given(&parsed.given_type_name) {
        debug!(%category, given = %parsed.given_type_name, "simple resolution matched");
        return Verdict::Match(Resolution::Simple);
    }

    if category.needs_value() && resolve_complex(parsed, category, ctx) {
        debug!(%category, function = %parsed.qualified_name(), "complex resolution matched");
        return Verdict::Match(Resolution::Complex);
    }

    Verdict::Mismatch {
        expected: Some(category),
    }
}

/// Locate the violating call, innermost first, and test its argument.
///
/// The first frame that names the function (and, when the frame carries a
/// scope, the same scope) decides. Frames further out are never consulted,
/// so in a recursive call chain the innermost call wins.
fn resolve_complex<C: CallContext + ?Sized>(
    parsed: &ParsedViolation,
    category: TypeCategory,
    ctx: &C,
) -> bool {
    let Some(frame) = ctx
        .frames()
        .iter()
        .find(|frame| frame_matches(frame, parsed))
    else {
        debug!(function = %parsed.qualified_name(), "no frame for violating call");
        return false;
    };

    let Some(argument) = frame.argument(parsed.argument_offset()) else {
        debug!(
            function = %parsed.qualified_name(),
            index = %parsed.argument_index,
            "argument missing from frame"
        );
        return false;
    };

    trace!(kind = argument.type_name(), ?argument, "testing argument value");
    match category {
        TypeCategory::Numeric => argument.is_numeric(),
        TypeCategory::Callable => argument.is_callable(ctx),
        _ => false,
    }
}

fn frame_matches(frame: &Frame, parsed: &ParsedViolation) -> bool {
    if frame.function_name != parsed.function_name {
        return false;
    }
    match &frame.scope_name {
        None => true,
        Some(scope) => parsed.scope_name.as_deref() == Some(scope.as_str()),
    }
}
