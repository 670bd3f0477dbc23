// handler.rs - The interception pipeline: filter -> parse -> resolve -> report
//
// `handle` is the inbound boundary. Its `Ok` side says whether the signal was
// consumed; its `Err` side is the violation to surface to the caller of the
// function whose argument failed its declared type.
//
// Preconditions: `ctx` describes the calls active when the signal fired.
// Postconditions: signals of any severity other than recoverable, and
//   messages outside the violation grammar, return an unhandled outcome and
//   raise nothing.
// Failure modes: `TypeContractViolation` for confirmed mismatches and for
//   unrecognized expected types.
// Side effects: none beyond tracing events.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::context::CallContext;
use crate::parser::parse;
use crate::report::{report, TypeContractViolation};
use crate::resolve::{resolve, Resolution, Verdict};
use crate::signal::{accept, ViolationSignal};

/// Non-failure outcomes of handling a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Severity outside the handled class.
    NotApplicable,
    /// Message does not follow the violation grammar.
    Unparsed,
    /// The value satisfies the declared contract after all.
    Suppressed(Resolution),
}

impl Outcome {
    /// The boolean the host expects back: true suppresses its default
    /// handling.
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Suppressed(_))
    }
}

/// Run one signal through the pipeline.
pub fn handle<C: CallContext + ?Sized>(
    signal: &ViolationSignal,
    ctx: &C,
) -> Result<Outcome, TypeContractViolation> {
    if !accept(signal) {
        return Ok(Outcome::NotApplicable);
    }

    let parsed = match parse(&signal.message) {
        Ok(parsed) => parsed,
        Err(failure) => {
            debug!(%failure, "passing signal through");
            return Ok(Outcome::Unparsed);
        }
    };
    debug!(
        function = %parsed.qualified_name(),
        index = %parsed.argument_index,
        expected = %parsed.expected_type_name,
        given = %parsed.given_type_name,
        "parsed violation"
    );

    match resolve(&parsed, ctx) {
        Verdict::Match(resolution) => Ok(Outcome::Suppressed(resolution)),
        Verdict::Mismatch { expected } => Err(report(expected, &signal.message, signal.severity)),
    }
}

/// JSON rendering of a handling result, as printed by `--emit json`.
pub fn result_json(result: &Result<Outcome, TypeContractViolation>) -> serde_json::Value {
    match result {
        Ok(outcome) => json!({
            "handled": outcome.is_handled(),
            "outcome": outcome,
        }),
        Err(violation) => json!({
            "handled": true,
            "violation": violation,
        }),
    }
}
