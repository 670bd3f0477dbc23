// signal.rs - Inbound violation signals and the severity filter
//
// The host's error channel carries many unrelated severities. Only the
// recoverable class is ever inspected; everything else passes straight
// through without the message body being read.
//
// Preconditions: none.
// Postconditions: `accept` is a pure function of the severity marker.
// Failure modes: none.
// Side effects: none.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric level the host runtime uses for recoverable errors.
pub const RECOVERABLE_ERROR_CODE: i64 = 4096;

/// Severity marker attached to every signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Recoverable,
    Other,
}

impl Severity {
    /// Map a host error level onto a severity marker.
    pub fn from_code(code: i64) -> Self {
        if code == RECOVERABLE_ERROR_CODE {
            Severity::Recoverable
        } else {
            Severity::Other
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "recoverable"),
            Severity::Other => write!(f, "other"),
        }
    }
}

/// A raw violation notification, consumed exactly once by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationSignal {
    pub severity: Severity,
    pub message: String,
}

impl ViolationSignal {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Shorthand for a signal of the handled severity.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self::new(Severity::Recoverable, message)
    }
}

/// Signal filter: true only for the recoverable severity class.
pub fn accept(signal: &ViolationSignal) -> bool {
    signal.severity == Severity::Recoverable
}
