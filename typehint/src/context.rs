// context.rs - Call context: the frames active when a violation was trapped
//
// Value-dependent pseudo-types need the argument as it was actually passed.
// Whoever traps the violation hands the resolver a `CallContext`; the
// resolver only reads it. `CallStack` is the owned implementation, buildable
// in code or loaded from JSON.
//
// Preconditions: frames are ordered innermost first.
// Postconditions: nothing here mutates a context after construction.
// Failure modes: loading a context file can fail (`ContextError`).
// Side effects: `CallStack::load` reads a file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Values ──────────────────────────────────────────────────────────────────

/// An argument value as the host passed it.
///
/// Serialized untagged so that a JSON context reads naturally: `null`,
/// `true`, `3`, `2.5`, `"abc"` and `[...]` map onto the obvious variants;
/// resources and closures are written as `{"resource": "stream"}` and
/// `{"closure": "name"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Resource {
        #[serde(rename = "resource")]
        kind: String,
    },
    Closure {
        #[serde(rename = "closure")]
        name: String,
    },
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn closure(name: impl Into<String>) -> Self {
        Value::Closure { name: name.into() }
    }

    /// The host's canonical type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Resource { .. } => "resource",
            Value::Closure { .. } => "object",
        }
    }

    /// Numbers are numeric; strings are numeric when their whole text is a
    /// decimal number (see `is_numeric_str`); nothing else is.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) | Value::Double(_) => true,
            Value::String(text) => is_numeric_str(text),
            _ => false,
        }
    }

    /// Whether the value can be invoked in `ctx`.
    ///
    /// Closures always can. A string names a function or `Scope::method`; a
    /// two-element array `[scope, method]` names a method. Both are looked up
    /// through `CallContext::is_invocable_name`.
    pub fn is_callable<C: CallContext + ?Sized>(&self, ctx: &C) -> bool {
        match self {
            Value::Closure { .. } => true,
            Value::String(name) => ctx.is_invocable_name(name),
            Value::Array(items) => match items.as_slice() {
                [Value::String(scope), Value::String(method)] => {
                    ctx.is_invocable_name(&format!("{scope}::{method}"))
                }
                _ => false,
            },
            _ => false,
        }
    }
}

/// Numeric-string test.
///
/// Accepts leading whitespace, an optional sign, digits with an optional
/// fractional part (at least one digit overall) and an optional exponent.
/// Trailing characters of any kind, including whitespace, reject.
pub fn is_numeric_str(text: &str) -> bool {
    let bytes = text
        .trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c'])
        .as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end == j {
            return false;
        }
        i = exp_end;
    }

    i == bytes.len()
}

// ── Frames ──────────────────────────────────────────────────────────────────

/// One active call record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "function")]
    pub function_name: String,
    #[serde(rename = "scope", default, skip_serializing_if = "Option::is_none")]
    pub scope_name: Option<String>,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Frame {
    /// A free-function call.
    pub fn function(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function_name: name.into(),
            scope_name: None,
            args,
        }
    }

    /// A call on a named scope (`Scope::name`).
    pub fn method(scope: impl Into<String>, name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function_name: name.into(),
            scope_name: Some(scope.into()),
            args,
        }
    }

    /// Argument at a zero-based offset, if it was passed.
    pub fn argument(&self, offset: usize) -> Option<&Value> {
        self.args.get(offset)
    }
}

// ── Context trait ───────────────────────────────────────────────────────────

/// Read-only view of the calls active at the moment of the violation.
pub trait CallContext {
    /// Active frames, innermost first.
    fn frames(&self) -> &[Frame];

    /// Whether a function or `Scope::method` of this name can be invoked.
    fn is_invocable_name(&self, name: &str) -> bool;
}

/// Owned call context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallStack {
    /// Innermost first.
    #[serde(default)]
    pub frames: Vec<Frame>,
    /// Names of invocable functions and `Scope::method`s, ASCII-lowercased.
    #[serde(default)]
    pub callables: BTreeSet<String>,
}

/// Errors that can occur while loading a call context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid call context: {0}")]
    Json(#[from] serde_json::Error),
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame one level further out than those already present.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Register an invocable function or `Scope::method` name. Host names
    /// are case-insensitive.
    pub fn with_callable(mut self, name: impl Into<String>) -> Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.callables.insert(name);
        self
    }

    pub fn from_json(text: &str) -> Result<Self, ContextError> {
        let mut stack: CallStack = serde_json::from_str(text)?;
        stack.callables = stack
            .callables
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        Ok(stack)
    }

    /// Load a context from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ContextError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

impl CallContext for CallStack {
    fn frames(&self) -> &[Frame] {
        &self.frames
    }

    fn is_invocable_name(&self, name: &str) -> bool {
        self.callables.contains(&name.to_ascii_lowercase())
    }
}
