// typehint - type-hint violation interceptor
//
// Library root. Pipeline order: signal -> lexer/parser -> resolve -> report,
// composed by `handler`; `hook` owns installation.

pub mod context;
pub mod handler;
pub mod hook;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod resolve;
pub mod signal;
pub mod types;
pub mod violation;

pub use context::{CallContext, CallStack, Frame, Value};
pub use handler::{handle, Outcome};
pub use hook::{HookRegistry, InstallError, InstallGuard};
pub use report::{TypeContractViolation, ViolationKind};
pub use signal::{Severity, ViolationSignal};
