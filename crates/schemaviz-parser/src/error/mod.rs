//! Diagnostics produced while reading SDL.
//!
//! - [`Diagnostic`]: one error or warning with labelled spans and help text
//! - [`ErrorCode`]: stable codes grouped by phase
//! - [`DiagnosticCollector`]: accumulates diagnostics across a phase
//! - [`ParseError`]: the error returned by [`parse`](crate::parse)

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;

pub use collector::DiagnosticCollector;
pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
