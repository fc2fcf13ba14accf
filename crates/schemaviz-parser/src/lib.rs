//! # Schemaviz Parser
//!
//! Reader for GraphQL SDL. This crate turns schema source text into the
//! [`Schema`] descriptors the schemaviz layout engine and renderers consume.
//!
//! ## Usage
//!
//! ```
//! # use schemaviz_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         type Query { users(filter: UserFilter): [User!]! }
//!         type User { id: ID!, name: String }
//!         input UserFilter { name: String }
//!     "#;
//!
//!     let schema = parse(source)?;
//!     assert_eq!(schema.classes.len(), 3);
//!     assert_eq!(schema.relations.len(), 2);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use error::ParseError;
pub use span::Span;

use schemaviz_core::schema::Schema;

use elaborate::Builder;

/// Parse SDL source text into a [`Schema`].
///
/// The pipeline has three steps:
///
/// 1. **Tokenize** - convert source text to tokens, collecting every lexical error
/// 2. **Parse** - build the syntax tree, stopping at the first syntax error
/// 3. **Elaborate** - resolve type references into classes, scalars,
///    directives and relations, collecting every semantic error
///
/// # Errors
///
/// Returns a [`ParseError`] carrying one or more diagnostics with source
/// spans if any step fails.
///
/// # Example
///
/// ```
/// # use schemaviz_parser::parse;
/// let err = parse("type User { id: ID } type User { id: ID }").unwrap_err();
/// assert_eq!(err.diagnostics()[0].code().map(|c| c.as_str()), Some("E301"));
/// ```
pub fn parse(source: &str) -> Result<Schema, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let document = parser::build_document(&tokens)?;
    Builder::new().build(&document)
}
