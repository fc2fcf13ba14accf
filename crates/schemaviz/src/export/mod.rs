//! Export of schema diagrams.
//!
//! This module is the last stage of the schemaviz pipeline:
//!
//! ```text
//! SDL / JSON
//!     ↓ parse
//! Schema
//!     ↓ layout
//! Layout (positioned nodes)
//!     ↓ export (this module)
//! Mermaid / draw.io / SVG text
//! ```
//!
//! # Available Backends
//!
//! - [`mermaid`] - Mermaid `classDiagram` text. Mermaid lays diagrams out
//!   itself, so this backend reads only the [`Schema`](schemaviz_core::schema::Schema).
//! - [`drawio`] - draw.io `mxfile` XML with the computed positions.
//! - [`svg`] - a standalone SVG document built with the `svg` crate.
//!
//! # Error Handling
//!
//! Backends return [`Error`], which converts into
//! [`SchemavizError::Export`](crate::SchemavizError::Export) at the crate
//! boundary.

pub mod drawio;
pub mod mermaid;
pub mod svg;

use std::fmt;

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while serializing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Self::Render(err.to_string())
    }
}

/// Escapes text for use inside XML attribute values and character data.
pub(crate) struct EscapeXml<'a>(pub(crate) &'a str);

impl fmt::Display for EscapeXml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0;
        let mut start = 0;
        for (i, byte) in text.bytes().enumerate() {
            let escaped = match byte {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                b'\'' => "&#39;",
                b'\n' => "&#10;",
                _ => continue,
            };
            f.write_str(&text[start..i])?;
            f.write_str(escaped)?;
            start = i + 1;
        }
        f.write_str(&text[start..])
    }
}
