//! Error types for schemaviz operations.
//!
//! This module provides the main error type [`SchemavizError`] which wraps
//! the error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use schemaviz_parser::ParseError;

use crate::{config::ConfigError, layout::LayoutError};

/// The main error type for schemaviz operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// diagnostics, so callers can render them with source snippets.
#[derive(Debug, Error)]
pub enum SchemavizError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    /// A JSON schema document could not be deserialized.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for SchemavizError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl SchemavizError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
