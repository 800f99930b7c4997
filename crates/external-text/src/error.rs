/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for text evaluation and bundle loading.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while evaluating an interpolation site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The expression's root identifier is not bound in the data context.
    #[error("{name} is not defined")]
    UnboundIdentifier { name: String },

    /// A property was read from a value that does not exist.
    #[error("cannot read property '{property}' of {base} in '{expression}'")]
    PropertyOfNothing {
        property: String,
        base: &'static str,
        expression: String,
    },

    /// The interpolation site is malformed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },
}

/// Errors that can occur while rendering or loading texts.
#[derive(Debug, Error)]
pub enum TextError {
    /// Error evaluating a text as a template.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Evaluation did not settle within the configured number of passes.
    #[error("Template did not reach a fixed point after {passes} passes")]
    NoFixedPoint { passes: usize },

    /// I/O error reading a bundle file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON bundle.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML bundle.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Bundle file with an extension we cannot parse.
    #[error("Unsupported bundle format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
