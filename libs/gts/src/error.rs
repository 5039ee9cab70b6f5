//! Error types for GTS parsing, hashing, and extraction.

use thiserror::Error;

/// Errors that can occur when parsing identifiers or extracting them from documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GtsError {
    /// The identifier string is empty.
    #[error("GTS identifier cannot be empty")]
    Empty,

    /// The identifier exceeds the maximum allowed length.
    #[error("GTS identifier is {len} characters long, maximum is {max}")]
    TooLong { len: usize, max: usize },

    /// The text does not conform to the identifier grammar.
    #[error("invalid GTS identifier '{input}': expected {expected} at position {position}")]
    Grammar {
        input: String,
        position: usize,
        expected: &'static str,
    },

    /// Extraction was given a JSON root that is not an object.
    #[error("JSON root must be an object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// UUID derivation was given an empty name.
    #[error("name for UUID derivation cannot be empty")]
    EmptyName,

    /// The JSON text could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl GtsError {
    /// Returns true if the input text violated the identifier grammar
    /// (including the empty and length checks done before recognition).
    pub fn is_grammar_error(&self) -> bool {
        matches!(
            self,
            GtsError::Empty | GtsError::TooLong { .. } | GtsError::Grammar { .. }
        )
    }

    /// Returns true if the caller broke a documented precondition.
    pub fn is_input_contract_error(&self) -> bool {
        matches!(
            self,
            GtsError::NotAnObject { .. } | GtsError::EmptyName | GtsError::Json(_)
        )
    }
}

impl From<serde_json::Error> for GtsError {
    fn from(err: serde_json::Error) -> Self {
        GtsError::Json(err.to_string())
    }
}
