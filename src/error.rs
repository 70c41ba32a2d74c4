//! Error types for the Kashi library.
//!
//! All errors are represented by the [`KashiError`] enum. Linguistic ambiguity
//! (furigana alignment fallback, missing dictionary entries, unmatched grammar
//! rules) is never an error; only conditions the pipeline cannot recover from
//! surface here.
//!
//! # Examples
//!
//! ```
//! use kashi::error::{KashiError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(KashiError::tokenizer("analyzer unavailable"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Kashi operations.
#[derive(Error, Debug)]
pub enum KashiError {
    /// I/O errors (dictionary files, rule files, CLI input)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (line assembly, alignment input)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The external tokenizer failed or is unavailable
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Vocabulary dictionary errors
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Grammar rule definition errors
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input that could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with KashiError.
pub type Result<T> = std::result::Result<T, KashiError>;

impl KashiError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        KashiError::Analysis(msg.into())
    }

    /// Create a new tokenizer error.
    pub fn tokenizer<S: Into<String>>(msg: S) -> Self {
        KashiError::Tokenizer(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        KashiError::Dictionary(msg.into())
    }

    /// Create a new grammar error.
    pub fn grammar<S: Into<String>>(msg: S) -> Self {
        KashiError::Grammar(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        KashiError::Config(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        KashiError::Parse(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KashiError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        KashiError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether the error came from the external tokenizer.
    pub fn is_tokenizer_failure(&self) -> bool {
        matches!(self, KashiError::Tokenizer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = KashiError::tokenizer("Test tokenizer error");
        assert_eq!(error.to_string(), "Tokenizer error: Test tokenizer error");
        assert!(error.is_tokenizer_failure());

        let error = KashiError::grammar("Test grammar error");
        assert_eq!(error.to_string(), "Grammar error: Test grammar error");
        assert!(!error.is_tokenizer_failure());

        let error = KashiError::invalid_argument("level");
        assert_eq!(error.to_string(), "Error: Invalid argument: level");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let kashi_error = KashiError::from(io_error);

        match kashi_error {
            KashiError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
