//! Text analysis module for Kashi.
//!
//! This module provides the token-level building blocks of the lyrics
//! pipeline: the tokenizer adapters, the processed token types, kana
//! normalization and furigana alignment.

pub mod furigana;
pub mod kana;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use furigana::*;
pub use token::*;
pub use tokenizer::*;
