//! Morphological tokenizer adapters.
//!
//! The pipeline treats the morphological analyzer as an external black box:
//! given one line of Japanese text it must return morphemes in left-to-right
//! order covering the whole input with no gaps.
//!
//! # Available Tokenizers
//!
//! - [`table::TableTokenizer`] - Replays pre-analysed lines from a lookup table
//! - [`lindera::LinderaTokenizer`] - Japanese morphological analysis (requires `lindera` feature)
//!
//! # Examples
//!
//! ```
//! use kashi::analysis::token::Morpheme;
//! use kashi::analysis::tokenizer::Tokenizer;
//! use kashi::analysis::tokenizer::table::TableTokenizer;
//!
//! let mut tokenizer = TableTokenizer::new();
//! tokenizer
//!     .insert("君へ", vec![
//!         Morpheme::new("君", "キミ", "君", "名詞", "代名詞"),
//!         Morpheme::new("へ", "ヘ", "へ", "助詞", "格助詞"),
//!     ])
//!     .unwrap();
//!
//! let morphemes: Vec<_> = tokenizer.tokenize("君へ").unwrap().collect();
//! assert_eq!(morphemes.len(), 2);
//! ```

use crate::analysis::token::MorphemeStream;
use crate::error::Result;

/// Trait for morphological tokenizers.
///
/// The trait requires `Send + Sync` so one tokenizer can serve many songs
/// processed concurrently.
pub trait Tokenizer: Send + Sync {
    /// Tokenize one line of text into a stream of morphemes.
    ///
    /// A failure here is fatal for the song being processed.
    fn tokenize(&self, text: &str) -> Result<MorphemeStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

#[cfg(feature = "lindera")]
pub mod lindera;
pub mod table;
