//! # Kashi
//!
//! Japanese lyrics analysis for language learners.
//!
//! ## Features
//!
//! - Furigana alignment of kanji runs against a token's reading
//! - LRC parsing and timestamp merging of original, translation and romanization
//! - Greedy, catalog-ordered grammar pattern matching
//! - Vocabulary extraction by JLPT level
//! - Pluggable morphological tokenizers (token tables, Lindera)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kashi::analysis::token::Morpheme;
//! use kashi::analysis::tokenizer::table::TableTokenizer;
//! use kashi::lyrics::processor::LyricsProcessor;
//!
//! # fn main() -> kashi::error::Result<()> {
//! let mut tokenizer = TableTokenizer::new();
//! tokenizer.insert(
//!     "待っている",
//!     vec![
//!         Morpheme::new("待っ", "マッ", "待つ", "動詞", "自立"),
//!         Morpheme::new("て", "テ", "て", "助詞", "接続助詞"),
//!         Morpheme::new("いる", "イル", "いる", "動詞", "非自立"),
//!     ],
//! )?;
//!
//! let processor = LyricsProcessor::new(Arc::new(tokenizer));
//! let lyrics = processor.process_lyrics_text("[00:12.34]待っている")?;
//!
//! assert_eq!(lyrics.lines[0].time, Some(12_340));
//! assert_eq!(lyrics.lines[0].grammar[0].rule_id, "te_iru");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod grammar;
pub mod lyrics;
pub mod vocabulary;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
