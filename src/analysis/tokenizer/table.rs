//! Table-driven tokenizer.
//!
//! Replays analyses produced ahead of time (by an external analyzer, a
//! moderation tool, or a test fixture). Each entry maps an exact line of text
//! to its morphemes. Looking up a line that is not in the table is a
//! tokenizer failure.

use std::path::Path;

use ahash::AHashMap;

use super::Tokenizer;

use crate::analysis::token::{Morpheme, MorphemeStream};
use crate::error::{KashiError, Result};

/// A tokenizer backed by a `line text -> morphemes` table.
#[derive(Clone, Debug, Default)]
pub struct TableTokenizer {
    table: AHashMap<String, Vec<Morpheme>>,
}

impl TableTokenizer {
    /// Create an empty table tokenizer.
    pub fn new() -> Self {
        TableTokenizer::default()
    }

    /// Load a table from a JSON file.
    ///
    /// Example format:
    /// ```json
    /// {
    ///   "君へ": [
    ///     {"surface": "君", "reading": "キミ", "base_form": "君", "pos": "名詞", "pos_detail": "代名詞"},
    ///     {"surface": "へ", "reading": "ヘ", "base_form": "へ", "pos": "助詞", "pos_detail": "格助詞"}
    ///   ]
    /// }
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KashiError::tokenizer(format!(
                "Failed to read token table '{}': {}",
                path.display(),
                e
            ))
        })?;

        let entries: AHashMap<String, Vec<Morpheme>> =
            serde_json::from_str(&content).map_err(|e| {
                KashiError::parse(format!(
                    "Failed to parse token table JSON from '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let mut tokenizer = TableTokenizer::new();
        for (text, morphemes) in entries {
            tokenizer.insert(text, morphemes)?;
        }
        Ok(tokenizer)
    }

    /// Add an analysed line.
    ///
    /// The morpheme surfaces must concatenate to the line text exactly.
    pub fn insert<S: Into<String>>(&mut self, text: S, morphemes: Vec<Morpheme>) -> Result<()> {
        let text = text.into();
        let covered: String = morphemes.iter().map(|m| m.surface.as_str()).collect();
        if covered != text {
            return Err(KashiError::tokenizer(format!(
                "Morphemes for '{}' cover '{}' instead",
                text, covered
            )));
        }
        self.table.insert(text, morphemes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Tokenizer for TableTokenizer {
    fn tokenize(&self, text: &str) -> Result<MorphemeStream> {
        if text.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let morphemes = self
            .table
            .get(text)
            .ok_or_else(|| KashiError::tokenizer(format!("No analysis available for '{}'", text)))?;

        Ok(Box::new(morphemes.clone().into_iter()))
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
