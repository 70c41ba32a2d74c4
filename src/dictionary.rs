//! Vocabulary dictionary keyed by surface or base form.
//!
//! The dictionary is loaded once and shared read-only (wrap it in an `Arc`)
//! between every song processed afterwards.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{KashiError, Result};

/// Dictionary data for one word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Difficulty tags such as `JLPT_3`
    #[serde(default)]
    pub tags: Vec<String>,

    /// Gloss shown to the learner
    #[serde(default)]
    pub meaning: Option<String>,
}

/// Read-only mapping from surface-or-base-form to [`DictionaryEntry`].
#[derive(Clone, Debug, Default)]
pub struct VocabularyDictionary {
    entries: AHashMap<String, DictionaryEntry>,
}

impl VocabularyDictionary {
    /// Create a new dictionary.
    ///
    /// If `path` is provided, loads entries from the specified JSON file.
    /// If `path` is `None`, creates an empty dictionary.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(file_path) => Self::load_from_file(file_path),
            None => Ok(Self::default()),
        }
    }

    /// Load a dictionary from a JSON file.
    ///
    /// Example format:
    /// ```json
    /// {
    ///   "食べる": {"tags": ["JLPT_5"], "meaning": "to eat"},
    ///   "思い出": {"tags": ["JLPT_3"], "meaning": "memory"}
    /// }
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KashiError::dictionary(format!(
                "Failed to read vocabulary dictionary file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let entries: AHashMap<String, DictionaryEntry> =
            serde_json::from_str(&content).map_err(|e| {
                KashiError::parse(format!(
                    "Failed to parse vocabulary dictionary JSON from '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        log::info!(
            "Loaded {} vocabulary entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self { entries })
    }

    /// Build a dictionary from `(word, entry)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DictionaryEntry)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(word, entry)| (word.into(), entry))
                .collect(),
        }
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.get(word)
    }

    /// Look up the surface first, then the base form.
    pub fn lookup(&self, surface: &str, base_form: &str) -> Option<&DictionaryEntry> {
        self.get(surface).or_else(|| self.get(base_form))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn entry(tag: &str, meaning: &str) -> DictionaryEntry {
        DictionaryEntry {
            tags: vec![tag.to_string()],
            meaning: Some(meaning.to_string()),
        }
    }

    #[test]
    fn test_lookup_prefers_surface() {
        let dictionary = VocabularyDictionary::from_entries([
            ("食べ", entry("JLPT_4", "eat (stem)")),
            ("食べる", entry("JLPT_5", "to eat")),
        ]);

        let found = dictionary.lookup("食べ", "食べる").unwrap();
        assert_eq!(found.meaning.as_deref(), Some("eat (stem)"));

        let found = dictionary.lookup("食べた", "食べる").unwrap();
        assert_eq!(found.meaning.as_deref(), Some("to eat"));

        assert!(dictionary.lookup("走っ", "走る").is_none());
    }

    #[test]
    fn test_empty_dictionary() {
        let dictionary = VocabularyDictionary::new(None).unwrap();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.len(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"思い出": {{"tags": ["JLPT_3"], "meaning": "memory"}}, "夏": {{"tags": ["JLPT_5"]}}}}"#
        )
        .unwrap();

        let dictionary = VocabularyDictionary::load_from_file(file.path()).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.get("思い出").unwrap().tags, vec!["JLPT_3"]);
        assert!(dictionary.get("夏").unwrap().meaning.is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[not a map]").unwrap();

        let result = VocabularyDictionary::load_from_file(file.path());
        assert!(matches!(result, Err(KashiError::Parse(_))));
    }
}
