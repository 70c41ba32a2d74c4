//! Pipeline configuration.
//!
//! A [`PipelineConfig`] names the tokenizer, the vocabulary dictionary and
//! any extra grammar rules. It is read once at startup and turned into a
//! [`LyricsProcessor`] whose shared state is never mutated afterwards.
//!
//! ```json
//! {
//!   "dictionary_path": "words.json",
//!   "grammar_rules_path": "rules.json",
//!   "tokenizer": {"kind": "table", "table_path": "tokens.json"},
//!   "default_level": "N3"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::table::TableTokenizer;
use crate::dictionary::VocabularyDictionary;
use crate::error::{KashiError, Result};
use crate::grammar::analyzer::GrammarAnalyzer;
use crate::grammar::catalog::GrammarCatalog;
use crate::lyrics::processor::LyricsProcessor;
use crate::vocabulary::is_valid_level;

/// Which tokenizer adapter to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Pre-analysed morphemes looked up by line text.
    #[default]
    Table,
    /// Lindera with an IPADIC-layout dictionary (requires the `lindera` feature).
    Lindera,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub kind: TokenizerKind,
    /// Token table JSON for [`TokenizerKind::Table`]
    pub table_path: Option<PathBuf>,
    /// Lindera segmentation mode
    pub mode: String,
    pub dictionary_uri: String,
    pub user_dictionary_uri: Option<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            kind: TokenizerKind::Table,
            table_path: None,
            mode: "normal".to_string(),
            dictionary_uri: "embedded://ipadic".to_string(),
            user_dictionary_uri: None,
        }
    }
}

impl TokenizerConfig {
    /// Build the configured tokenizer.
    pub fn build(&self) -> Result<Arc<dyn Tokenizer>> {
        match self.kind {
            TokenizerKind::Table => {
                let path = self.table_path.as_deref().ok_or_else(|| {
                    KashiError::config("The table tokenizer requires 'table_path'")
                })?;
                Ok(Arc::new(TableTokenizer::load_from_file(path)?))
            }
            TokenizerKind::Lindera => self.build_lindera(),
        }
    }

    #[cfg(feature = "lindera")]
    fn build_lindera(&self) -> Result<Arc<dyn Tokenizer>> {
        use crate::analysis::tokenizer::lindera::LinderaTokenizer;

        Ok(Arc::new(LinderaTokenizer::new(
            &self.mode,
            &self.dictionary_uri,
            self.user_dictionary_uri.as_deref(),
        )?))
    }

    #[cfg(not(feature = "lindera"))]
    fn build_lindera(&self) -> Result<Arc<dyn Tokenizer>> {
        Err(KashiError::config(
            "The lindera tokenizer is not available: kashi was built without the 'lindera' feature",
        ))
    }
}

/// Configuration of the whole analysis pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vocabulary dictionary JSON
    pub dictionary_path: Option<PathBuf>,

    /// Extra grammar rules JSON, appended after the built-in catalog
    pub grammar_rules_path: Option<PathBuf>,

    /// Use only the rules from `grammar_rules_path`
    pub replace_builtin_rules: bool,

    pub tokenizer: TokenizerConfig,

    /// Learner level used when none is given
    pub default_level: String,

    /// Process songs of a batch in parallel
    pub parallel_songs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            dictionary_path: None,
            grammar_rules_path: None,
            replace_builtin_rules: false,
            tokenizer: TokenizerConfig::default(),
            default_level: "N5".to_string(),
            parallel_songs: true,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KashiError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            KashiError::config(format!(
                "Failed to parse config JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tokenizer.kind == TokenizerKind::Table && self.tokenizer.table_path.is_none() {
            return Err(KashiError::config(
                "The table tokenizer requires 'tokenizer.table_path'",
            ));
        }
        if self.replace_builtin_rules && self.grammar_rules_path.is_none() {
            return Err(KashiError::config(
                "'replace_builtin_rules' requires 'grammar_rules_path'",
            ));
        }
        if !is_valid_level(&self.default_level) {
            return Err(KashiError::config(format!(
                "Invalid default level '{}', expected N1 to N5",
                self.default_level
            )));
        }
        Ok(())
    }

    /// Load the grammar catalog: built-in rules, extended or replaced by the
    /// rules file.
    pub fn load_grammar_catalog(&self) -> Result<GrammarCatalog> {
        let Some(path) = self.grammar_rules_path.as_deref() else {
            return Ok(GrammarCatalog::builtin());
        };

        let extra = GrammarCatalog::load_from_file(path)?;
        if self.replace_builtin_rules {
            return Ok(extra);
        }

        let mut catalog = GrammarCatalog::builtin();
        catalog.extend(extra)?;
        Ok(catalog)
    }

    /// Validate the configuration and build a processor from it.
    pub fn build_processor(&self) -> Result<LyricsProcessor> {
        self.validate()?;

        let tokenizer = self.tokenizer.build()?;
        let dictionary = VocabularyDictionary::new(self.dictionary_path.as_deref())?;
        let catalog = self.load_grammar_catalog()?;

        log::debug!(
            "Pipeline: tokenizer={}, {} dictionary entries, {} grammar rules",
            tokenizer.name(),
            dictionary.len(),
            catalog.len()
        );

        Ok(LyricsProcessor::new(tokenizer)
            .with_dictionary(Arc::new(dictionary))
            .with_grammar(GrammarAnalyzer::new(Arc::new(catalog)))
            .with_parallel(self.parallel_songs))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.default_level, "N5");
        assert_eq!(config.tokenizer.kind, TokenizerKind::Table);
        assert_eq!(config.tokenizer.mode, "normal");
        assert!(config.parallel_songs);
        // No token table configured yet.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = PipelineConfig::default();
        config.tokenizer.table_path = Some(PathBuf::from("tokens.json"));
        assert!(config.validate().is_ok());

        config.default_level = "N7".to_string();
        assert!(matches!(config.validate(), Err(KashiError::Config(_))));

        config.default_level = "N2".to_string();
        config.replace_builtin_rules = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let file = write_file(
            r#"{"tokenizer": {"kind": "table", "table_path": "tokens.json"}, "default_level": "N3"}"#,
        );
        let config = PipelineConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.default_level, "N3");
        assert_eq!(config.tokenizer.dictionary_uri, "embedded://ipadic");
        assert!(config.dictionary_path.is_none());
    }

    #[test]
    fn test_grammar_catalog_extension() {
        let rules = write_file(
            r#"[{"id": "zo", "name": "〜ぞ", "level": "N3", "pattern": [{"text": "ぞ", "pos": "助詞"}]}]"#,
        );
        let builtin_len = GrammarCatalog::builtin().len();

        let mut config = PipelineConfig {
            grammar_rules_path: Some(rules.path().to_path_buf()),
            ..PipelineConfig::default()
        };
        let catalog = config.load_grammar_catalog().unwrap();
        assert_eq!(catalog.len(), builtin_len + 1);
        assert_eq!(catalog.rules().last().unwrap().id, "zo");

        config.replace_builtin_rules = true;
        let catalog = config.load_grammar_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_build_processor() {
        let table = write_file(
            r#"{"夢": [{"surface": "夢", "reading": "ユメ", "base_form": "夢", "pos": "名詞", "pos_detail": "一般"}]}"#,
        );
        let config = PipelineConfig {
            tokenizer: TokenizerConfig {
                table_path: Some(table.path().to_path_buf()),
                ..TokenizerConfig::default()
            },
            ..PipelineConfig::default()
        };

        let processor = config.build_processor().unwrap();
        assert!(processor.is_parallel());
        let line = processor.process_line("夢").unwrap();
        assert_eq!(line.tokens[0].kana, "ゆめ");

        let sequential = PipelineConfig {
            parallel_songs: false,
            ..config
        };
        assert!(!sequential.build_processor().unwrap().is_parallel());
    }

    #[cfg(not(feature = "lindera"))]
    #[test]
    fn test_lindera_requires_feature() {
        let config = TokenizerConfig {
            kind: TokenizerKind::Lindera,
            ..TokenizerConfig::default()
        };
        assert!(matches!(config.build(), Err(KashiError::Config(_))));
    }
}
