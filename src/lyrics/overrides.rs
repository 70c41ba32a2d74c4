//! User-submitted reading corrections.
//!
//! Corrections are keyed by the line's timestamp (stringified milliseconds)
//! and then by the token's surface text.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::furigana::align;
use crate::analysis::kana::to_hiragana;
use crate::error::{KashiError, Result};
use crate::lyrics::line::Line;

/// `"<time ms>" -> { surface -> corrected kana }`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KanaOverrides(BTreeMap<String, BTreeMap<String, String>>);

impl KanaOverrides {
    pub fn new() -> Self {
        KanaOverrides::default()
    }

    /// Load overrides from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            KashiError::parse(format!(
                "Failed to parse kana overrides JSON from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Record a correction, replacing any earlier one for the same token.
    pub fn insert<S: Into<String>, K: Into<String>>(&mut self, time: u64, surface: S, kana: K) {
        self.0
            .entry(time.to_string())
            .or_default()
            .insert(surface.into(), kana.into());
    }

    /// Corrections for the line at `time`.
    pub fn for_time(&self, time: u64) -> Option<&BTreeMap<String, String>> {
        self.0.get(&time.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply the corrections registered for the line's timestamp.
    ///
    /// Every token whose surface has a correction gets the corrected kana
    /// and furigana realigned against it; the line aggregates are then
    /// rebuilt. Returns the number of tokens changed.
    pub fn apply(&self, line: &mut Line) -> usize {
        let Some(corrections) = line.time.and_then(|time| self.for_time(time)) else {
            return 0;
        };

        let mut changed = 0;
        for token in &mut line.tokens {
            let Some(kana) = corrections.get(&token.text) else {
                continue;
            };
            let kana = to_hiragana(kana);
            let furigana = align(&token.text, &kana);
            log::debug!("Kana override for '{}': {} -> {}", token.text, token.kana, kana);
            token.kana = kana;
            token.furigana = furigana.segments;
            token.furigana_html = furigana.html;
            changed += 1;
        }

        line.refresh_aggregates();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn token(token_id: usize, text: &str, kana: &str) -> Token {
        let furigana = align(text, kana);
        Token {
            token_id,
            text: text.to_string(),
            kana: kana.to_string(),
            base_form: text.to_string(),
            pos: "名詞".to_string(),
            pos_detail: "一般".to_string(),
            has_kanji: true,
            furigana: furigana.segments,
            furigana_html: furigana.html,
            tags: None,
            meaning: None,
        }
    }

    fn line() -> Line {
        let mut line = Line::at(12_340, "00:12.34");
        line.tokens = vec![token(0, "明日", "あした"), token(1, "の", "の"), token(2, "空", "そら")];
        line.refresh_aggregates();
        line
    }

    #[test]
    fn test_apply_regenerates_furigana() {
        let mut overrides = KanaOverrides::new();
        overrides.insert(12_340, "明日", "アス");

        let mut line = line();
        assert_eq!(overrides.apply(&mut line), 1);

        assert_eq!(line.tokens[0].kana, "あす");
        assert_eq!(line.tokens[0].furigana_html, "<ruby>明日<rt>あす</rt></ruby>");
        assert_eq!(line.kana.as_deref(), Some("あすのそら"));
        assert_eq!(
            line.furigana_html.as_deref(),
            Some("<ruby>明日<rt>あす</rt></ruby>の<ruby>空<rt>そら</rt></ruby>")
        );
    }

    #[test]
    fn test_apply_other_timestamp_is_noop() {
        let mut overrides = KanaOverrides::new();
        overrides.insert(99, "明日", "あす");

        let mut line = line();
        let before = line.clone();
        assert_eq!(overrides.apply(&mut line), 0);
        assert_eq!(line, before);
    }

    #[test]
    fn test_json_shape() {
        let overrides: KanaOverrides =
            serde_json::from_str(r#"{"12340": {"明日": "あす"}}"#).unwrap();
        assert_eq!(overrides.for_time(12_340).unwrap()["明日"], "あす");
        assert!(overrides.for_time(0).is_none());
    }
}
