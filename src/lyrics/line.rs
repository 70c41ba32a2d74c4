//! Lyric line and song structures.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::grammar::analyzer::GrammarMatch;
use crate::lyrics::overrides::KanaOverrides;

/// One lyric line.
///
/// A line may be partial: a timestamp that only occurs in the translation
/// stream yields a line with `translate` set and no original text or tokens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Milliseconds from song start; `None` for untimed text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_str: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,

    /// Concatenated hiragana reading of all tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kana: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furigana_html: Option<String>,

    #[serde(default)]
    pub tokens: Vec<Token>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roma: Option<String>,

    /// Index of the line in the final ordering
    #[serde(default)]
    pub line_num: usize,

    #[serde(default)]
    pub grammar: Vec<GrammarMatch>,
}

impl Line {
    /// An empty line at a timestamp.
    pub fn at(time: u64, time_str: impl Into<String>) -> Self {
        Line {
            time: Some(time),
            time_str: Some(time_str.into()),
            ..Line::default()
        }
    }

    /// Whether the line carries a non-empty translation or romanization.
    ///
    /// Credits and other metadata lines usually have neither.
    pub fn is_lyric(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.translate) || present(&self.roma)
    }

    /// Recompute `kana` and `furigana_html` from the tokens.
    pub fn refresh_aggregates(&mut self) {
        self.kana = Some(self.tokens.iter().map(|t| t.kana.as_str()).collect());
        self.furigana_html = Some(
            self.tokens
                .iter()
                .map(|t| {
                    if t.furigana_html.is_empty() {
                        t.text.as_str()
                    } else {
                        t.furigana_html.as_str()
                    }
                })
                .collect(),
        );
    }
}

/// Summary information for a processed song.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsMeta {
    pub line_count: usize,
    /// Index of the first line that is actual lyrics rather than credits
    pub lyric_start_index: usize,
}

/// The processed-lyrics payload of one song.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedLyrics {
    pub meta: LyricsMeta,
    pub lines: Vec<Line>,
}

impl ProcessedLyrics {
    pub fn grammar_count(&self) -> usize {
        self.lines.iter().map(|line| line.grammar.len()).sum()
    }
}

/// Already-fetched lyric streams of one song.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SongLyrics {
    /// Original lyrics in LRC format
    pub lrc: String,

    #[serde(default)]
    pub translate: Option<String>,

    #[serde(default)]
    pub roma: Option<String>,

    #[serde(default)]
    pub kana_overrides: KanaOverrides,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_lyric() {
        let mut line = Line::at(1000, "00:01.00");
        assert!(!line.is_lyric());

        line.translate = Some(String::new());
        assert!(!line.is_lyric());

        line.roma = Some("natsu".to_string());
        assert!(line.is_lyric());
    }

    #[test]
    fn test_partial_line_serialization() {
        let mut line = Line::at(3000, "00:03.00");
        line.translate = Some("summer".to_string());

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["time"], 3000);
        assert_eq!(json["translate"], "summer");
        assert!(json.get("original").is_none());
        assert!(json.get("roma").is_none());
        assert_eq!(json["tokens"].as_array().unwrap().len(), 0);

        let back: Line = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_song_lyrics_defaults() {
        let song: SongLyrics = serde_json::from_str(r#"{"lrc": "[00:01.00]a"}"#).unwrap();
        assert!(song.translate.is_none());
        assert!(song.kana_overrides.is_empty());
    }
}
