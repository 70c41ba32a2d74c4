//! Token types flowing through the lyrics analysis pipeline.
//!
//! # Core Types
//!
//! - [`Morpheme`] - Raw output of the external morphological tokenizer
//! - [`Token`] - A processed token with kana, furigana and dictionary tags
//! - [`FuriganaSegment`] - One kanji or kana run of a token's surface
//! - [`MorphemeStream`] - Type alias for boxed iterator of morphemes
//!
//! # Examples
//!
//! ```
//! use kashi::analysis::token::Morpheme;
//!
//! let morpheme = Morpheme::new("食べ", "タベ", "食べる", "動詞", "自立");
//! assert_eq!(morpheme.surface, "食べ");
//! assert_eq!(morpheme.reading_or_surface(), "タベ");
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::kana::to_hiragana;

/// One morphological unit as returned by a [`Tokenizer`](crate::analysis::tokenizer::Tokenizer).
///
/// `reading` is katakana or hiragana; it is normalized to hiragana by the
/// line processor. Missing readings and base forms fall back to the surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    /// The surface form as it appears in the text
    pub surface: String,

    /// The reading reported by the analyzer
    #[serde(default)]
    pub reading: Option<String>,

    /// The dictionary (uninflected) form
    #[serde(default)]
    pub base_form: Option<String>,

    /// Coarse part of speech (e.g. 動詞)
    #[serde(default)]
    pub pos: String,

    /// First part-of-speech refinement (e.g. 自立)
    #[serde(default)]
    pub pos_detail: String,
}

impl Morpheme {
    pub fn new<S: Into<String>>(surface: S, reading: S, base_form: S, pos: S, pos_detail: S) -> Self {
        Morpheme {
            surface: surface.into(),
            reading: Some(reading.into()),
            base_form: Some(base_form.into()),
            pos: pos.into(),
            pos_detail: pos_detail.into(),
        }
    }

    /// Create a morpheme for which the analyzer knows nothing but the surface.
    pub fn unknown<S: Into<String>>(surface: S) -> Self {
        Morpheme {
            surface: surface.into(),
            reading: None,
            base_form: None,
            pos: String::new(),
            pos_detail: String::new(),
        }
    }

    pub fn reading_or_surface(&self) -> &str {
        match self.reading.as_deref() {
            Some(reading) if !reading.is_empty() => reading,
            _ => &self.surface,
        }
    }

    pub fn base_form_or_surface(&self) -> &str {
        match self.base_form.as_deref() {
            Some(base) if !base.is_empty() => base,
            _ => &self.surface,
        }
    }
}

/// Type alias for a stream of morphemes.
pub type MorphemeStream = Box<dyn Iterator<Item = Morpheme> + Send>;

/// Whether a furigana segment is a kanji run (annotated) or a kana run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Kanji,
    Kana,
}

/// A contiguous all-kanji or all-kana run of a token's surface.
///
/// Kanji segments carry their reading in `ruby`; kana segments have none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuriganaSegment {
    pub text: String,
    pub ruby: Option<String>,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
}

impl FuriganaSegment {
    pub fn kanji<S: Into<String>, R: Into<String>>(text: S, ruby: R) -> Self {
        FuriganaSegment {
            text: text.into(),
            ruby: Some(ruby.into()),
            kind: SegmentKind::Kanji,
        }
    }

    pub fn kana<S: Into<String>>(text: S) -> Self {
        FuriganaSegment {
            text: text.into(),
            ruby: None,
            kind: SegmentKind::Kana,
        }
    }

    pub fn is_kanji(&self) -> bool {
        self.kind == SegmentKind::Kanji
    }

    /// The reading this segment contributes: its ruby for kanji, its text in
    /// hiragana for kana.
    pub fn reading(&self) -> String {
        match &self.ruby {
            Some(ruby) => ruby.clone(),
            None => to_hiragana(&self.text),
        }
    }
}

/// A processed token of one lyric line.
///
/// Tokens are created once per line-processing pass. The only later mutation
/// is a kana override, which replaces `kana` and regenerates the furigana.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Position of the token within its line (0-based)
    pub token_id: usize,

    /// Surface form
    pub text: String,

    /// Reading in hiragana
    pub kana: String,

    /// Dictionary form
    pub base_form: String,

    pub pos: String,

    pub pos_detail: String,

    pub has_kanji: bool,

    #[serde(default)]
    pub furigana: Vec<FuriganaSegment>,

    #[serde(default)]
    pub furigana_html: String,

    /// Difficulty tags from the vocabulary dictionary (e.g. `JLPT_3`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Dictionary gloss
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

impl Token {
    /// The key used for vocabulary deduplication: the base form, or the
    /// surface when the base form is empty.
    pub fn vocabulary_key(&self) -> &str {
        if self.base_form.is_empty() {
            &self.text
        } else {
            &self.base_form
        }
    }

    /// Concatenated reading of the furigana segments.
    pub fn furigana_reading(&self) -> String {
        self.furigana.iter().map(FuriganaSegment::reading).collect()
    }
}
