use std::borrow::Cow;
use std::str::FromStr;

use lindera::dictionary::{load_dictionary, load_user_dictionary};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::analysis::token::{Morpheme, MorphemeStream};
use crate::error::{KashiError, Result};

use super::Tokenizer;

// IPADIC feature layout:
// [pos, pos_detail_1, pos_detail_2, pos_detail_3, conj_type, conj_form, base_form, reading, pronunciation]
const POS: usize = 0;
const POS_DETAIL: usize = 1;
const BASE_FORM: usize = 6;
const READING: usize = 7;

pub struct LinderaTokenizer {
    inner: Segmenter,
}

impl LinderaTokenizer {
    /// Create a new Lindera tokenizer.
    pub fn new(mode_str: &str, dict_uri: &str, user_dict_uri: Option<&str>) -> Result<Self> {
        let mode = Mode::from_str(mode_str)
            .map_err(|e| KashiError::tokenizer(format!("Invalid mode '{}': {}", mode_str, e)))?;
        let dict = load_dictionary(dict_uri)
            .map_err(|e| KashiError::tokenizer(format!("Failed to load dictionary: {}", e)))?;
        let metadata = &dict.metadata;
        let user_dict = match user_dict_uri {
            Some(uri) => Some(load_user_dictionary(uri, metadata).map_err(|e| {
                KashiError::tokenizer(format!("Failed to load user dictionary: {}", e))
            })?),
            None => None,
        };
        let inner = Segmenter::new(mode, dict, user_dict);

        Ok(Self { inner })
    }
}

fn detail(details: &[&str], index: usize) -> Option<String> {
    details
        .get(index)
        .filter(|value| !value.is_empty() && **value != "*")
        .map(|value| value.to_string())
}

impl Tokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<MorphemeStream> {
        let mut morphemes = Vec::new();

        let mut tokens = self
            .inner
            .segment(Cow::Borrowed(text))
            .map_err(|e| KashiError::tokenizer(format!("Failed to segment text: {}", e)))?;

        for token in tokens.iter_mut() {
            let surface = token.surface.to_string();
            let details = token.details();
            morphemes.push(Morpheme {
                surface,
                reading: detail(&details, READING),
                base_form: detail(&details, BASE_FORM),
                pos: detail(&details, POS).unwrap_or_default(),
                pos_detail: detail(&details, POS_DETAIL).unwrap_or_default(),
            });
        }

        Ok(Box::new(morphemes.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lindera"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_japanese() {
        let tokenizer = LinderaTokenizer::new("normal", "embedded://ipadic", None).unwrap();

        let morphemes: Vec<Morpheme> = tokenizer.tokenize("思い出を食べた").unwrap().collect();

        let surface: String = morphemes.iter().map(|m| m.surface.as_str()).collect();
        assert_eq!(surface, "思い出を食べた");
        assert!(morphemes.iter().any(|m| m.pos == "助詞"));
        assert!(morphemes.iter().any(|m| m.base_form.as_deref() == Some("食べる")));
    }

    #[test]
    fn test_tokenizer_name() {
        let tokenizer = LinderaTokenizer::new("normal", "embedded://ipadic", None).unwrap();

        assert_eq!(tokenizer.name(), "lindera");
    }
}
