//! Single-token match conditions.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;

/// A predicate over one token.
///
/// Every field that is set must hold; a condition with no fields set matches
/// any token. `kana_pattern` is an unanchored search against the token's
/// hiragana reading.
///
/// # Examples
///
/// ```
/// use kashi::grammar::condition::TokenCondition;
///
/// let condition = TokenCondition::text("て").with_pos("助詞");
/// assert_eq!(condition.summary(), "て");
/// assert_eq!(TokenCondition::pos("動詞").summary(), "動詞");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_form: Option<String>,

    #[serde(
        default,
        with = "kana_pattern_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub kana_pattern: Option<Regex>,
}

impl TokenCondition {
    /// A condition that matches any token.
    pub fn any() -> Self {
        TokenCondition::default()
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        TokenCondition::any().with_text(text)
    }

    pub fn pos<S: Into<String>>(pos: S) -> Self {
        TokenCondition::any().with_pos(pos)
    }

    pub fn base_form<S: Into<String>>(base_form: S) -> Self {
        TokenCondition::any().with_base_form(base_form)
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_pos<S: Into<String>>(mut self, pos: S) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn with_pos_detail<S: Into<String>>(mut self, pos_detail: S) -> Self {
        self.pos_detail = Some(pos_detail.into());
        self
    }

    pub fn with_base_form<S: Into<String>>(mut self, base_form: S) -> Self {
        self.base_form = Some(base_form.into());
        self
    }

    pub fn with_kana_pattern(mut self, pattern: Regex) -> Self {
        self.kana_pattern = Some(pattern);
        self
    }

    /// Whether no field is constrained.
    pub fn is_wildcard(&self) -> bool {
        self.text.is_none()
            && self.pos.is_none()
            && self.pos_detail.is_none()
            && self.base_form.is_none()
            && self.kana_pattern.is_none()
    }

    /// Check the condition against one token.
    pub fn matches(&self, token: &Token) -> bool {
        fn field_ok(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().is_none_or(|expected| expected == actual)
        }

        field_ok(&self.text, &token.text)
            && field_ok(&self.pos, &token.pos)
            && field_ok(&self.pos_detail, &token.pos_detail)
            && field_ok(&self.base_form, &token.base_form)
            && self
                .kana_pattern
                .as_ref()
                .is_none_or(|pattern| pattern.is_match(&token.kana))
    }

    /// Short label for pattern summaries: the text, else the part of speech.
    pub fn summary(&self) -> &str {
        self.text
            .as_deref()
            .or(self.pos.as_deref())
            .unwrap_or_default()
    }
}

mod kana_pattern_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(regex) => serializer.serialize_some(regex.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Regex>, D::Error> {
        let pattern: Option<String> = Option::deserialize(deserializer)?;
        pattern
            .map(|pattern| Regex::new(&pattern).map_err(serde::de::Error::custom))
            .transpose()
    }
}
