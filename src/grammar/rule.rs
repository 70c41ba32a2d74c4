//! Grammar rules: ordered token patterns with optional guards.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::error::{KashiError, Result};
use crate::grammar::condition::TokenCondition;

/// Extra constraint evaluated against the whole line and the candidate start
/// index, for context a token window cannot express.
pub type RuleGuard = fn(&[Token], usize) -> bool;

/// How a rule decides a structural match is acceptable.
#[derive(Clone, Copy, Debug, Default)]
pub enum RuleKind {
    /// The pattern alone decides.
    #[default]
    Pattern,
    /// The pattern must match and the guard must accept the start index.
    Guarded(RuleGuard),
}

/// One entry of the grammar catalog.
///
/// Rules loaded from JSON are always [`RuleKind::Pattern`]; guards are
/// registered in code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrammarRule {
    pub id: String,
    pub name: String,
    /// Learner level, e.g. `N4`
    pub level: String,
    pub pattern: Vec<TokenCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_pattern: Option<Vec<TokenCondition>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    #[serde(skip)]
    pub kind: RuleKind,
}

impl GrammarRule {
    pub fn new<S: Into<String>>(id: S, name: S, level: S, pattern: Vec<TokenCondition>) -> Self {
        GrammarRule {
            id: id.into(),
            name: name.into(),
            level: level.into(),
            pattern,
            alternative_pattern: None,
            description: String::new(),
            example: String::new(),
            kind: RuleKind::Pattern,
        }
    }

    pub fn with_alternative(mut self, pattern: Vec<TokenCondition>) -> Self {
        self.alternative_pattern = Some(pattern);
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example<S: Into<String>>(mut self, example: S) -> Self {
        self.example = example.into();
        self
    }

    pub fn with_guard(mut self, guard: RuleGuard) -> Self {
        self.kind = RuleKind::Guarded(guard);
        self
    }

    /// Reject rules the matcher cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(KashiError::grammar("Grammar rule id must not be empty"));
        }
        if self.pattern.is_empty() {
            return Err(KashiError::grammar(format!(
                "Grammar rule '{}' has an empty pattern",
                self.id
            )));
        }
        if self.alternative_pattern.as_ref().is_some_and(Vec::is_empty) {
            return Err(KashiError::grammar(format!(
                "Grammar rule '{}' has an empty alternative pattern",
                self.id
            )));
        }
        Ok(())
    }

    /// Primary pattern labels joined with ` + `, e.g. `動詞 + て + いる`.
    pub fn pattern_summary(&self) -> String {
        self.pattern
            .iter()
            .map(TokenCondition::summary)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    pub fn alternative_summary(&self) -> Option<String> {
        self.alternative_pattern.as_ref().map(|pattern| {
            pattern
                .iter()
                .map(TokenCondition::summary)
                .collect::<Vec<_>>()
                .join(" + ")
        })
    }

    pub fn is_guarded(&self) -> bool {
        matches!(self.kind, RuleKind::Guarded(_))
    }

    /// Try the primary pattern, then the alternative, at `start`.
    ///
    /// Returns the number of tokens covered. The guard applies to whichever
    /// pattern matched.
    pub fn match_at(&self, tokens: &[Token], start: usize) -> Option<usize> {
        std::iter::once(&self.pattern)
            .chain(self.alternative_pattern.as_ref())
            .find(|pattern| pattern_matches(pattern, tokens, start) && self.accepts(tokens, start))
            .map(Vec::len)
    }

    fn accepts(&self, tokens: &[Token], start: usize) -> bool {
        match self.kind {
            RuleKind::Pattern => true,
            RuleKind::Guarded(guard) => guard(tokens, start),
        }
    }
}

/// Position-by-position match of `pattern` against `tokens[start..]`.
///
/// A pattern longer than the remaining tokens is a plain non-match.
pub fn pattern_matches(pattern: &[TokenCondition], tokens: &[Token], start: usize) -> bool {
    if pattern.is_empty() {
        return false;
    }
    match tokens.get(start..start.saturating_add(pattern.len())) {
        Some(window) => pattern
            .iter()
            .zip(window)
            .all(|(condition, token)| condition.matches(token)),
        None => false,
    }
}
