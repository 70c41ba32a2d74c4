//! Greedy, catalog-ordered grammar matching over a token sequence.
//!
//! Rules are tried in catalog order. Each rule scans start positions left to
//! right; a match claims its whole token span, and no later rule or position
//! may use a claimed token again. There is no backtracking: an earlier, less
//! specific rule can win a span that a later rule would also have matched,
//! which makes catalog order the tuning lever.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::grammar::catalog::GrammarCatalog;
use crate::grammar::rule::GrammarRule;
use crate::lyrics::line::Line;

/// One successful application of a grammar rule within a line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarMatch {
    /// Discovery index within the line (before positional sorting)
    pub grammar_id: usize,
    pub rule_id: String,
    pub name: String,
    pub level: String,
    /// Summary of the rule's primary pattern
    pub pattern: String,
    /// Ids of the contiguous tokens covered by the match
    pub token_ids: Vec<usize>,
    pub matched_text: String,
    pub matched_kana: String,
    pub description: String,
    pub example: String,
}

impl GrammarMatch {
    fn new(grammar_id: usize, rule: &GrammarRule, span: &[Token]) -> Self {
        GrammarMatch {
            grammar_id,
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            level: rule.level.clone(),
            pattern: rule.pattern_summary(),
            token_ids: span.iter().map(|token| token.token_id).collect(),
            matched_text: span.iter().map(|token| token.text.as_str()).collect(),
            matched_kana: span.iter().map(|token| token.kana.as_str()).collect(),
            description: rule.description.clone(),
            example: rule.example.clone(),
        }
    }

    /// The first token id of the span.
    pub fn start(&self) -> usize {
        self.token_ids.first().copied().unwrap_or(usize::MAX)
    }

    /// Whether two matches share any token.
    pub fn overlaps(&self, other: &GrammarMatch) -> bool {
        self.token_ids.iter().any(|id| other.token_ids.contains(id))
    }
}

/// Runs the grammar catalog over lyric lines.
///
/// The catalog is shared read-only, so one analyzer can serve any number of
/// concurrent songs.
#[derive(Clone, Debug)]
pub struct GrammarAnalyzer {
    catalog: Arc<GrammarCatalog>,
}

impl Default for GrammarAnalyzer {
    fn default() -> Self {
        GrammarAnalyzer::new(Arc::new(GrammarCatalog::builtin()))
    }
}

impl GrammarAnalyzer {
    pub fn new(catalog: Arc<GrammarCatalog>) -> Self {
        GrammarAnalyzer { catalog }
    }

    pub fn catalog(&self) -> &GrammarCatalog {
        &self.catalog
    }

    /// Find the non-overlapping grammar matches of one line, ordered by
    /// their first token id.
    pub fn analyze_line(&self, tokens: &[Token]) -> Vec<GrammarMatch> {
        let mut used = vec![false; tokens.len()];
        let mut matches = Vec::new();

        for rule in self.catalog.rules() {
            for start in 0..tokens.len() {
                if used[start] {
                    continue;
                }

                let Some(length) = rule.match_at(tokens, start) else {
                    continue;
                };
                let span = start..start + length;
                if used[span.clone()].iter().any(|claimed| *claimed) {
                    continue;
                }

                used[span.clone()].fill(true);
                matches.push(GrammarMatch::new(matches.len(), rule, &tokens[span]));
            }
        }

        matches.sort_by_key(GrammarMatch::start);
        matches
    }

    /// Populate `grammar` and `line_num` of every line.
    pub fn analyze_song(&self, lines: Vec<Line>) -> Vec<Line> {
        lines
            .into_iter()
            .enumerate()
            .map(|(line_num, mut line)| {
                line.grammar = self.analyze_line(&line.tokens);
                line.line_num = line_num;
                line
            })
            .collect()
    }
}
