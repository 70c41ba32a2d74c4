//! The ordered grammar rule catalog.
//!
//! Catalog order is rule precedence: earlier rules claim token spans first,
//! so specific constructions (〜ている) are listed before the general ones
//! they contain (〜て). Parts of speech follow the IPADIC naming used by
//! kuromoji-style analyzers.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::token::Token;
use crate::error::{KashiError, Result};
use crate::grammar::condition::TokenCondition;
use crate::grammar::rule::GrammarRule;

const VERB: &str = "動詞";
const ADJECTIVE: &str = "形容詞";
const PARTICLE: &str = "助詞";
const AUXILIARY: &str = "助動詞";
const SYMBOL: &str = "記号";

const CONJUNCTIVE_PARTICLE: &str = "接続助詞";
const SENTENCE_FINAL_PARTICLE: &str = "終助詞";
const SUFFIX: &str = "接尾";

/// The built-in catalog, built once.
pub static BUILTIN_CATALOG: LazyLock<GrammarCatalog> = LazyLock::new(|| GrammarCatalog {
    rules: builtin_rules(),
});

/// An ordered, read-only set of grammar rules.
#[derive(Clone, Debug, Default)]
pub struct GrammarCatalog {
    rules: Vec<GrammarRule>,
}

impl GrammarCatalog {
    /// Build a catalog from rules in precedence order.
    pub fn new(rules: Vec<GrammarRule>) -> Result<Self> {
        let mut catalog = GrammarCatalog::default();
        for rule in rules {
            catalog.push(rule)?;
        }
        Ok(catalog)
    }

    /// A copy of the built-in catalog.
    pub fn builtin() -> Self {
        BUILTIN_CATALOG.clone()
    }

    /// Load pattern-only rules from a JSON array.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KashiError::grammar(format!(
                "Failed to read grammar rules file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let rules: Vec<GrammarRule> = serde_json::from_str(&content).map_err(|e| {
            KashiError::grammar(format!(
                "Failed to parse grammar rules JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;

        log::info!("Loaded {} grammar rules from {}", rules.len(), path.display());

        Self::new(rules)
    }

    /// Append a rule with the lowest precedence so far.
    pub fn push(&mut self, rule: GrammarRule) -> Result<()> {
        rule.validate()?;
        if self.get(&rule.id).is_some() {
            return Err(KashiError::grammar(format!(
                "Duplicate grammar rule id '{}'",
                rule.id
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Append every rule of `other` after the existing ones.
    ///
    /// Either all rules are added or, on a duplicate id, none are.
    pub fn extend(&mut self, other: GrammarCatalog) -> Result<()> {
        let mut merged = self.clone();
        for rule in other.rules {
            merged.push(rule)?;
        }
        *self = merged;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GrammarRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn rules(&self) -> &[GrammarRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The construction attaches to a preceding clause, not a line-initial word.
fn follows_content(tokens: &[Token], start: usize) -> bool {
    start
        .checked_sub(1)
        .and_then(|index| tokens.get(index))
        .is_some_and(|previous| previous.pos != SYMBOL)
}

/// The particle ends the line or is followed by punctuation.
fn ends_sentence(tokens: &[Token], start: usize) -> bool {
    tokens
        .get(start + 1)
        .is_none_or(|next| next.pos == SYMBOL)
}

fn verb() -> TokenCondition {
    TokenCondition::pos(VERB)
}

fn te(text: &str) -> TokenCondition {
    TokenCondition::text(text).with_pos(PARTICLE)
}

fn auxiliary_verb(base_form: &str) -> TokenCondition {
    TokenCondition::base_form(base_form).with_pos(VERB)
}

fn auxiliary(base_form: &str) -> TokenCondition {
    TokenCondition::base_form(base_form).with_pos(AUXILIARY)
}

fn conjunctive(text: &str) -> TokenCondition {
    TokenCondition::text(text)
        .with_pos(PARTICLE)
        .with_pos_detail(CONJUNCTIVE_PARTICLE)
}

fn sentence_final(text: &str) -> TokenCondition {
    TokenCondition::text(text)
        .with_pos(PARTICLE)
        .with_pos_detail(SENTENCE_FINAL_PARTICLE)
}

/// Verb followed by te/de and an auxiliary verb.
fn te_auxiliary(id: &str, name: &str, level: &str, auxiliary_base: &str) -> GrammarRule {
    GrammarRule::new(
        id,
        name,
        level,
        vec![verb(), te("て"), auxiliary_verb(auxiliary_base)],
    )
    .with_alternative(vec![verb(), te("で"), auxiliary_verb(auxiliary_base)])
}

fn builtin_rules() -> Vec<GrammarRule> {
    let o_row_ending = Regex::new("[おこごそぞとどのほぼぽもよろ]$").expect("valid volitional regex");

    vec![
        te_auxiliary("te_iru", "〜ている", "N5", "いる")
            .with_description("Ongoing action or resulting state")
            .with_example("雨が降っている"),
        te_auxiliary("te_shimau", "〜てしまう", "N4", "しまう")
            .with_description("Action completed, often with regret")
            .with_example("忘れてしまった"),
        te_auxiliary("te_kudasai", "〜てください", "N5", "くださる")
            .with_description("Polite request")
            .with_example("待ってください"),
        GrammarRule::new(
            "kamoshirenai",
            "〜かもしれない",
            "N4",
            vec![
                TokenCondition::text("かも").with_pos(PARTICLE),
                auxiliary_verb("しれる"),
                auxiliary("ない"),
            ],
        )
        .with_description("Possibility: might, may")
        .with_example("雨が降るかもしれない"),
        GrammarRule::new(
            "mashou",
            "〜ましょう",
            "N5",
            vec![
                verb(),
                TokenCondition::text("ましょ").with_pos(AUXILIARY),
                TokenCondition::text("う").with_pos(AUXILIARY),
            ],
        )
        .with_description("Polite invitation: let's")
        .with_example("一緒に歌いましょう"),
        GrammarRule::new(
            "volitional",
            "〜う／〜よう",
            "N4",
            vec![
                verb().with_kana_pattern(o_row_ending),
                TokenCondition::text("う").with_pos(AUXILIARY),
            ],
        )
        .with_alternative(vec![verb(), TokenCondition::text("よう").with_pos(AUXILIARY)])
        .with_description("Volitional: let's, I will")
        .with_example("行こう"),
        GrammarRule::new("tai", "〜たい", "N5", vec![verb(), auxiliary("たい")])
            .with_description("Desire: want to")
            .with_example("会いたい"),
        GrammarRule::new("nai", "〜ない", "N5", vec![verb(), auxiliary("ない")])
            .with_description("Plain negative")
            .with_example("分からない"),
        GrammarRule::new(
            "nagara",
            "〜ながら",
            "N4",
            vec![verb(), TokenCondition::text("ながら").with_pos(PARTICLE)],
        )
        .with_description("Two simultaneous actions: while")
        .with_example("歌いながら歩く"),
        GrammarRule::new(
            "tara",
            "〜たら",
            "N4",
            vec![verb(), TokenCondition::text("たら").with_pos(AUXILIARY)],
        )
        .with_alternative(vec![verb(), TokenCondition::text("だら").with_pos(AUXILIARY)])
        .with_description("Conditional: if, when")
        .with_example("春が来たら"),
        GrammarRule::new(
            "ba",
            "〜ば",
            "N4",
            vec![verb(), TokenCondition::text("ば").with_pos(PARTICLE)],
        )
        .with_alternative(vec![
            TokenCondition::pos(ADJECTIVE),
            TokenCondition::text("ば").with_pos(PARTICLE),
        ])
        .with_description("Hypothetical conditional")
        .with_example("会えれば"),
        GrammarRule::new(
            "passive_potential",
            "〜れる／〜られる",
            "N4",
            vec![verb(), auxiliary_verb("れる").with_pos_detail(SUFFIX)],
        )
        .with_alternative(vec![verb(), auxiliary_verb("られる").with_pos_detail(SUFFIX)])
        .with_description("Passive, potential or honorific")
        .with_example("忘れられる"),
        GrammarRule::new("noni", "〜のに", "N3", vec![conjunctive("のに")])
            .with_description("Contrary to expectation: even though")
            .with_example("好きなのに")
            .with_guard(follows_content),
        GrammarRule::new("kara_reason", "〜から", "N5", vec![conjunctive("から")])
            .with_description("Reason: because")
            .with_example("寒いから")
            .with_guard(follows_content),
        GrammarRule::new("kedo", "〜けど", "N4", vec![conjunctive("けど")])
            .with_alternative(vec![conjunctive("けれど")])
            .with_description("Contrast: but, although")
            .with_example("好きだけど")
            .with_guard(follows_content),
        GrammarRule::new("ta_past", "〜た", "N5", vec![verb(), auxiliary("た")])
            .with_description("Plain past")
            .with_example("見た"),
        GrammarRule::new("yo", "〜よ", "N5", vec![sentence_final("よ")])
            .with_description("Assertion: I tell you")
            .with_example("大丈夫だよ")
            .with_guard(ends_sentence),
        GrammarRule::new("ne", "〜ね", "N5", vec![sentence_final("ね")])
            .with_description("Seeking agreement: isn't it")
            .with_example("きれいだね")
            .with_guard(ends_sentence),
        GrammarRule::new(
            "te_form",
            "〜て",
            "N5",
            vec![verb(), te("て").with_pos_detail(CONJUNCTIVE_PARTICLE)],
        )
        .with_alternative(vec![verb(), te("で").with_pos_detail(CONJUNCTIVE_PARTICLE)])
        .with_description("Connecting actions in sequence")
        .with_example("起きて走る"),
    ]
}
