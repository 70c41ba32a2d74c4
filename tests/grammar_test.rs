//! Integration tests for the grammar pattern matcher.

use std::io::Write;
use std::sync::Arc;

use kashi::analysis::token::Token;
use kashi::error::{KashiError, Result};
use kashi::grammar::analyzer::{GrammarAnalyzer, GrammarMatch};
use kashi::grammar::catalog::GrammarCatalog;
use kashi::grammar::condition::TokenCondition;
use kashi::grammar::rule::GrammarRule;
use tempfile::NamedTempFile;

fn token(token_id: usize, text: &str, kana: &str, base_form: &str, pos: &str, pos_detail: &str) -> Token {
    Token {
        token_id,
        text: text.to_string(),
        kana: kana.to_string(),
        base_form: base_form.to_string(),
        pos: pos.to_string(),
        pos_detail: pos_detail.to_string(),
        has_kanji: false,
        furigana: Vec::new(),
        furigana_html: String::new(),
        tags: None,
        meaning: None,
    }
}

fn assert_invariants(matches: &[GrammarMatch]) {
    for pair in matches.windows(2) {
        assert!(pair[0].start() <= pair[1].start(), "matches out of order");
    }
    for (i, a) in matches.iter().enumerate() {
        for b in &matches[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a.rule_id, b.rule_id);
        }
    }
}

/// 行こうと思ったけど、雨が降っている
fn sentence() -> Vec<Token> {
    vec![
        token(0, "行こ", "いこ", "行く", "動詞", "自立"),
        token(1, "う", "う", "う", "助動詞", ""),
        token(2, "と", "と", "と", "助詞", "格助詞"),
        token(3, "思っ", "おもっ", "思う", "動詞", "自立"),
        token(4, "た", "た", "た", "助動詞", ""),
        token(5, "けど", "けど", "けど", "助詞", "接続助詞"),
        token(6, "、", "、", "、", "記号", "読点"),
        token(7, "雨", "あめ", "雨", "名詞", "一般"),
        token(8, "が", "が", "が", "助詞", "格助詞"),
        token(9, "降っ", "ふっ", "降る", "動詞", "自立"),
        token(10, "て", "て", "て", "助詞", "接続助詞"),
        token(11, "いる", "いる", "いる", "動詞", "非自立"),
    ]
}

#[test]
fn test_builtin_catalog_on_sentence() -> Result<()> {
    let analyzer = GrammarAnalyzer::default();
    let matches = analyzer.analyze_line(&sentence());

    let found: Vec<(&str, Vec<usize>)> = matches
        .iter()
        .map(|m| (m.rule_id.as_str(), m.token_ids.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("volitional", vec![0, 1]),
            ("ta_past", vec![3, 4]),
            ("kedo", vec![5]),
            ("te_iru", vec![9, 10, 11]),
        ]
    );
    assert_invariants(&matches);

    // te_iru is listed first in the catalog, so it is discovered first.
    assert_eq!(matches[3].grammar_id, 0);
    assert_eq!(matches[0].matched_text, "行こう");

    Ok(())
}

#[test]
fn test_guard_rejects_line_initial_conjunction() -> Result<()> {
    let analyzer = GrammarAnalyzer::default();
    let tokens = vec![
        token(0, "けど", "けど", "けど", "助詞", "接続助詞"),
        token(1, "雨", "あめ", "雨", "名詞", "一般"),
    ];
    assert!(analyzer.analyze_line(&tokens).is_empty());
    Ok(())
}

#[test]
fn test_rules_loaded_from_json() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"[
            {{"id": "ga_subject", "name": "〜が", "level": "N5",
              "pattern": [{{"pos": "名詞"}}, {{"text": "が", "pos_detail": "格助詞"}}],
              "description": "Subject marker"}},
            {{"id": "u_ending", "name": "u-row verb", "level": "N5",
              "pattern": [{{"pos": "動詞", "kana_pattern": "[うくすつぬふむゆる]$"}}]}}
        ]"#
    )?;

    let catalog = GrammarCatalog::load_from_file(file.path())?;
    assert_eq!(catalog.len(), 2);

    let analyzer = GrammarAnalyzer::new(Arc::new(catalog));
    let matches = analyzer.analyze_line(&sentence());

    let ids: Vec<&str> = matches.iter().map(|m| m.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["ga_subject", "u_ending"]);
    assert_eq!(matches[1].matched_text, "いる");
    assert_eq!(matches[0].matched_text, "雨が");
    assert_eq!(matches[0].pattern, "名詞 + が");
    assert_eq!(matches[0].description, "Subject marker");

    Ok(())
}

#[test]
fn test_invalid_rules_file_is_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"[{{"id": "broken", "name": "x", "level": "N5", "pattern": [{{"kana_pattern": "("}}]}}]"#
    )?;
    assert!(matches!(
        GrammarCatalog::load_from_file(file.path()),
        Err(KashiError::Grammar(_))
    ));

    let mut file = NamedTempFile::new()?;
    write!(file, r#"[{{"id": "empty", "name": "x", "level": "N5", "pattern": []}}]"#)?;
    assert!(matches!(
        GrammarCatalog::load_from_file(file.path()),
        Err(KashiError::Grammar(_))
    ));

    Ok(())
}

#[test]
fn test_earlier_rule_wins_overlapping_span() -> Result<()> {
    let broad = GrammarRule::new(
        "verb_te",
        "verb + te",
        "N5",
        vec![TokenCondition::pos("動詞"), TokenCondition::text("て")],
    );
    let specific = GrammarRule::new(
        "te_iru",
        "〜ている",
        "N5",
        vec![
            TokenCondition::pos("動詞"),
            TokenCondition::text("て"),
            TokenCondition::base_form("いる"),
        ],
    );
    let analyzer = GrammarAnalyzer::new(Arc::new(GrammarCatalog::new(vec![broad, specific])?));

    let matches = analyzer.analyze_line(&sentence());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rule_id, "verb_te");
    assert_eq!(matches[0].token_ids, vec![9, 10]);

    Ok(())
}
