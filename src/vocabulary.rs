//! Vocabulary extraction by JLPT level.
//!
//! Tokens carry difficulty tags of the form `JLPT_<n>`, where a lower `n` is
//! harder. A word is introduced at its easiest classification, so the tag
//! with the largest `n` decides whether it is shown to a learner.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::dictionary::VocabularyDictionary;
use crate::lyrics::line::Line;

static JLPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^JLPT_([0-9])$").expect("valid JLPT tag regex"));

const ALL_LEVELS: [u8; 5] = [1, 2, 3, 4, 5];

/// A word worth studying, taken from its first occurrence in a song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Surface form as it appeared in the lyrics
    pub word: String,
    pub base_form: String,
    pub kana: String,
    pub pos: String,
    /// The chosen tag, e.g. `JLPT_3`
    pub jlpt_level: String,
    #[serde(default)]
    pub meaning: String,
    /// Original text of the line the word was found in
    #[serde(default)]
    pub example: String,
}

/// Map a learner level (`N1`..`N5`) to the tag numbers it studies.
///
/// `N3` studies levels 1 to 3. Anything unparseable yields all levels.
///
/// ```
/// use kashi::vocabulary::level_to_tag_set;
///
/// assert_eq!(level_to_tag_set("N3").into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(level_to_tag_set("beginner").len(), 5);
/// ```
pub fn level_to_tag_set(level: &str) -> BTreeSet<u8> {
    let number = level
        .trim()
        .strip_prefix(['N', 'n'])
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=5).contains(n));

    match number {
        Some(n) => (1..=n).collect(),
        None => ALL_LEVELS.into_iter().collect(),
    }
}

/// Whether `level` names a valid learner level.
pub fn is_valid_level(level: &str) -> bool {
    level
        .trim()
        .strip_prefix(['N', 'n'])
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=5).contains(&n))
}

/// The easiest `JLPT_<n>` tag among `tags`, with its number.
pub fn easiest_jlpt_tag(tags: &[String]) -> Option<(u8, &str)> {
    tags.iter()
        .filter_map(|tag| {
            let captures = JLPT_TAG.captures(tag)?;
            let number = captures[1].parse::<u8>().ok()?;
            Some((number, tag.as_str()))
        })
        .max_by_key(|(number, _)| *number)
}

/// Collect the vocabulary of `lines` whose level falls in `target_levels`.
///
/// Lines without a translation or romanization are skipped as metadata.
/// Entries are deduplicated by base form; the first occurrence wins. The
/// dictionary supplies meanings, falling back to the token's own gloss.
pub fn extract_vocabulary(
    lines: &[Line],
    target_levels: &BTreeSet<u8>,
    dictionary: &VocabularyDictionary,
) -> Vec<VocabularyEntry> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut entries = Vec::new();

    for line in lines.iter().filter(|line| line.is_lyric()) {
        for token in &line.tokens {
            let Some((number, tag)) = token.tags.as_deref().and_then(easiest_jlpt_tag) else {
                continue;
            };
            if !target_levels.contains(&number) {
                continue;
            }

            let key = token.vocabulary_key();
            if !seen.insert(key) {
                continue;
            }

            entries.push(VocabularyEntry {
                word: token.text.clone(),
                base_form: key.to_string(),
                kana: token.kana.clone(),
                pos: token.pos.clone(),
                jlpt_level: tag.to_string(),
                meaning: meaning_of(token, key, dictionary),
                example: line.original.clone().unwrap_or_default(),
            });
        }
    }

    log::debug!(
        "Extracted {} vocabulary entries for levels {:?}",
        entries.len(),
        target_levels
    );
    entries
}

fn meaning_of(token: &Token, key: &str, dictionary: &VocabularyDictionary) -> String {
    dictionary
        .get(key)
        .or_else(|| dictionary.get(&token.text))
        .and_then(|entry| entry.meaning.clone())
        .or_else(|| token.meaning.clone())
        .unwrap_or_default()
}

/// Group entries by their `jlpt_level` tag, keeping document order within a group.
pub fn group_by_level(entries: Vec<VocabularyEntry>) -> BTreeMap<String, Vec<VocabularyEntry>> {
    let mut groups: BTreeMap<String, Vec<VocabularyEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.jlpt_level.clone()).or_default().push(entry);
    }
    groups
}

/// Drop entries whose word the learner has already mastered.
pub fn exclude_mastered(
    entries: Vec<VocabularyEntry>,
    mastered: &HashSet<String>,
) -> Vec<VocabularyEntry> {
    entries
        .into_iter()
        .filter(|entry| !mastered.contains(&entry.word))
        .collect()
}
