//! The lyrics line processor.
//!
//! Tokenizes each lyric line, aligns furigana per token, attaches vocabulary
//! tags, merges the original, translation and romanization streams by
//! timestamp, and finally runs grammar analysis over every line.
//!
//! Lines of one song are tokenized sequentially in document order. A
//! tokenizer failure aborts the whole song: grammar analysis depends on
//! complete token coverage, so no partial result is returned. Throughput
//! across many songs comes from [`LyricsProcessor::process_songs`], which
//! runs one independent pipeline per song.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::furigana::align;
use crate::analysis::kana::{has_kanji, to_hiragana};
use crate::analysis::token::{Morpheme, Token};
use crate::analysis::tokenizer::Tokenizer;
use crate::dictionary::VocabularyDictionary;
use crate::error::Result;
use crate::grammar::analyzer::GrammarAnalyzer;
use crate::lyrics::line::{Line, LyricsMeta, ProcessedLyrics, SongLyrics};
use crate::lyrics::lrc::{has_timestamps, timed_lines};
use crate::lyrics::overrides::KanaOverrides;

/// Assembles processed lyrics from raw text.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use kashi::analysis::token::Morpheme;
/// use kashi::analysis::tokenizer::table::TableTokenizer;
/// use kashi::lyrics::processor::LyricsProcessor;
///
/// let mut tokenizer = TableTokenizer::new();
/// tokenizer
///     .insert("思い出", vec![Morpheme::new("思い出", "オモイデ", "思い出", "名詞", "一般")])
///     .unwrap();
///
/// let processor = LyricsProcessor::new(Arc::new(tokenizer));
/// let lyrics = processor.process_plain_text("思い出\n\n").unwrap();
///
/// assert_eq!(lyrics.lines.len(), 1);
/// assert_eq!(lyrics.lines[0].tokens[0].kana, "おもいで");
/// ```
#[derive(Clone)]
pub struct LyricsProcessor {
    tokenizer: Arc<dyn Tokenizer>,
    dictionary: Arc<VocabularyDictionary>,
    grammar: GrammarAnalyzer,
    parallel: bool,
}

impl std::fmt::Debug for LyricsProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LyricsProcessor")
            .field("tokenizer", &self.tokenizer.name())
            .field("dictionary_entries", &self.dictionary.len())
            .field("grammar_rules", &self.grammar.catalog().len())
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl LyricsProcessor {
    /// Create a processor with an empty dictionary and the built-in grammar catalog.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        LyricsProcessor {
            tokenizer,
            dictionary: Arc::new(VocabularyDictionary::default()),
            grammar: GrammarAnalyzer::default(),
            parallel: true,
        }
    }

    pub fn with_dictionary(mut self, dictionary: Arc<VocabularyDictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_grammar(mut self, grammar: GrammarAnalyzer) -> Self {
        self.grammar = grammar;
        self
    }

    /// Process the songs of a batch on the rayon pool (the default) or one
    /// after another on the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn dictionary(&self) -> &VocabularyDictionary {
        &self.dictionary
    }

    pub fn grammar(&self) -> &GrammarAnalyzer {
        &self.grammar
    }

    /// Tokenize one line and build its tokens, furigana and aggregates.
    ///
    /// Grammar is not analysed here. Blank text yields a line without tokens
    /// and never reaches the tokenizer.
    pub fn process_line(&self, text: &str) -> Result<Line> {
        let mut line = Line {
            original: Some(text.to_string()),
            ..Line::default()
        };

        if text.trim().is_empty() {
            line.kana = Some(String::new());
            line.furigana_html = Some(String::new());
            return Ok(line);
        }

        let morphemes = self.tokenizer.tokenize(text).inspect_err(|e| {
            log::warn!("Tokenizer '{}' failed on '{}': {}", self.tokenizer.name(), text, e);
        })?;

        line.tokens = morphemes
            .enumerate()
            .map(|(token_id, morpheme)| self.build_token(token_id, morpheme))
            .collect();
        line.refresh_aggregates();

        Ok(line)
    }

    fn build_token(&self, token_id: usize, morpheme: Morpheme) -> Token {
        let kana = to_hiragana(morpheme.reading_or_surface());
        let base_form = morpheme.base_form_or_surface().to_string();
        let furigana = align(&morpheme.surface, &kana);
        let entry = self.dictionary.lookup(&morpheme.surface, &base_form);

        Token {
            token_id,
            has_kanji: has_kanji(&morpheme.surface),
            kana,
            base_form,
            pos: morpheme.pos,
            pos_detail: morpheme.pos_detail,
            furigana: furigana.segments,
            furigana_html: furigana.html,
            tags: entry.map(|entry| entry.tags.clone()),
            meaning: entry.and_then(|entry| entry.meaning.clone()),
            text: morpheme.surface,
        }
    }

    /// Merge the LRC streams of one song by timestamp.
    ///
    /// Translation and romanization are merged first, then the original text
    /// is tokenized line by line into the same timestamp buckets. Lines are
    /// ordered by ascending timestamp and analysed for grammar.
    pub fn process_song_lyrics(
        &self,
        lrc: &str,
        translate: Option<&str>,
        roma: Option<&str>,
        kana_overrides: &KanaOverrides,
    ) -> Result<ProcessedLyrics> {
        let mut timeline: BTreeMap<u64, Line> = BTreeMap::new();

        for timed in translate.map(timed_lines).into_iter().flatten() {
            timeline
                .entry(timed.time)
                .or_insert_with(|| Line::at(timed.time, timed.time_str.as_str()))
                .translate = Some(timed.text.to_string());
        }

        for timed in roma.map(timed_lines).into_iter().flatten() {
            timeline
                .entry(timed.time)
                .or_insert_with(|| Line::at(timed.time, timed.time_str.as_str()))
                .roma = Some(timed.text.to_string());
        }

        for timed in timed_lines(lrc) {
            let mut line = self.process_line(timed.text)?;
            line.time = Some(timed.time);
            line.time_str = Some(timed.time_str);
            kana_overrides.apply(&mut line);

            if let Some(existing) = timeline.remove(&timed.time) {
                line.translate = existing.translate;
                line.roma = existing.roma;
            }
            timeline.insert(timed.time, line);
        }

        let translate_line_count = translate.map_or(0, |text| text.split('\n').count());
        let meta = LyricsMeta {
            line_count: translate_line_count,
            lyric_start_index: timeline.len().saturating_sub(translate_line_count),
        };

        Ok(self.finish(meta, timeline.into_values().collect()))
    }

    /// Process one song given as [`SongLyrics`].
    pub fn process_song(&self, song: &SongLyrics) -> Result<ProcessedLyrics> {
        self.process_song_lyrics(
            &song.lrc,
            song.translate.as_deref(),
            song.roma.as_deref(),
            &song.kana_overrides,
        )
    }

    /// Process many songs in parallel, one independent pipeline per song.
    ///
    /// Results keep the input order; a failing song does not affect the others.
    pub fn process_songs(&self, songs: &[SongLyrics]) -> Vec<Result<ProcessedLyrics>> {
        let process = |(index, song): (usize, &SongLyrics)| {
            self.process_song(song).inspect_err(|e| {
                log::error!("Lyrics could not be processed for song #{}: {}", index, e);
            })
        };

        if self.parallel {
            songs.par_iter().enumerate().map(process).collect()
        } else {
            songs.iter().enumerate().map(process).collect()
        }
    }

    /// Process untimed text: every non-blank line, trimmed, in document order.
    pub fn process_plain_text(&self, text: &str) -> Result<ProcessedLyrics> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.process_line(line))
            .collect::<Result<Vec<_>>>()?;

        let meta = LyricsMeta {
            line_count: lines.len(),
            lyric_start_index: 0,
        };
        Ok(self.finish(meta, lines))
    }

    /// Process text that contains LRC timestamps. Lines without a timestamp
    /// are dropped; a repeated timestamp keeps the last line.
    pub fn process_timed_text(&self, text: &str) -> Result<ProcessedLyrics> {
        let mut timeline: BTreeMap<u64, Line> = BTreeMap::new();
        for timed in timed_lines(text) {
            let mut line = self.process_line(timed.text)?;
            line.time = Some(timed.time);
            line.time_str = Some(timed.time_str);
            timeline.insert(timed.time, line);
        }

        let meta = LyricsMeta {
            line_count: timeline.len(),
            lyric_start_index: 0,
        };
        Ok(self.finish(meta, timeline.into_values().collect()))
    }

    /// Process user-supplied text, timed if any line carries a timestamp.
    pub fn process_lyrics_text(&self, text: &str) -> Result<ProcessedLyrics> {
        if has_timestamps(text) {
            self.process_timed_text(text)
        } else {
            self.process_plain_text(text)
        }
    }

    fn finish(&self, meta: LyricsMeta, lines: Vec<Line>) -> ProcessedLyrics {
        let lyrics = ProcessedLyrics {
            meta,
            lines: self.grammar.analyze_song(lines),
        };
        log::info!(
            "Processed {} lines ({} tokens, {} grammar points)",
            lyrics.lines.len(),
            lyrics.lines.iter().map(|l| l.tokens.len()).sum::<usize>(),
            lyrics.grammar_count()
        );
        lyrics
    }
}
