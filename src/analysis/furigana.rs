//! Furigana alignment.
//!
//! Splits a token's surface into maximal kanji and kana runs and distributes
//! the token's reading over the kanji runs. Kana runs act as literal anchors
//! inside the reading: a surface like `思い出` read `おもいで` becomes the
//! expression `^(.+)い(.+)$`, and the capture groups supply the reading of
//! each kanji run.
//!
//! This is a greedy heuristic, not a guaranteed-correct split. When several
//! splits are possible the leftmost capture group takes as much of the reading
//! as it can. When the expression does not match at all (inconsistent analyzer
//! output) the whole surface is annotated with the whole reading.
//!
//! # Examples
//!
//! ```
//! use kashi::analysis::furigana::align;
//!
//! let furigana = align("思い出", "おもいで");
//! assert_eq!(furigana.segments.len(), 3);
//! assert_eq!(furigana.html, "<ruby>思<rt>おも</rt></ruby>い<ruby>出<rt>で</rt></ruby>");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::kana::{has_kanji, is_kanji, to_hiragana};
use crate::analysis::token::FuriganaSegment;

static RP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<rp>[^<]*</rp>").expect("valid rp regex"));

static RUBY_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ruby>([^<]+)<rt>([^<]+)</rt></ruby>|([^<]+)").expect("valid ruby regex")
});

/// Ruby rendering of one token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Furigana {
    pub html: String,
    pub segments: Vec<FuriganaSegment>,
}

impl Furigana {
    fn from_segments(segments: Vec<FuriganaSegment>) -> Self {
        Furigana {
            html: render_html(&segments),
            segments,
        }
    }
}

/// A maximal run of kanji or non-kanji characters.
#[derive(Debug, PartialEq, Eq)]
struct Run<'a> {
    text: &'a str,
    kanji: bool,
}

fn split_runs(surface: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (offset, c) in surface.char_indices() {
        let kanji = is_kanji(c);
        if let Some(previous) = current
            && previous != kanji
        {
            runs.push(Run {
                text: &surface[start..offset],
                kanji: previous,
            });
            start = offset;
        }
        current = Some(kanji);
    }

    if let Some(kanji) = current {
        runs.push(Run {
            text: &surface[start..],
            kanji,
        });
    }

    runs
}

/// Align `reading` to the kanji runs of `surface` using kana runs as anchors.
///
/// Returns `None` when the surface has no kanji or the reading cannot be
/// aligned. The reading is normalized to hiragana first.
pub fn try_align(surface: &str, reading: &str) -> Option<Vec<FuriganaSegment>> {
    if surface.is_empty() || reading.is_empty() || !has_kanji(surface) {
        return None;
    }

    let reading = to_hiragana(reading);
    let runs = split_runs(surface);

    if let [run] = runs.as_slice() {
        return Some(vec![FuriganaSegment::kanji(run.text, reading)]);
    }

    let mut pattern = String::from("^");
    for run in &runs {
        if run.kanji {
            pattern.push_str("(.+)");
        } else {
            pattern.push_str(&regex::escape(&to_hiragana(run.text)));
        }
    }
    pattern.push('$');

    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            log::debug!("Could not build furigana pattern for '{}': {}", surface, e);
            return None;
        }
    };
    let captures = regex.captures(&reading)?;

    let mut groups = captures.iter().skip(1).flatten();
    let mut segments = Vec::with_capacity(runs.len());
    for run in &runs {
        if run.kanji {
            let ruby = groups.next()?;
            segments.push(FuriganaSegment::kanji(run.text, ruby.as_str()));
        } else {
            segments.push(FuriganaSegment::kana(run.text));
        }
    }

    Some(segments)
}

/// Produce the furigana for one token.
///
/// - Empty surface, or a kanji surface with an empty reading: no segments.
/// - Surface without kanji: a single kana segment.
/// - Otherwise the aligned segments, falling back to one kanji segment that
///   spans the whole surface.
pub fn align(surface: &str, reading: &str) -> Furigana {
    if surface.is_empty() {
        return Furigana::default();
    }

    if !has_kanji(surface) {
        return Furigana::from_segments(vec![FuriganaSegment::kana(surface)]);
    }

    if reading.is_empty() {
        return Furigana {
            html: surface.to_string(),
            segments: Vec::new(),
        };
    }

    match try_align(surface, reading) {
        Some(segments) => Furigana::from_segments(segments),
        None => {
            log::debug!(
                "Furigana alignment fell back to whole surface for '{}' ({})",
                surface,
                reading
            );
            Furigana::from_segments(vec![FuriganaSegment::kanji(surface, to_hiragana(reading))])
        }
    }
}

/// Render segments as ruby HTML: `<ruby>漢<rt>かん</rt></ruby>` for kanji
/// segments, plain text for kana segments.
pub fn render_html(segments: &[FuriganaSegment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match &segment.ruby {
            Some(ruby) => {
                html.push_str("<ruby>");
                html.push_str(&segment.text);
                html.push_str("<rt>");
                html.push_str(ruby);
                html.push_str("</rt></ruby>");
            }
            None => html.push_str(&segment.text),
        }
    }
    html
}

/// Parse ruby HTML back into segments.
///
/// `<rp>` fallback tags are dropped, as are whitespace-only text runs.
pub fn parse_ruby_html(html: &str) -> Vec<FuriganaSegment> {
    let clean = RP_TAG.replace_all(html, "");

    RUBY_PART
        .captures_iter(&clean)
        .filter_map(|captures| match (captures.get(1), captures.get(2), captures.get(3)) {
            (Some(text), Some(ruby), _) => Some(FuriganaSegment::kanji(text.as_str(), ruby.as_str())),
            (_, _, Some(text)) if !text.as_str().trim().is_empty() => {
                Some(FuriganaSegment::kana(text.as_str()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_of(segments: &[FuriganaSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn reading_of(segments: &[FuriganaSegment]) -> String {
        segments.iter().map(FuriganaSegment::reading).collect()
    }

    #[test]
    fn test_split_runs() {
        let runs = split_runs("思い出");
        assert_eq!(
            runs,
            vec![
                Run { text: "思", kanji: true },
                Run { text: "い", kanji: false },
                Run { text: "出", kanji: true },
            ]
        );
        assert!(split_runs("").is_empty());
        assert_eq!(split_runs("時々").len(), 1);
    }

    #[test]
    fn test_align_interleaved_kana() {
        let furigana = align("思い出", "おもいで");
        assert_eq!(
            furigana.segments,
            vec![
                FuriganaSegment::kanji("思", "おも"),
                FuriganaSegment::kana("い"),
                FuriganaSegment::kanji("出", "で"),
            ]
        );
        assert_eq!(surface_of(&furigana.segments), "思い出");
        assert_eq!(reading_of(&furigana.segments), "おもいで");
    }

    #[test]
    fn test_align_trailing_okurigana() {
        let furigana = align("愛し", "あいし");
        assert_eq!(
            furigana.segments,
            vec![FuriganaSegment::kanji("愛", "あい"), FuriganaSegment::kana("し")]
        );
        assert_eq!(furigana.html, "<ruby>愛<rt>あい</rt></ruby>し");
    }

    #[test]
    fn test_align_single_kanji_run() {
        let furigana = align("今日", "きょう");
        assert_eq!(furigana.segments, vec![FuriganaSegment::kanji("今日", "きょう")]);
        assert_eq!(furigana.html, "<ruby>今日<rt>きょう</rt></ruby>");
    }

    #[test]
    fn test_align_katakana_reading_is_normalized() {
        let furigana = align("思い出", "オモイデ");
        assert_eq!(reading_of(&furigana.segments), "おもいで");
        assert_eq!(furigana.segments[0].ruby.as_deref(), Some("おも"));
    }

    #[test]
    fn test_align_kana_only() {
        let furigana = align("ありがとう", "ありがとう");
        assert_eq!(furigana.segments, vec![FuriganaSegment::kana("ありがとう")]);
        assert_eq!(furigana.html, "ありがとう");
    }

    #[test]
    fn test_align_fallback_on_mismatch() {
        assert!(try_align("思い出", "かこ").is_none());

        let furigana = align("思い出", "かこ");
        assert_eq!(furigana.segments, vec![FuriganaSegment::kanji("思い出", "かこ")]);
        assert_eq!(furigana.html, "<ruby>思い出<rt>かこ</rt></ruby>");
    }

    #[test]
    fn test_align_empty_inputs() {
        assert!(align("", "あ").segments.is_empty());
        assert!(align("漢字", "").segments.is_empty());
        assert_eq!(align("漢字", "").html, "漢字");
    }

    #[test]
    fn test_round_trip_when_aligned() {
        let cases = [
            ("取り扱い", "とりあつかい"),
            ("生き生き", "いきいき"),
            ("お茶", "おちゃ"),
            ("食べ", "たべ"),
            ("見上げる", "みあげる"),
            ("ドキ胸", "ドキムネ"),
        ];
        for (surface, reading) in cases {
            let segments = try_align(surface, reading).unwrap();
            assert_eq!(surface_of(&segments), surface);
            assert_eq!(reading_of(&segments), to_hiragana(reading));
        }
    }

    #[test]
    fn test_kana_with_regex_metacharacters() {
        let furigana = align("夢?", "ゆめ?");
        assert_eq!(
            furigana.segments,
            vec![FuriganaSegment::kanji("夢", "ゆめ"), FuriganaSegment::kana("?")]
        );
    }

    #[test]
    fn test_parse_ruby_html() {
        let html = "<ruby>思<rp>(</rp><rt>おも</rt><rp>)</rp></ruby>い<ruby>出<rt>で</rt></ruby> ";
        let segments = parse_ruby_html(html);
        assert_eq!(
            segments,
            vec![
                FuriganaSegment::kanji("思", "おも"),
                FuriganaSegment::kana("い"),
                FuriganaSegment::kanji("出", "で"),
            ]
        );
    }

    #[test]
    fn test_parse_rendered_html() {
        let furigana = align("見上げる", "みあげる");
        assert_eq!(parse_ruby_html(&furigana.html), furigana.segments);
    }
}
