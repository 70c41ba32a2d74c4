//! LRC timestamp parsing.
//!
//! A timed line starts with `[mm:ss.xx]` or `[mm:ss.xxx]`. A two-digit
//! fraction is hundredths of a second, so `[01:01.41]` is 61 410 ms.

use std::sync::LazyLock;

use regex::Regex;

static LRC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([0-9]{2}):([0-9]{2})\.([0-9]{2,3})\](.*)$").expect("valid LRC regex")
});

/// A line that carried an LRC timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedLine<'a> {
    /// Milliseconds from the start of the song
    pub time: u64,
    /// The timestamp as written, without brackets (e.g. `03:14.140`)
    pub time_str: String,
    /// The text after the timestamp
    pub text: &'a str,
}

/// Parse one LRC line. Returns `None` for lines without a leading timestamp,
/// which callers treat as untimed text.
pub fn parse_lrc_line(line: &str) -> Option<TimedLine<'_>> {
    let line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let captures = LRC_LINE.captures(line)?;

    let minutes: u64 = captures[1].parse().ok()?;
    let seconds: u64 = captures[2].parse().ok()?;
    let fraction = &captures[3];
    let millis: u64 = fraction.parse::<u64>().ok()? * if fraction.len() == 2 { 10 } else { 1 };

    let text = captures.get(4).map_or("", |m| m.as_str());

    Some(TimedLine {
        time: minutes * 60_000 + seconds * 1_000 + millis,
        time_str: format!("{}:{}.{}", &captures[1], &captures[2], fraction),
        text,
    })
}

/// Whether any line of `text` starts with an LRC timestamp.
pub fn has_timestamps(text: &str) -> bool {
    text.lines().any(|line| parse_lrc_line(line).is_some())
}

/// Iterate the timed lines of an LRC document, skipping everything else.
pub fn timed_lines(text: &str) -> impl Iterator<Item = TimedLine<'_>> {
    text.split('\n').filter_map(parse_lrc_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_digit_fraction() {
        let line = parse_lrc_line("[03:14.140]とても忘れられない").unwrap();
        assert_eq!(line.time, 194_140);
        assert_eq!(line.time_str, "03:14.140");
        assert_eq!(line.text, "とても忘れられない");

        assert_eq!(parse_lrc_line("[00:00.851]x").unwrap().time, 851);
    }

    #[test]
    fn test_two_digit_fraction_is_hundredths() {
        let line = parse_lrc_line("[01:01.41]x").unwrap();
        assert_eq!(line.time, 61_410);
        assert_eq!(line.time_str, "01:01.41");
    }

    #[test]
    fn test_untimed_lines() {
        assert!(parse_lrc_line("今日は夏の午後").is_none());
        assert!(parse_lrc_line("[ar:artist]").is_none());
        assert!(parse_lrc_line("[1:01.41]x").is_none());
        assert!(parse_lrc_line("[01:01.4]x").is_none());
        assert!(parse_lrc_line("text [01:01.41]").is_none());
    }

    #[test]
    fn test_empty_text_and_crlf() {
        let line = parse_lrc_line("[00:10.00]").unwrap();
        assert_eq!(line.time, 10_000);
        assert_eq!(line.text, "");

        let line = parse_lrc_line("[00:10.00]歌\r").unwrap();
        assert_eq!(line.text, "歌");
    }

    #[test]
    fn test_has_timestamps() {
        assert!(has_timestamps("[ti:title]\n[00:01.00]a"));
        assert!(!has_timestamps("a\nb\n"));
        assert_eq!(timed_lines("[00:01.00]a\nplain\n[00:02.00]b").count(), 2);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let line = parse_lrc_line("\u{FEFF}[00:01.50]歌").unwrap();
        assert_eq!(line.time, 1_500);
        assert_eq!(line.text, "歌");

        let lines: Vec<_> = timed_lines("\u{FEFF}[00:01.00]a\r\n[00:02.00]b").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "a");
    }
}
