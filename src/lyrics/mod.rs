//! Lyric line assembly.
//!
//! LRC parsing, the line data model, kana overrides and the processor that
//! ties tokenization, furigana and grammar analysis together.

pub mod line;
pub mod lrc;
pub mod overrides;
pub mod processor;

pub use line::{Line, LyricsMeta, ProcessedLyrics, SongLyrics};
pub use overrides::KanaOverrides;
pub use processor::LyricsProcessor;
