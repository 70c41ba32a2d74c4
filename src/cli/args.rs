//! Command line argument parsing for the Kashi CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Kashi - Japanese lyrics analysis for learners
#[derive(Parser, Debug, Clone)]
#[command(name = "kashi")]
#[command(about = "Furigana, grammar points and vocabulary for Japanese lyrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Kashi Contributors")]
#[command(long_about = None)]
pub struct KashiArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, global = true, env = "KASHI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl KashiArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Process the LRC lyrics of one song
    Song(SongArgs),

    /// Process plain or timed lyrics text
    Text(TextArgs),

    /// Extract vocabulary from processed lyrics
    Vocab(VocabArgs),

    /// Align furigana for one word
    Furigana(FuriganaArgs),

    /// List the grammar rule catalog
    Rules(RulesArgs),
}

/// Pipeline overrides shared by the processing commands
#[derive(Parser, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Token table JSON (overrides the config)
    #[arg(short = 't', long, value_name = "TABLE_FILE")]
    pub token_table: Option<PathBuf>,

    /// Vocabulary dictionary JSON (overrides the config)
    #[arg(short = 'd', long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Extra grammar rules JSON (overrides the config)
    #[arg(short = 'g', long, value_name = "RULES_FILE")]
    pub grammar_rules: Option<PathBuf>,

    /// Use the lindera tokenizer instead of a token table
    #[arg(long, conflicts_with = "token_table")]
    pub lindera: bool,
}

/// Arguments for processing a song
#[derive(Parser, Debug, Clone)]
pub struct SongArgs {
    /// Original lyrics in LRC format
    #[arg(value_name = "LRC_FILE")]
    pub lrc_file: PathBuf,

    /// Translation in LRC format
    #[arg(long, value_name = "LRC_FILE")]
    pub translate: Option<PathBuf>,

    /// Romanization in LRC format
    #[arg(long, value_name = "LRC_FILE")]
    pub roma: Option<PathBuf>,

    /// Kana overrides JSON
    #[arg(long, value_name = "OVERRIDES_FILE")]
    pub overrides: Option<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for processing free text
#[derive(Parser, Debug, Clone)]
pub struct TextArgs {
    /// Text file, or `-` for standard input
    #[arg(value_name = "TEXT_FILE", default_value = "-")]
    pub input: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for vocabulary extraction
#[derive(Parser, Debug, Clone)]
pub struct VocabArgs {
    /// Processed lyrics JSON as written by `kashi song -f json`
    #[arg(value_name = "LYRICS_FILE")]
    pub lyrics_file: PathBuf,

    /// Learner level (N1-N5); defaults to the configured level
    #[arg(short, long)]
    pub level: Option<String>,

    /// Vocabulary dictionary JSON used for meanings
    #[arg(short = 'd', long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// File with one mastered word per line
    #[arg(short, long, value_name = "WORDS_FILE")]
    pub mastered: Option<PathBuf>,

    /// Group entries by JLPT level
    #[arg(long)]
    pub group: bool,
}

/// Arguments for furigana alignment
#[derive(Parser, Debug, Clone)]
pub struct FuriganaArgs {
    /// Surface form, e.g. 思い出
    #[arg(value_name = "SURFACE")]
    pub surface: String,

    /// Reading in hiragana or katakana, e.g. おもいで
    #[arg(value_name = "READING")]
    pub reading: String,
}

/// Arguments for listing rules
#[derive(Parser, Debug, Clone, Default)]
pub struct RulesArgs {
    /// Extra grammar rules JSON (overrides the config)
    #[arg(short = 'g', long, value_name = "RULES_FILE")]
    pub grammar_rules: Option<PathBuf>,

    /// Only show rules of this level
    #[arg(short, long)]
    pub level: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
