//! Command implementations for the Kashi CLI.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::analysis::furigana::align;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{PipelineConfig, TokenizerKind};
use crate::dictionary::VocabularyDictionary;
use crate::error::{KashiError, Result};
use crate::lyrics::line::{Line, ProcessedLyrics};
use crate::lyrics::overrides::KanaOverrides;
use crate::vocabulary::{
    exclude_mastered, extract_vocabulary, group_by_level, is_valid_level, level_to_tag_set,
};

/// Execute a CLI command.
pub fn execute_command(args: KashiArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Song(song_args) => process_song(song_args.clone(), config, &args),
        Command::Text(text_args) => process_text(text_args.clone(), config, &args),
        Command::Vocab(vocab_args) => extract_vocab(vocab_args.clone(), config, &args),
        Command::Furigana(furigana_args) => align_furigana(furigana_args.clone(), &args),
        Command::Rules(rules_args) => list_rules(rules_args.clone(), config, &args),
    }
}

fn load_config(cli_args: &KashiArgs) -> Result<PipelineConfig> {
    match &cli_args.config {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            PipelineConfig::load_from_file(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Apply command line overrides on top of the loaded configuration.
fn apply_pipeline_args(config: &mut PipelineConfig, args: &PipelineArgs) {
    if let Some(table) = &args.token_table {
        config.tokenizer.kind = TokenizerKind::Table;
        config.tokenizer.table_path = Some(table.clone());
    }
    if args.lindera {
        config.tokenizer.kind = TokenizerKind::Lindera;
    }
    if let Some(dictionary) = &args.dictionary {
        config.dictionary_path = Some(dictionary.clone());
    }
    if let Some(rules) = &args.grammar_rules {
        config.grammar_rules_path = Some(rules.clone());
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| {
        KashiError::other(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// Overrides are optional input; a malformed file is dropped rather than
/// failing the song.
fn load_overrides(path: Option<&Path>) -> KanaOverrides {
    let Some(path) = path else {
        return KanaOverrides::new();
    };
    match KanaOverrides::load_from_file(path) {
        Ok(overrides) => overrides,
        Err(e) => {
            log::warn!("Ignoring kana overrides from {}: {}", path.display(), e);
            KanaOverrides::new()
        }
    }
}

/// Process the LRC streams of one song.
fn process_song(args: SongArgs, mut config: PipelineConfig, cli_args: &KashiArgs) -> Result<()> {
    apply_pipeline_args(&mut config, &args.pipeline);
    let processor = config.build_processor()?;

    let lrc = read_input(&args.lrc_file)?;
    let translate = args.translate.as_deref().map(read_input).transpose()?;
    let roma = args.roma.as_deref().map(read_input).transpose()?;
    let overrides = load_overrides(args.overrides.as_deref());

    let lyrics = processor
        .process_song_lyrics(&lrc, translate.as_deref(), roma.as_deref(), &overrides)
        .map_err(|e| {
            KashiError::analysis(format!(
                "Lyrics could not be processed for '{}': {}",
                args.lrc_file.display(),
                e
            ))
        })?;

    output_result("Song processed successfully", &lyrics, cli_args)
}

/// Process plain or timed text.
fn process_text(args: TextArgs, mut config: PipelineConfig, cli_args: &KashiArgs) -> Result<()> {
    apply_pipeline_args(&mut config, &args.pipeline);
    let processor = config.build_processor()?;

    let text = read_input(&args.input)?;
    let lyrics = processor.process_lyrics_text(&text)?;

    output_result("Text processed successfully", &lyrics, cli_args)
}

/// Read processed lyrics written by `kashi song` or `kashi text`; a bare
/// array of lines is accepted too.
fn load_processed_lines(path: &Path) -> Result<Vec<Line>> {
    let content = read_input(path)?;
    if let Ok(lyrics) = serde_json::from_str::<ProcessedLyrics>(&content) {
        return Ok(lyrics.lines);
    }
    serde_json::from_str::<Vec<Line>>(&content).map_err(|e| {
        KashiError::parse(format!(
            "Failed to parse processed lyrics JSON from '{}': {}",
            path.display(),
            e
        ))
    })
}

fn load_mastered(path: &Path) -> Result<HashSet<String>> {
    Ok(read_input(path)?
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect())
}

/// Extract vocabulary from processed lyrics.
fn extract_vocab(args: VocabArgs, config: PipelineConfig, cli_args: &KashiArgs) -> Result<()> {
    let level = args.level.unwrap_or(config.default_level);
    if !is_valid_level(&level) {
        log::warn!("Unknown learner level '{level}', showing all levels");
    }

    let lines = load_processed_lines(&args.lyrics_file)?;
    let dictionary_path = args.dictionary.or(config.dictionary_path);
    let dictionary = VocabularyDictionary::new(dictionary_path.as_deref())?;

    let mut entries = extract_vocabulary(&lines, &level_to_tag_set(&level), &dictionary);
    if let Some(path) = &args.mastered {
        entries = exclude_mastered(entries, &load_mastered(path)?);
    }

    let total = entries.len();
    let report = if args.group {
        VocabularyReport {
            level,
            total,
            entries: Vec::new(),
            groups: Some(group_by_level(entries)),
        }
    } else {
        VocabularyReport {
            level,
            total,
            entries,
            groups: None,
        }
    };

    output_result("Vocabulary extracted successfully", &report, cli_args)
}

/// Align furigana for one surface and reading.
fn align_furigana(args: FuriganaArgs, cli_args: &KashiArgs) -> Result<()> {
    let furigana = align(&args.surface, &args.reading);
    output_result("Furigana aligned", &furigana, cli_args)
}

/// List the grammar catalog in precedence order.
fn list_rules(args: RulesArgs, mut config: PipelineConfig, cli_args: &KashiArgs) -> Result<()> {
    if let Some(rules) = args.grammar_rules {
        config.grammar_rules_path = Some(rules);
    }
    let catalog = config.load_grammar_catalog()?;

    let rules = catalog
        .rules()
        .iter()
        .filter(|rule| args.level.as_deref().is_none_or(|level| rule.level == level))
        .map(RuleSummary::from)
        .collect();

    output_result("Grammar catalog", &RuleListing { rules }, cli_args)
}
