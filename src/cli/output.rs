//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::furigana::Furigana;
use crate::cli::args::{KashiArgs, OutputFormat};
use crate::error::Result;
use crate::grammar::rule::GrammarRule;
use crate::lyrics::line::ProcessedLyrics;
use crate::vocabulary::VocabularyEntry;

/// Result structure for vocabulary extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyReport {
    pub level: String,
    pub total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub entries: Vec<VocabularyEntry>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub groups: Option<BTreeMap<String, Vec<VocabularyEntry>>>,
}

/// One catalog entry as listed by `kashi rules`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: String,
    pub name: String,
    pub level: String,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alternative: Option<String>,
    pub guarded: bool,
    pub description: String,
    pub example: String,
}

impl From<&GrammarRule> for RuleSummary {
    fn from(rule: &GrammarRule) -> Self {
        RuleSummary {
            id: rule.id.clone(),
            name: rule.name.clone(),
            level: rule.level.clone(),
            pattern: rule.pattern_summary(),
            alternative: rule.alternative_summary(),
            guarded: rule.is_guarded(),
            description: rule.description.clone(),
            example: rule.example.clone(),
        }
    }
}

/// Result structure for rule listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct RuleListing {
    pub rules: Vec<RuleSummary>,
}

/// Results that have a human-readable rendering.
pub trait HumanOutput {
    fn print_human(&self, args: &KashiArgs);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &KashiArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            output_human(message, result, args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &KashiArgs) {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    result.print_human(args);
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &KashiArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanOutput for ProcessedLyrics {
    fn print_human(&self, args: &KashiArgs) {
        println!("Lyrics:");
        println!("═══════");

        for line in &self.lines {
            println!();
            match &line.time_str {
                Some(time_str) => println!("[{time_str}] {}", line.original.as_deref().unwrap_or("")),
                None => println!("{}", line.original.as_deref().unwrap_or("")),
            }
            if let Some(kana) = line.kana.as_deref().filter(|kana| !kana.is_empty()) {
                println!("  kana: {kana}");
            }
            if let Some(roma) = &line.roma {
                println!("  roma: {roma}");
            }
            if let Some(translate) = &line.translate {
                println!("  translation: {translate}");
            }

            if args.verbosity() > 1 {
                for token in &line.tokens {
                    println!(
                        "    {} [{}] {} {}",
                        token.text, token.kana, token.pos, token.base_form
                    );
                }
            }

            for grammar in &line.grammar {
                println!(
                    "  grammar: {} ({}) \"{}\"",
                    grammar.name, grammar.level, grammar.matched_text
                );
            }
        }

        println!();
        println!(
            "{} lines, {} grammar points",
            self.lines.len(),
            self.grammar_count()
        );
    }
}

impl HumanOutput for VocabularyReport {
    fn print_human(&self, _args: &KashiArgs) {
        println!("Vocabulary ({}):", self.level);
        println!("════════════════");

        match &self.groups {
            Some(groups) => {
                for (level, entries) in groups {
                    println!();
                    println!("{level}:");
                    println!("───────");
                    print_entries(entries);
                }
            }
            None => print_entries(&self.entries),
        }

        println!();
        println!("Total words: {}", self.total);
    }
}

fn print_entries(entries: &[VocabularyEntry]) {
    for entry in entries {
        let meaning = if entry.meaning.is_empty() {
            String::new()
        } else {
            format!(" - {}", entry.meaning)
        };
        println!(
            "  {} [{}] {} {}{}",
            entry.base_form, entry.kana, entry.pos, entry.jlpt_level, meaning
        );
    }
}

impl HumanOutput for Furigana {
    fn print_human(&self, _args: &KashiArgs) {
        for segment in &self.segments {
            match &segment.ruby {
                Some(ruby) => println!("{} ({})", segment.text, ruby),
                None => println!("{}", segment.text),
            }
        }
        println!("{}", self.html);
    }
}

impl HumanOutput for RuleListing {
    fn print_human(&self, args: &KashiArgs) {
        println!("Grammar Rules:");
        println!("══════════════");

        for (position, rule) in self.rules.iter().enumerate() {
            println!();
            println!("{}. {} [{}] {}", position + 1, rule.name, rule.level, rule.id);
            println!("   pattern: {}", rule.pattern);
            if let Some(alternative) = &rule.alternative {
                println!("   alternative: {alternative}");
            }
            if args.verbosity() > 1 {
                if rule.guarded {
                    println!("   guarded: yes");
                }
                if !rule.description.is_empty() {
                    println!("   {}", rule.description);
                }
                if !rule.example.is_empty() {
                    println!("   e.g. {}", rule.example);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::catalog::GrammarCatalog;

    #[test]
    fn test_rule_summary_from_catalog() {
        let catalog = GrammarCatalog::builtin();
        let summary = RuleSummary::from(catalog.get("kedo").unwrap());
        assert_eq!(summary.name, "〜けど");
        assert_eq!(summary.pattern, "けど");
        assert_eq!(summary.alternative.as_deref(), Some("けれど"));
        assert!(summary.guarded);

        let summary = RuleSummary::from(catalog.get("tai").unwrap());
        assert!(!summary.guarded);
        assert!(summary.alternative.is_none());
    }

    #[test]
    fn test_vocabulary_report_json_shape() {
        let report = VocabularyReport {
            level: "N5".to_string(),
            total: 0,
            entries: Vec::new(),
            groups: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["level"], "N5");
        assert!(json.get("entries").is_none());
        assert!(json.get("groups").is_none());
    }
}
