//! Command line argument parsing for the Vimoji CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::ensemble::Method;

/// Vimoji - ensemble emoji suggestion for Vietnamese text
#[derive(Parser, Debug, Clone)]
#[command(name = "vimoji")]
#[command(about = "Suggest emojis for Vietnamese text with a keyword/sentiment/semantic ensemble")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VimojiArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Emoji catalog file (JSON); the built-in catalog is used when omitted
    #[arg(long, env = "VIMOJI_CATALOG", value_name = "CATALOG_FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(long, env = "VIMOJI_CONFIG", value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl VimojiArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Suggest emojis for a text
    Suggest(SuggestArgs),

    /// Suggest emojis for every line of a file
    Batch(BatchArgs),

    /// Score suggestions against a labelled dataset
    Evaluate(EvaluateArgs),

    /// Show the preprocessed form of a text
    Preprocess(PreprocessArgs),

    /// Detect the emotion of a text and show its emoji group
    Emotions(EmotionsArgs),

    /// Show catalog statistics
    Stats,
}

/// Arguments for suggesting
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Text to suggest emojis for
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Suggestion method (weighted, keyword, sentiment, semantic, max, voting)
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Number of suggestions
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Include per-method results, detected emotion and matched keywords
    #[arg(long)]
    pub details: bool,

    /// Fill up to k suggestions with catalog emojis
    #[arg(long)]
    pub pad: bool,

    /// Run scorers one after another
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for batch suggestion
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Input file: one text per line, or JSON Lines records with a "text" field
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Suggestion method
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Number of suggestions per text
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Dataset file (JSON Lines with text, emoji_1, emoji_2, emoji_3)
    #[arg(value_name = "DATASET_FILE")]
    pub dataset: PathBuf,

    /// Suggestion method; ignored with --compare
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Cut-off for the @k metrics
    #[arg(short = 'k', long, default_value = "3")]
    pub top_k: usize,

    /// Evaluate every method
    #[arg(long)]
    pub compare: bool,

    /// Also list the samples with no correct emoji in the top k
    #[arg(long)]
    pub misses: bool,

    /// Maximum number of missed samples to show per method
    #[arg(long, default_value = "10")]
    pub max_misses: usize,
}

/// Arguments for preprocessing
#[derive(Parser, Debug, Clone)]
pub struct PreprocessArgs {
    /// Texts to preprocess
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Arguments for emotion detection
#[derive(Parser, Debug, Clone)]
pub struct EmotionsArgs {
    /// Text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_args() {
        let args = VimojiArgs::parse_from([
            "vimoji", "suggest", "Chúc mừng bạn!", "-m", "voting", "-k", "5", "--details",
        ]);
        match args.command {
            Command::Suggest(suggest) => {
                assert_eq!(suggest.text, "Chúc mừng bạn!");
                assert_eq!(suggest.method, Some(Method::Voting));
                assert_eq!(suggest.top_k, Some(5));
                assert!(suggest.details);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = VimojiArgs::try_parse_from(["vimoji", "suggest", "vui", "-m", "random"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = VimojiArgs::parse_from(["vimoji", "stats"]);
        assert_eq!(args.verbosity(), 1);
        let args = VimojiArgs::parse_from(["vimoji", "-vv", "stats"]);
        assert_eq!(args.verbosity(), 3);
        let args = VimojiArgs::parse_from(["vimoji", "-q", "-v", "stats"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_evaluate_args() {
        let args = VimojiArgs::parse_from(["vimoji", "evaluate", "test.jsonl", "--compare", "--misses"]);
        match args.command {
            Command::Evaluate(evaluate) => {
                assert!(evaluate.compare);
                assert!(evaluate.misses);
                assert_eq!(evaluate.max_misses, 10);
                assert_eq!(evaluate.top_k, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_format_flag() {
        let args = VimojiArgs::parse_from(["vimoji", "stats", "-f", "json", "--pretty"]);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
    }
}
