//! Command implementations for the Vimoji CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::catalog::{EmojiCatalog, Emotion};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::ensemble::{EngineConfig, Method, PaddingPolicy, SuggestionEngine};
use crate::error::{Result, VimojiError};
use crate::evaluation::{analyze_misses, compare_methods, load_samples};
use crate::inference::{EmotionClassifier, LexiconEmotionClassifier};

/// Execute a CLI command.
pub fn execute_command(args: VimojiArgs) -> Result<()> {
    match &args.command {
        Command::Suggest(suggest_args) => suggest(suggest_args, &args),
        Command::Batch(batch_args) => batch(batch_args, &args),
        Command::Evaluate(evaluate_args) => evaluate_dataset(evaluate_args, &args),
        Command::Preprocess(preprocess_args) => preprocess(preprocess_args, &args),
        Command::Emotions(emotions_args) => emotions(emotions_args, &args),
        Command::Stats => show_stats(&args),
    }
}

fn load_catalog(cli_args: &VimojiArgs) -> Result<Arc<EmojiCatalog>> {
    let catalog = match &cli_args.catalog {
        Some(path) => EmojiCatalog::from_file(path)?,
        None => EmojiCatalog::builtin()?,
    };
    Ok(Arc::new(catalog))
}

fn load_config(cli_args: &VimojiArgs) -> Result<EngineConfig> {
    match &cli_args.config {
        Some(path) => EngineConfig::from_file(path),
        None => Ok(EngineConfig::default()),
    }
}

fn build_engine(config: EngineConfig, cli_args: &VimojiArgs) -> Result<SuggestionEngine> {
    SuggestionEngine::offline(load_catalog(cli_args)?, config)
}

/// Suggest emojis for one text.
fn suggest(args: &SuggestArgs, cli_args: &VimojiArgs) -> Result<()> {
    let mut config = load_config(cli_args)?;
    if args.pad {
        config = config.with_padding(PaddingPolicy::Catalog);
    }
    if args.sequential {
        config = config.with_parallel(false);
    }
    let method = args.method.unwrap_or(config.default_method);
    let k = args.top_k.unwrap_or(config.top_k);
    let engine = build_engine(config, cli_args)?;

    if args.details {
        let details = engine.suggest_with_details(&args.text, method, k)?;
        output_result("Suggestion details", &details, cli_args)
    } else {
        let suggestions = engine.suggest(&args.text, method, k)?;
        output_result(
            "Suggestions",
            &SuggestOutput {
                text: args.text.clone(),
                method,
                suggestions,
            },
            cli_args,
        )
    }
}

/// Read texts from a plain or JSON Lines file.
fn read_texts(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut texts = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('{') {
            let record: Value = serde_json::from_str(trimmed)?;
            let text = record.get("text").and_then(Value::as_str).ok_or_else(|| {
                VimojiError::invalid_argument(format!(
                    "line {}: record has no \"text\" field",
                    line_num + 1
                ))
            })?;
            texts.push(text.to_string());
        } else {
            texts.push(trimmed.to_string());
        }
    }

    Ok(texts)
}

/// Suggest emojis for every text in a file.
fn batch(args: &BatchArgs, cli_args: &VimojiArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    let method = args.method.unwrap_or(config.default_method);
    let k = args.top_k.unwrap_or(config.top_k);
    let engine = build_engine(config, cli_args)?;

    let texts = read_texts(&args.input)?;
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let start_time = Instant::now();
    let results = engine.suggest_batch(&refs, method, k);
    let duration = start_time.elapsed();

    let mut failed = 0;
    let mut items = Vec::with_capacity(texts.len());
    for (text, result) in texts.iter().zip(results) {
        let item = match result {
            Ok(suggestions) => BatchItem {
                text: text.clone(),
                suggestions: Some(suggestions),
                error: None,
            },
            Err(e @ VimojiError::InvalidMethod(_)) => return Err(e),
            Err(e) => {
                failed += 1;
                BatchItem {
                    text: text.clone(),
                    suggestions: None,
                    error: Some(e.to_string()),
                }
            }
        };
        items.push(item);
    }

    output_result(
        "Batch suggestions",
        &BatchOutput {
            method,
            items,
            failed,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Evaluate one or all methods on a labelled dataset.
fn evaluate_dataset(args: &EvaluateArgs, cli_args: &VimojiArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    let default_method = config.default_method;
    let engine = build_engine(config, cli_args)?;
    let samples = load_samples(&args.dataset)?;
    if samples.is_empty() {
        return Err(VimojiError::invalid_argument(format!(
            "dataset {} contains no samples",
            args.dataset.display()
        )));
    }

    let methods: Vec<Method> = if args.compare {
        Method::ALL.to_vec()
    } else {
        vec![args.method.unwrap_or(default_method)]
    };

    let reports = compare_methods(&engine, &samples, &methods, args.top_k)?;
    let misses = if args.misses {
        methods
            .iter()
            .map(|method| analyze_misses(&engine, &samples, *method, args.top_k, args.max_misses))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    output_result(
        "Evaluation results",
        &EvaluationOutput {
            dataset: args.dataset.display().to_string(),
            reports,
            misses,
        },
        cli_args,
    )
}

/// Show the preprocessed form of texts.
fn preprocess(args: &PreprocessArgs, cli_args: &VimojiArgs) -> Result<()> {
    let engine = build_engine(load_config(cli_args)?, cli_args)?;
    let outputs: Vec<PreprocessOutput> = args
        .texts
        .iter()
        .map(|text| PreprocessOutput {
            original: text.clone(),
            preprocessed: engine.preprocess(text),
        })
        .collect();
    output_result("Preprocessed texts", &outputs, cli_args)
}

/// Classify the emotion of a text with the lexicon classifier.
fn emotions(args: &EmotionsArgs, cli_args: &VimojiArgs) -> Result<()> {
    let catalog = load_catalog(cli_args)?;
    let engine_config = load_config(cli_args)?;
    let engine = SuggestionEngine::builder(Arc::clone(&catalog))
        .config(engine_config)
        .with_keyword_scorer()
        .build()?;

    let classifier = LexiconEmotionClassifier::default();
    let classification = classifier.classify(&engine.preprocess(&args.text))?;
    let emotion: Emotion = classification.label.parse()?;

    output_result(
        "Detected emotion",
        &EmotionOutput {
            text: args.text.clone(),
            classifier: classifier.name().to_string(),
            emotion,
            confidence: classification.confidence,
            intensity: classification.intensity,
            emojis: catalog.emotion_group(emotion).to_vec(),
        },
        cli_args,
    )
}

/// Show catalog statistics.
fn show_stats(cli_args: &VimojiArgs) -> Result<()> {
    let engine = build_engine(load_config(cli_args)?, cli_args)?;
    let catalog = engine.catalog();

    let stats = CatalogStats {
        source: cli_args
            .catalog
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        emojis: catalog.len(),
        keywords: catalog.keywords().len(),
        emotion_groups: catalog
            .emotion_groups()
            .iter()
            .map(|(emotion, group)| (*emotion, group.len()))
            .collect(),
        scorers: engine
            .scorer_kinds()
            .iter()
            .map(|kind| kind.to_string())
            .collect(),
    };

    output_result("Catalog statistics", &stats, cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_texts_plain_and_jsonl() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Chúc mừng bạn!").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"text": "Buồn quá", "emoji_1": "😢"}}"#).unwrap();

        let texts = read_texts(file.path()).unwrap();
        assert_eq!(texts, vec!["Chúc mừng bạn!", "Buồn quá"]);
    }

    #[test]
    fn test_read_texts_requires_text_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"content": "x"}}"#).unwrap();
        assert!(read_texts(file.path()).is_err());
    }

    fn json_args(command: Command) -> VimojiArgs {
        VimojiArgs {
            verbose: 0,
            quiet: true,
            output_format: OutputFormat::Json,
            pretty: false,
            catalog: None,
            config: None,
            command,
        }
    }

    #[test]
    fn test_stats_command_runs() {
        assert!(execute_command(json_args(Command::Stats)).is_ok());
    }

    #[test]
    fn test_evaluate_command_with_comparison_and_misses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "Chúc mừng bạn!", "emoji_1": "😊"}}"#).unwrap();
        writeln!(file, r#"{{"text": "abc", "emoji_1": "🍕", "primary_emotion": "joy"}}"#).unwrap();

        let command = Command::Evaluate(EvaluateArgs {
            dataset: file.path().to_path_buf(),
            method: None,
            top_k: 3,
            compare: true,
            misses: true,
            max_misses: 5,
        });
        assert!(execute_command(json_args(command)).is_ok());
    }

    #[test]
    fn test_evaluate_command_rejects_empty_dataset() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let command = Command::Evaluate(EvaluateArgs {
            dataset: file.path().to_path_buf(),
            method: Some(Method::Keyword),
            top_k: 3,
            compare: false,
            misses: false,
            max_misses: 10,
        });
        assert!(execute_command(json_args(command)).is_err());
    }
}
