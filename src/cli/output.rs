//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Emotion;
use crate::cli::args::{OutputFormat, VimojiArgs};
use crate::ensemble::{Method, Suggestion, SuggestionDetails};
use crate::error::Result;
use crate::evaluation::{EvaluationReport, MissAnalysis};

/// Results that know how to print themselves for a terminal.
pub trait HumanReadable {
    fn print_human(&self, args: &VimojiArgs);
}

/// Result of the `suggest` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestOutput {
    pub text: String,
    pub method: Method,
    pub suggestions: Suggestion,
}

/// One line of the `batch` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of the `batch` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    pub method: Method,
    pub items: Vec<BatchItem>,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Result of the `evaluate` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub dataset: String,
    pub reports: Vec<EvaluationReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub misses: Vec<MissAnalysis>,
}

/// Result of the `preprocess` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreprocessOutput {
    pub original: String,
    pub preprocessed: String,
}

/// Result of the `emotions` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmotionOutput {
    pub text: String,
    pub classifier: String,
    pub emotion: Emotion,
    pub confidence: f32,
    pub intensity: Option<f32>,
    pub emojis: Vec<String>,
}

/// Result of the `stats` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogStats {
    pub source: String,
    pub emojis: usize,
    pub keywords: usize,
    pub emotion_groups: BTreeMap<Emotion, usize>,
    pub scorers: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &VimojiArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &VimojiArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn format_suggestion(suggestion: &Suggestion) -> String {
    if suggestion.is_empty() {
        return "(no suggestion)".to_string();
    }
    suggestion
        .iter()
        .map(|e| format!("{} {:.3}", e.symbol, e.score))
        .collect::<Vec<_>>()
        .join("  ")
}

impl HumanReadable for SuggestOutput {
    fn print_human(&self, args: &VimojiArgs) {
        if args.verbosity() > 1 {
            println!("Text:   {}", self.text);
            println!("Method: {}", self.method);
        }
        println!("{}", format_suggestion(&self.suggestions));
    }
}

impl HumanReadable for SuggestionDetails {
    fn print_human(&self, _args: &VimojiArgs) {
        println!("Text:         {}", self.text);
        println!("Preprocessed: {}", self.preprocessed_text);
        println!("Method:       {}", self.method);
        println!("Suggestions:  {}", format_suggestion(&self.suggestion));
        println!();

        for (kind, suggestion) in &self.method_suggestions {
            println!("  {:<10} {}", kind.as_str(), format_suggestion(suggestion));
        }
        for (kind, error) in &self.failed_methods {
            println!("  {:<10} FAILED: {error}", kind.as_str());
        }

        if let Some(emotion) = &self.emotion {
            println!();
            println!(
                "Emotion:      {} (confidence {:.3}, intensity {:.2})",
                emotion.emotion, emotion.confidence, emotion.intensity
            );
        }
        if !self.matched_keywords.is_empty() {
            println!("Keywords:     {}", self.matched_keywords.join(", "));
        }
        println!("Time:         {:.2} ms", self.elapsed_ms);
    }
}

impl HumanReadable for BatchOutput {
    fn print_human(&self, args: &VimojiArgs) {
        for item in &self.items {
            match (&item.suggestions, &item.error) {
                (Some(suggestions), _) => {
                    let symbols = suggestions.symbols().concat();
                    println!("{symbols}\t{}", item.text);
                }
                (None, Some(error)) => println!("ERROR\t{}\t{error}", item.text),
                (None, None) => println!("\t{}", item.text),
            }
        }
        if args.verbosity() > 0 {
            eprintln!(
                "{} texts, {} failed, {} ms",
                self.items.len(),
                self.failed,
                self.duration_ms
            );
        }
    }
}

impl HumanReadable for EvaluationOutput {
    fn print_human(&self, _args: &VimojiArgs) {
        println!("Dataset: {}", self.dataset);
        println!();
        println!(
            "{:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "method", "samples", "P@k", "R@k", "HR@k", "MRR", "nDCG@k", "Acc@1"
        );
        for report in &self.reports {
            println!(
                "{:<10} {:>8} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
                report.method.as_str(),
                report.num_samples,
                report.precision_at_k,
                report.recall_at_k,
                report.hit_rate_at_k,
                report.mrr,
                report.ndcg_at_k,
                report.accuracy_at_1
            );
        }

        for analysis in &self.misses {
            println!();
            println!(
                "Misses for {} (k={}): {} of {} ({:.1}%), avg length {:.1} words",
                analysis.method,
                analysis.k,
                analysis.total_misses,
                analysis.total_misses + analysis.total_hits,
                analysis.miss_rate * 100.0,
                analysis.avg_miss_text_length
            );
            for (emotion, count) in &analysis.misses_by_emotion {
                let rate = analysis.miss_rate_by_emotion.get(emotion).copied().unwrap_or(0.0);
                println!("  {emotion:<13} {count:>5} ({:.1}%)", rate * 100.0);
            }
            for sample in &analysis.samples {
                let predicted = match &sample.error {
                    Some(error) => format!("ERROR {error}"),
                    None => sample.predictions.concat(),
                };
                println!("  - {}  labels {}  predicted {predicted}", sample.text, sample.labels.concat());
            }
        }
    }
}

impl HumanReadable for PreprocessOutput {
    fn print_human(&self, args: &VimojiArgs) {
        if args.verbosity() > 1 {
            println!("{} => {}", self.original, self.preprocessed);
        } else {
            println!("{}", self.preprocessed);
        }
    }
}

impl<T: HumanReadable> HumanReadable for Vec<T> {
    fn print_human(&self, args: &VimojiArgs) {
        for item in self {
            item.print_human(args);
        }
    }
}

impl HumanReadable for EmotionOutput {
    fn print_human(&self, _args: &VimojiArgs) {
        match self.intensity {
            Some(intensity) => println!(
                "{} (confidence {:.3}, intensity {:.2})",
                self.emotion, self.confidence, intensity
            ),
            None => println!("{} (confidence {:.3})", self.emotion, self.confidence),
        }
        println!("{}", self.emojis.concat());
    }
}

impl HumanReadable for CatalogStats {
    fn print_human(&self, _args: &VimojiArgs) {
        println!("Catalog Statistics:");
        println!("═══════════════════");
        println!("Source:   {}", self.source);
        println!("Emojis:   {}", self.emojis);
        println!("Keywords: {}", self.keywords);
        println!("Scorers:  {}", self.scorers.join(", "));
        println!("Emotion groups:");
        for (emotion, size) in &self.emotion_groups {
            println!("  {:<13} {size}", emotion.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::ScoredEmoji;

    #[test]
    fn test_format_suggestion() {
        let suggestion = Suggestion::new(vec![ScoredEmoji::new("😊", 0.745), ScoredEmoji::new("🎉", 0.35)]);
        assert_eq!(format_suggestion(&suggestion), "😊 0.745  🎉 0.350");
        assert_eq!(format_suggestion(&Suggestion::default()), "(no suggestion)");
    }

    #[test]
    fn test_batch_item_json_skips_missing_fields() {
        let item = BatchItem {
            text: "vui".to_string(),
            suggestions: None,
            error: Some("No signal: all failed".to_string()),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"text":"vui","error":"No signal: all failed"}"#);
    }
}
