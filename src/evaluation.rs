//! Offline evaluation of suggestion quality.
//!
//! A labelled dataset is a JSON Lines file of records
//! `{"text": ..., "emoji_1": ..., "emoji_2": ..., "emoji_3": ...}` where the
//! second and third labels are optional. Records may also carry a
//! `primary_emotion`, used to break misses down by emotion. All metrics use
//! binary relevance: a suggested emoji is relevant when it is one of the
//! labels.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Emotion;
use crate::ensemble::{Method, SuggestionEngine};
use crate::error::{Result, VimojiError};

/// One labelled example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub text: String,
    pub emoji_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_emotion: Option<Emotion>,
}

impl LabeledSample {
    pub fn new<S: Into<String>>(text: S, labels: &[&str]) -> Self {
        let label = |i: usize| labels.get(i).map(|l| l.to_string());
        Self {
            text: text.into(),
            emoji_1: label(0).unwrap_or_default(),
            emoji_2: label(1),
            emoji_3: label(2),
            primary_emotion: None,
        }
    }

    /// Annotate the sample with the emotion it expresses.
    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.primary_emotion = Some(emotion);
        self
    }

    /// Non-empty labels, in order.
    pub fn labels(&self) -> Vec<&str> {
        [
            Some(self.emoji_1.as_str()),
            self.emoji_2.as_deref(),
            self.emoji_3.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect()
    }
}

/// Read a JSON Lines dataset. Blank lines are skipped.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledSample>> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: LabeledSample = serde_json::from_str(&line).map_err(|e| {
            VimojiError::invalid_argument(format!("line {}: {e}", line_number + 1))
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Fraction of the first `k` predictions that are relevant.
pub fn precision_at_k(labels: &[&str], predictions: &[&str], k: usize) -> f64 {
    let considered = &predictions[..predictions.len().min(k)];
    if considered.is_empty() {
        return 0.0;
    }
    hits(labels, considered) as f64 / considered.len() as f64
}

/// Fraction of the labels found in the first `k` predictions.
pub fn recall_at_k(labels: &[&str], predictions: &[&str], k: usize) -> f64 {
    let distinct: HashSet<&str> = labels.iter().copied().collect();
    if distinct.is_empty() {
        return 0.0;
    }
    let considered = &predictions[..predictions.len().min(k)];
    hits(labels, considered) as f64 / distinct.len() as f64
}

/// 1.0 when any of the first `k` predictions is relevant.
pub fn hit_rate_at_k(labels: &[&str], predictions: &[&str], k: usize) -> f64 {
    let considered = &predictions[..predictions.len().min(k)];
    if hits(labels, considered) > 0 { 1.0 } else { 0.0 }
}

/// Inverse rank of the first relevant prediction.
pub fn reciprocal_rank(labels: &[&str], predictions: &[&str]) -> f64 {
    predictions
        .iter()
        .position(|prediction| labels.contains(prediction))
        .map(|index| 1.0 / (index + 1) as f64)
        .unwrap_or(0.0)
}

/// Normalized discounted cumulative gain of the first `k` predictions.
pub fn ndcg_at_k(labels: &[&str], predictions: &[&str], k: usize) -> f64 {
    let dcg: f64 = predictions
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, prediction)| labels.contains(prediction))
        .map(|(index, _)| 1.0 / ((index + 2) as f64).log2())
        .sum();

    let ideal: f64 = (0..labels.len().min(k))
        .map(|index| 1.0 / ((index + 2) as f64).log2())
        .sum();

    if ideal == 0.0 { 0.0 } else { dcg / ideal }
}

fn hits(labels: &[&str], predictions: &[&str]) -> usize {
    let relevant: HashSet<&str> = labels.iter().copied().collect();
    let predicted: HashSet<&str> = predictions.iter().copied().collect();
    relevant.intersection(&predicted).count()
}

/// Averaged metrics over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub method: Method,
    pub k: usize,
    pub num_samples: usize,
    /// Samples whose suggestion failed; they count as zero on every metric.
    pub failed_samples: usize,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub hit_rate_at_k: f64,
    pub mrr: f64,
    pub ndcg_at_k: f64,
    pub accuracy_at_1: f64,
}

/// Run `engine` over `samples` and average the metrics.
pub fn evaluate(
    engine: &SuggestionEngine,
    samples: &[LabeledSample],
    method: Method,
    k: usize,
) -> Result<EvaluationReport> {
    if k == 0 {
        return Err(VimojiError::invalid_argument("k must be greater than 0"));
    }

    let texts: Vec<&str> = samples.iter().map(|sample| sample.text.as_str()).collect();
    let results = engine.suggest_batch(&texts, method, k);

    let mut totals = [0.0f64; 6];
    let mut failed_samples = 0;
    for (sample, result) in samples.iter().zip(results) {
        let suggestion = match result {
            Ok(suggestion) => suggestion,
            Err(e @ VimojiError::InvalidMethod(_)) => return Err(e),
            Err(_) => {
                failed_samples += 1;
                continue;
            }
        };

        let labels = sample.labels();
        let predictions = suggestion.symbols();
        totals[0] += precision_at_k(&labels, &predictions, k);
        totals[1] += recall_at_k(&labels, &predictions, k);
        totals[2] += hit_rate_at_k(&labels, &predictions, k);
        totals[3] += reciprocal_rank(&labels, &predictions);
        totals[4] += ndcg_at_k(&labels, &predictions, k);
        totals[5] += hit_rate_at_k(&labels, &predictions, 1);
    }

    let count = samples.len().max(1) as f64;
    let report = EvaluationReport {
        method,
        k,
        num_samples: samples.len(),
        failed_samples,
        precision_at_k: totals[0] / count,
        recall_at_k: totals[1] / count,
        hit_rate_at_k: totals[2] / count,
        mrr: totals[3] / count,
        ndcg_at_k: totals[4] / count,
        accuracy_at_1: totals[5] / count,
    };

    info!(
        %method,
        k,
        samples = report.num_samples,
        precision = report.precision_at_k,
        "evaluation finished"
    );

    Ok(report)
}

/// Evaluate several methods on the same samples, in the given order.
///
/// Fails on the first method the engine cannot run.
pub fn compare_methods(
    engine: &SuggestionEngine,
    samples: &[LabeledSample],
    methods: &[Method],
    k: usize,
) -> Result<Vec<EvaluationReport>> {
    methods
        .iter()
        .map(|method| evaluate(engine, samples, *method, k))
        .collect()
}

/// Default number of misses kept by [`analyze_misses`].
pub const DEFAULT_MISS_SAMPLES: usize = 10;

/// A sample without any label in the top `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedSample {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    pub labels: Vec<String>,
    pub predictions: Vec<String>,
    /// Set when the suggestion itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Breakdown of the samples a method misses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissAnalysis {
    pub method: Method,
    pub k: usize,
    pub total_misses: usize,
    pub total_hits: usize,
    pub miss_rate: f64,
    /// Misses per primary emotion; samples without one count as `unknown`.
    pub misses_by_emotion: BTreeMap<String, usize>,
    pub miss_rate_by_emotion: BTreeMap<String, f64>,
    /// Mean word count of the missed texts.
    pub avg_miss_text_length: f64,
    /// The first misses, in dataset order.
    pub samples: Vec<MissedSample>,
}

/// List the samples with no hit in the top `k` and group them by emotion.
///
/// A failed suggestion counts as a miss. At most `max_samples` misses are
/// kept in [`MissAnalysis::samples`]; the counts cover all of them.
pub fn analyze_misses(
    engine: &SuggestionEngine,
    samples: &[LabeledSample],
    method: Method,
    k: usize,
    max_samples: usize,
) -> Result<MissAnalysis> {
    if k == 0 {
        return Err(VimojiError::invalid_argument("k must be greater than 0"));
    }

    let texts: Vec<&str> = samples.iter().map(|sample| sample.text.as_str()).collect();
    let results = engine.suggest_batch(&texts, method, k);

    let mut misses = Vec::new();
    let mut hits_by_emotion: BTreeMap<String, usize> = BTreeMap::new();
    for (sample, result) in samples.iter().zip(results) {
        let labels = sample.labels();
        let (predictions, error) = match result {
            Ok(suggestion) => (
                suggestion.symbols().into_iter().map(String::from).collect::<Vec<_>>(),
                None,
            ),
            Err(e @ VimojiError::InvalidMethod(_)) => return Err(e),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        let predicted: Vec<&str> = predictions.iter().map(String::as_str).collect();
        if error.is_none() && hit_rate_at_k(&labels, &predicted, k) > 0.0 {
            *hits_by_emotion.entry(emotion_key(sample)).or_default() += 1;
            continue;
        }

        misses.push(MissedSample {
            text: sample.text.clone(),
            emotion: sample.primary_emotion,
            labels: labels.iter().map(|label| label.to_string()).collect(),
            predictions,
            error,
        });
    }

    let mut misses_by_emotion: BTreeMap<String, usize> = BTreeMap::new();
    for miss in &misses {
        let key = miss.emotion.map_or_else(|| "unknown".to_string(), |e| e.to_string());
        *misses_by_emotion.entry(key).or_default() += 1;
    }

    let miss_rate_by_emotion = misses_by_emotion
        .keys()
        .chain(hits_by_emotion.keys())
        .map(|key| {
            let missed = misses_by_emotion.get(key).copied().unwrap_or(0);
            let hit = hits_by_emotion.get(key).copied().unwrap_or(0);
            (key.clone(), missed as f64 / (missed + hit) as f64)
        })
        .collect();

    let avg_miss_text_length = if misses.is_empty() {
        0.0
    } else {
        misses
            .iter()
            .map(|miss| miss.text.split_whitespace().count())
            .sum::<usize>() as f64
            / misses.len() as f64
    };

    let total_misses = misses.len();
    let total_hits = samples.len() - total_misses;
    misses.truncate(max_samples);

    info!(%method, k, misses = total_misses, hits = total_hits, "miss analysis finished");

    Ok(MissAnalysis {
        method,
        k,
        total_misses,
        total_hits,
        miss_rate: if samples.is_empty() {
            0.0
        } else {
            total_misses as f64 / samples.len() as f64
        },
        misses_by_emotion,
        miss_rate_by_emotion,
        avg_miss_text_length,
        samples: misses,
    })
}

fn emotion_key(sample: &LabeledSample) -> String {
    sample
        .primary_emotion
        .map_or_else(|| "unknown".to_string(), |emotion| emotion.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LABELS: [&str; 3] = ["😊", "🎉", "🥳"];

    #[test]
    fn test_precision_and_recall() {
        let predictions = ["😊", "😢", "🥳"];
        assert!((precision_at_k(&LABELS, &predictions, 3) - 2.0 / 3.0).abs() < 1e-9);
        assert!((recall_at_k(&LABELS, &predictions, 3) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(precision_at_k(&LABELS, &predictions, 1), 1.0);
        // Fewer predictions than k: precision is over what was predicted.
        assert_eq!(precision_at_k(&LABELS, &["😊"], 3), 1.0);
        assert_eq!(precision_at_k(&LABELS, &[], 3), 0.0);
    }

    #[test]
    fn test_hit_rate_and_reciprocal_rank() {
        assert_eq!(hit_rate_at_k(&LABELS, &["😢", "🎉"], 2), 1.0);
        assert_eq!(hit_rate_at_k(&LABELS, &["😢", "🎉"], 1), 0.0);
        assert_eq!(reciprocal_rank(&LABELS, &["😢", "🎉"]), 0.5);
        assert_eq!(reciprocal_rank(&LABELS, &["😢"]), 0.0);
    }

    #[test]
    fn test_ndcg() {
        assert!((ndcg_at_k(&LABELS, &LABELS, 3) - 1.0).abs() < 1e-9);
        let partial = ndcg_at_k(&LABELS, &["😢", "😊"], 3);
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(ndcg_at_k(&[], &["😊"], 3), 0.0);
    }

    #[test]
    fn test_labels_skip_missing_and_blank() {
        let sample: LabeledSample =
            serde_json::from_str(r#"{"text": "vui", "emoji_1": "😊", "emoji_2": " "}"#).unwrap();
        assert_eq!(sample.labels(), vec!["😊"]);
    }

    #[test]
    fn test_load_samples() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "Chúc mừng bạn!", "emoji_1": "😊", "emoji_2": "🎉", "emoji_3": "🥳"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"text": "Buồn quá", "emoji_1": "😢"}}"#).unwrap();

        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].labels(), vec!["😢"]);
    }

    #[test]
    fn test_load_samples_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "ok", "emoji_1": "👍"}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        let err = load_samples(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_evaluate_keyword_method() {
        let catalog = std::sync::Arc::new(crate::catalog::EmojiCatalog::builtin().unwrap());
        let engine =
            SuggestionEngine::offline(catalog, crate::ensemble::EngineConfig::default()).unwrap();
        let samples = vec![
            LabeledSample::new("Chúc mừng bạn!", &["😊", "🎉", "🥳"]),
            LabeledSample::new("Buồn quá", &["😢"]),
        ];

        let report = evaluate(&engine, &samples, Method::Keyword, 3).unwrap();
        assert_eq!(report.num_samples, 2);
        assert_eq!(report.failed_samples, 0);
        assert_eq!(report.accuracy_at_1, 1.0);
        assert_eq!(report.hit_rate_at_k, 1.0);
        assert_eq!(report.mrr, 1.0);
        assert!((report.precision_at_k - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-9);
    }

    fn offline_engine() -> SuggestionEngine {
        let catalog = std::sync::Arc::new(crate::catalog::EmojiCatalog::builtin().unwrap());
        SuggestionEngine::offline(catalog, crate::ensemble::EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_compare_methods_keeps_order() {
        let engine = offline_engine();
        let samples = vec![
            LabeledSample::new("Chúc mừng bạn!", &["😊", "🎉", "🥳"]),
            LabeledSample::new("Buồn quá", &["😢"]),
        ];

        let reports = compare_methods(&engine, &samples, &Method::ALL, 3).unwrap();
        let methods: Vec<Method> = reports.iter().map(|report| report.method).collect();
        assert_eq!(methods, Method::ALL.to_vec());
        assert!(reports.iter().all(|report| report.num_samples == 2));

        let keyword = evaluate(&engine, &samples, Method::Keyword, 3).unwrap();
        assert_eq!(reports[1], keyword);
    }

    #[test]
    fn test_analyze_misses() {
        let engine = offline_engine();
        let samples = vec![
            LabeledSample::new("Chúc mừng bạn!", &["😊"]).with_emotion(Emotion::Joy),
            LabeledSample::new("xin chào mọi người", &["🙏"]).with_emotion(Emotion::Joy),
            LabeledSample::new("abc xyz", &["🍕"]),
        ];

        let analysis = analyze_misses(&engine, &samples, Method::Keyword, 3, 1).unwrap();
        assert_eq!(analysis.total_hits, 1);
        assert_eq!(analysis.total_misses, 2);
        assert!((analysis.miss_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(analysis.misses_by_emotion.get("joy"), Some(&1));
        assert_eq!(analysis.misses_by_emotion.get("unknown"), Some(&1));
        assert_eq!(analysis.miss_rate_by_emotion.get("joy"), Some(&0.5));
        assert!((analysis.avg_miss_text_length - 3.0).abs() < 1e-9);
        // Counts cover every miss, the sample list is capped.
        assert_eq!(analysis.samples.len(), 1);
        assert_eq!(analysis.samples[0].text, "xin chào mọi người");
        assert!(analysis.samples[0].predictions.is_empty());
    }

    #[test]
    fn test_primary_emotion_is_optional() {
        let sample: LabeledSample = serde_json::from_str(
            r#"{"text": "sợ quá", "emoji_1": "😱", "primary_emotion": "fear"}"#,
        )
        .unwrap();
        assert_eq!(sample.primary_emotion, Some(Emotion::Fear));
        let plain = LabeledSample::new("vui", &["😊"]);
        assert!(!serde_json::to_string(&plain).unwrap().contains("primary_emotion"));
    }
}
