//! The suggestion entry point.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analysis::TextPreprocessor;
use crate::catalog::EmojiCatalog;
use crate::ensemble::combiner::{EnsembleCombiner, Outcomes, ScorerOutcome};
use crate::ensemble::config::EngineConfig;
use crate::ensemble::method::Method;
use crate::ensemble::normalizer::ScoreNormalizer;
use crate::ensemble::ranker::{Ranker, order_by_score};
use crate::ensemble::types::{DetectedEmotion, ScoredEmoji, Suggestion, SuggestionDetails};
use crate::error::{Result, VimojiError};
use crate::inference::{
    EmotionClassifier, HashedNgramEmbedder, LexiconEmotionClassifier, TextEmbedder,
};
use crate::scorer::{
    DeadlineScorer, Evidence, KeywordScorer, ScoreReport, Scorer, ScorerKind, SemanticScorer,
    SentimentScorer,
};

/// Everything one request produced before it was shaped into a response.
struct Execution {
    preprocessed: String,
    outcomes: Outcomes,
    evidence: BTreeMap<ScorerKind, Evidence>,
    suggestion: Suggestion,
}

/// Suggests emojis for text by combining keyword, sentiment and semantic
/// scorers.
///
/// The engine is immutable after construction and can be shared between
/// threads behind an `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vimoji::catalog::EmojiCatalog;
/// use vimoji::ensemble::{EngineConfig, Method, SuggestionEngine};
///
/// let catalog = Arc::new(EmojiCatalog::builtin().unwrap());
/// let engine = SuggestionEngine::offline(catalog, EngineConfig::default()).unwrap();
///
/// let suggestion = engine.suggest("Chúc mừng bạn!", Method::Keyword, 3).unwrap();
/// assert_eq!(suggestion.symbols(), vec!["😊", "🎉", "🥳"]);
/// ```
pub struct SuggestionEngine {
    config: EngineConfig,
    catalog: Arc<EmojiCatalog>,
    preprocessor: TextPreprocessor,
    scorers: BTreeMap<ScorerKind, Arc<dyn Scorer>>,
    normalizer: ScoreNormalizer,
    combiner: EnsembleCombiner,
    ranker: Ranker,
}

impl SuggestionEngine {
    /// Start building an engine over `catalog`.
    pub fn builder(catalog: Arc<EmojiCatalog>) -> SuggestionEngineBuilder {
        SuggestionEngineBuilder::new(catalog)
    }

    /// Engine with all three scorers on the bundled offline backends.
    pub fn offline(catalog: Arc<EmojiCatalog>, config: EngineConfig) -> Result<Self> {
        Self::builder(catalog)
            .config(config)
            .with_keyword_scorer()
            .with_classifier(Arc::new(LexiconEmotionClassifier::default()))
            .with_embedder(Arc::new(HashedNgramEmbedder::default()))
            .build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<EmojiCatalog> {
        &self.catalog
    }

    /// Configured scorers, in canonical order.
    pub fn scorer_kinds(&self) -> Vec<ScorerKind> {
        self.scorers.keys().copied().collect()
    }

    pub fn has_scorer(&self, kind: ScorerKind) -> bool {
        self.scorers.contains_key(&kind)
    }

    /// Apply the configured preprocessing to `text`.
    pub fn preprocess(&self, text: &str) -> String {
        if self.config.preprocess {
            self.preprocessor.preprocess(text)
        } else {
            text.to_string()
        }
    }

    /// Suggest at most `k` emojis for `text`.
    ///
    /// # Errors
    ///
    /// - [`VimojiError::InvalidMethod`] when `method` needs a scorer that is
    ///   not configured. No scorer runs in that case.
    /// - [`VimojiError::NoSignal`] when every scorer the method ran failed.
    pub fn suggest(&self, text: &str, method: Method, k: usize) -> Result<Suggestion> {
        Ok(self.execute(text, method, k)?.suggestion)
    }

    /// Suggest with the configured default method and `top_k`.
    pub fn suggest_default(&self, text: &str) -> Result<Suggestion> {
        self.suggest(text, self.config.default_method, self.config.top_k)
    }

    /// Suggest and report each scorer's contribution.
    pub fn suggest_with_details(
        &self,
        text: &str,
        method: Method,
        k: usize,
    ) -> Result<SuggestionDetails> {
        let start = Instant::now();
        let execution = self.execute(text, method, k)?;

        let mut method_suggestions = BTreeMap::new();
        let mut failed_methods = BTreeMap::new();
        for (kind, outcome) in &execution.outcomes {
            match outcome {
                ScorerOutcome::Scored(vector) => {
                    let emojis = order_by_score(&self.catalog, vector.as_scores())
                        .into_iter()
                        .take(k)
                        .map(|(symbol, score)| ScoredEmoji::new(symbol, score))
                        .collect();
                    method_suggestions.insert(*kind, Suggestion::new(emojis));
                }
                ScorerOutcome::Failed(message) => {
                    failed_methods.insert(*kind, message.clone());
                }
            }
        }

        let mut emotion = None;
        let mut matched_keywords = Vec::new();
        for evidence in execution.evidence.into_values() {
            match evidence {
                Evidence::Emotion {
                    emotion: detected,
                    confidence,
                    intensity,
                } => {
                    emotion = Some(DetectedEmotion {
                        emotion: detected,
                        confidence,
                        intensity,
                    });
                }
                Evidence::Keywords { phrases } => matched_keywords = phrases,
                Evidence::None => {}
            }
        }

        Ok(SuggestionDetails {
            text: text.to_string(),
            preprocessed_text: execution.preprocessed,
            method,
            suggestion: execution.suggestion,
            method_suggestions,
            failed_methods,
            emotion,
            matched_keywords,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Suggest for many texts. Each input gets its own result.
    pub fn suggest_batch(&self, texts: &[&str], method: Method, k: usize) -> Vec<Result<Suggestion>> {
        if self.config.parallel {
            texts
                .par_iter()
                .map(|text| self.suggest(text, method, k))
                .collect()
        } else {
            texts
                .iter()
                .map(|text| self.suggest(text, method, k))
                .collect()
        }
    }

    /// Scorers `method` runs on this engine.
    fn plan(&self, method: Method) -> Result<Vec<ScorerKind>> {
        if let Some(kind) = method.passthrough() {
            if !self.scorers.contains_key(&kind) {
                return Err(VimojiError::invalid_method(format!(
                    "method '{method}' needs the {kind} scorer, which is not configured"
                )));
            }
            return Ok(vec![kind]);
        }

        let kinds: Vec<ScorerKind> = method
            .scorers()
            .iter()
            .copied()
            .filter(|kind| self.scorers.contains_key(kind))
            .collect();
        if kinds.is_empty() {
            return Err(VimojiError::invalid_method(format!(
                "method '{method}' has no configured scorer"
            )));
        }
        Ok(kinds)
    }

    fn execute(&self, text: &str, method: Method, k: usize) -> Result<Execution> {
        if k == 0 {
            return Err(VimojiError::invalid_argument("k must be greater than 0"));
        }
        let kinds = self.plan(method)?;

        let start = Instant::now();
        let preprocessed = self.preprocess(text);

        let mut outcomes = Outcomes::new();
        let mut evidence = BTreeMap::new();
        for (kind, report) in self.run_scorers(&preprocessed, &kinds) {
            match report {
                Ok(report) => {
                    outcomes.insert(kind, ScorerOutcome::Scored(self.normalizer.normalize(&report.scores)));
                    evidence.insert(kind, report.evidence);
                }
                Err(e) if e.is_inference() => {
                    warn!(scorer = %kind, error = %e, "scorer failed, continuing without it");
                    outcomes.insert(kind, ScorerOutcome::Failed(e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        let combined = self.combiner.combine(method, &outcomes)?;
        let suggestion = self.ranker.rank(&combined, k);

        debug!(
            %method,
            k,
            results = suggestion.len(),
            failed = outcomes.values().filter(|o| o.is_failed()).count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "suggestion computed"
        );

        Ok(Execution {
            preprocessed,
            outcomes,
            evidence,
            suggestion,
        })
    }

    /// Run the scorers of `kinds` on `text`, in parallel when configured.
    fn run_scorers(&self, text: &str, kinds: &[ScorerKind]) -> Vec<(ScorerKind, Result<ScoreReport>)> {
        let mut slots: Vec<(ScorerKind, &Arc<dyn Scorer>, Option<Result<ScoreReport>>)> = kinds
            .iter()
            .filter_map(|kind| self.scorers.get(kind).map(|scorer| (*kind, scorer, None)))
            .collect();

        if self.config.parallel && slots.len() > 1 {
            rayon::scope(|scope| {
                for (_, scorer, slot) in slots.iter_mut() {
                    let scorer = Arc::clone(scorer);
                    scope.spawn(move |_| {
                        *slot = Some(scorer.score_detailed(text));
                    });
                }
            });
        } else {
            for (_, scorer, slot) in slots.iter_mut() {
                *slot = Some(scorer.score_detailed(text));
            }
        }

        slots
            .into_iter()
            .map(|(kind, _, slot)| {
                let report = slot.unwrap_or_else(|| {
                    Err(VimojiError::inference(format!("{kind} scorer did not run")))
                });
                (kind, report)
            })
            .collect()
    }
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("config", &self.config)
            .field("catalog_size", &self.catalog.len())
            .field("scorers", &self.scorer_kinds())
            .finish()
    }
}

/// Builder for [`SuggestionEngine`].
pub struct SuggestionEngineBuilder {
    catalog: Arc<EmojiCatalog>,
    config: EngineConfig,
    keyword: bool,
    classifier: Option<Arc<dyn EmotionClassifier>>,
    embedder: Option<Arc<dyn TextEmbedder>>,
    custom: Vec<Arc<dyn Scorer>>,
}

impl SuggestionEngineBuilder {
    pub fn new(catalog: Arc<EmojiCatalog>) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
            keyword: false,
            classifier: None,
            embedder: None,
            custom: Vec::new(),
        }
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add the keyword scorer over the catalog's keyword table.
    pub fn with_keyword_scorer(mut self) -> Self {
        self.keyword = true;
        self
    }

    /// Add a sentiment scorer backed by `classifier`.
    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Add a semantic scorer backed by `embedder`.
    pub fn with_embedder(mut self, embedder: Arc<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Add a custom scorer. It replaces any other scorer of the same kind.
    ///
    /// Custom sentiment and semantic scorers run under the configured
    /// scorer timeout, like the built-in ones. Keyword scorers are local and
    /// run unguarded.
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.custom.push(scorer);
        self
    }

    /// Validate the configuration and assemble the engine.
    ///
    /// Description embeddings for the semantic scorer are computed here.
    pub fn build(self) -> Result<SuggestionEngine> {
        self.config.validate()?;
        let timeout = self.config.scorer_timeout();

        let mut scorers: BTreeMap<ScorerKind, Arc<dyn Scorer>> = BTreeMap::new();
        if self.keyword {
            scorers.insert(
                ScorerKind::Keyword,
                Arc::new(KeywordScorer::new(Arc::clone(&self.catalog))),
            );
        }
        if let Some(classifier) = self.classifier {
            let scorer =
                SentimentScorer::new(Arc::clone(&self.catalog), classifier).with_timeout(timeout);
            scorers.insert(ScorerKind::Sentiment, Arc::new(scorer));
        }
        if let Some(embedder) = self.embedder {
            let scorer =
                SemanticScorer::new(Arc::clone(&self.catalog), embedder)?.with_timeout(timeout);
            scorers.insert(ScorerKind::Semantic, Arc::new(scorer));
        }
        for scorer in self.custom {
            let kind = scorer.kind();
            let scorer: Arc<dyn Scorer> = match timeout {
                Some(timeout) if kind != ScorerKind::Keyword => {
                    Arc::new(DeadlineScorer::new(scorer, timeout))
                }
                _ => scorer,
            };
            scorers.insert(kind, scorer);
        }

        if scorers.is_empty() {
            return Err(VimojiError::config("no scorer configured"));
        }

        Ok(SuggestionEngine {
            preprocessor: TextPreprocessor::new(self.config.preprocessor.clone()),
            normalizer: ScoreNormalizer::new(),
            combiner: EnsembleCombiner::new(Arc::clone(&self.catalog), self.config.weights),
            ranker: Ranker::new(Arc::clone(&self.catalog), self.config.padding),
            scorers,
            catalog: self.catalog,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::ranker::PaddingPolicy;

    fn engine(config: EngineConfig) -> SuggestionEngine {
        SuggestionEngine::offline(Arc::new(EmojiCatalog::builtin().unwrap()), config).unwrap()
    }

    #[test]
    fn test_offline_engine_has_all_scorers() {
        let engine = engine(EngineConfig::default());
        assert_eq!(engine.scorer_kinds(), ScorerKind::ALL.to_vec());
    }

    #[test]
    fn test_keyword_passthrough() {
        let suggestion = engine(EngineConfig::default())
            .suggest("Chúc mừng bạn!", Method::Keyword, 3)
            .unwrap();
        assert_eq!(suggestion.symbols(), vec!["😊", "🎉", "🥳"]);
        assert_eq!(suggestion.emojis()[0].score, 1.0);
    }

    #[test]
    fn test_weighted_results_bounded_and_sorted() {
        let engine = engine(EngineConfig::default());
        for method in Method::ALL {
            let suggestion = engine.suggest("Buồn quá, nhớ nhà ghê", method, 3).unwrap();
            assert!(suggestion.len() <= 3);
            let scores: Vec<f32> = suggestion.iter().map(|e| e.score).collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{method}: {scores:?}");
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let parallel = engine(EngineConfig::default());
        let sequential = engine(EngineConfig::default().with_parallel(false));
        let text = "Hôm nay thi xong rồi, vui quá!";
        assert_eq!(
            parallel.suggest(text, Method::Weighted, 5).unwrap(),
            sequential.suggest(text, Method::Weighted, 5).unwrap()
        );
    }

    #[test]
    fn test_details() {
        let details = engine(EngineConfig::default())
            .suggest_with_details("Chúc mừng sinh nhật bạn!!! 🎂", Method::Weighted, 3)
            .unwrap();
        assert_eq!(details.preprocessed_text, "chúc mừng sinh nhật bạn!!");
        assert_eq!(details.matched_keywords, vec!["chúc mừng", "sinh nhật"]);
        assert_eq!(details.emotion.map(|e| e.emotion), Some(crate::catalog::Emotion::Joy));
        assert_eq!(details.method_suggestions.len(), 3);
        assert!(!details.is_degraded());
        assert_eq!(details.suggestion.len(), 3);
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(engine(EngineConfig::default()).suggest("vui", Method::Weighted, 0).is_err());
    }

    #[test]
    fn test_empty_text_with_padding() {
        let padded = engine(EngineConfig::default().with_padding(PaddingPolicy::Catalog));
        assert_eq!(padded.suggest("", Method::Keyword, 3).unwrap().symbols(), vec!["😊", "😄", "😁"]);

        let unpadded = engine(EngineConfig::default());
        assert!(unpadded.suggest("", Method::Keyword, 3).unwrap().is_empty());
    }

    #[test]
    fn test_missing_scorer_is_invalid_method() {
        let engine = SuggestionEngine::builder(Arc::new(EmojiCatalog::builtin().unwrap()))
            .with_keyword_scorer()
            .build()
            .unwrap();
        let err = engine.suggest("vui", Method::Semantic, 3).unwrap_err();
        assert!(matches!(err, VimojiError::InvalidMethod(_)));
        assert!(engine.suggest("vui", Method::Weighted, 3).is_ok());
    }

    #[test]
    fn test_builder_without_scorers() {
        let result = SuggestionEngine::builder(Arc::new(EmojiCatalog::builtin().unwrap())).build();
        assert!(matches!(result, Err(VimojiError::Config(_))));
    }

    #[test]
    fn test_batch() {
        let engine = engine(EngineConfig::default());
        let results = engine.suggest_batch(&["vui quá", "buồn quá"], Method::Keyword, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().top().unwrap().symbol, "😊");
        assert_eq!(results[1].as_ref().unwrap().top().unwrap().symbol, "😢");
    }
}
