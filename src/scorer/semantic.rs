//! Semantic scorer.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::catalog::EmojiCatalog;
use crate::error::{Result, VimojiError};
use crate::inference::{TextEmbedder, call_with_timeout, cosine_similarity};
use crate::scorer::Scorer;
use crate::scorer::types::{ScoreVector, ScorerKind};

/// Scores every catalog emoji by cosine similarity between the text and the
/// emoji's description.
///
/// Description embeddings are computed once, at construction. Similarities
/// may be negative; the normalizer clamps them.
pub struct SemanticScorer {
    catalog: Arc<EmojiCatalog>,
    embedder: Arc<dyn TextEmbedder>,
    descriptions: Vec<Vec<f32>>,
    timeout: Option<Duration>,
}

impl SemanticScorer {
    /// Embed all catalog descriptions with `embedder`.
    ///
    /// Fails when the embedder fails or returns vectors whose length differs
    /// from its declared dimension.
    pub fn new(catalog: Arc<EmojiCatalog>, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        let texts: Vec<&str> = catalog
            .candidates()
            .iter()
            .map(|candidate| candidate.description.as_str())
            .collect();
        let descriptions = embedder.embed_batch(&texts)?;

        if descriptions.len() != texts.len() {
            return Err(VimojiError::config(format!(
                "{} returned {} embeddings for {} descriptions",
                embedder.name(),
                descriptions.len(),
                texts.len()
            )));
        }
        let dimension = embedder.dimension();
        if let Some((position, _)) = descriptions
            .iter()
            .enumerate()
            .find(|(_, vector)| vector.len() != dimension)
        {
            return Err(VimojiError::config(format!(
                "{} returned a description embedding of the wrong dimension for '{}' (expected {dimension})",
                embedder.name(),
                catalog.candidates()[position].symbol
            )));
        }

        info!(
            embedder = embedder.name(),
            dimension,
            descriptions = descriptions.len(),
            "description embeddings computed"
        );

        Ok(Self {
            catalog,
            embedder,
            descriptions,
            timeout: None,
        })
    }

    /// Bound every embedding call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the wrapped embedder.
    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let text = text.to_string();
        call_with_timeout("semantic", self.timeout, move || embedder.embed(&text))
    }
}

impl Scorer for SemanticScorer {
    fn score(&self, text: &str) -> Result<ScoreVector> {
        let query = self.embed(text)?;
        let expected = self.embedder.dimension();
        if query.len() != expected {
            return Err(VimojiError::inference(format!(
                "{} returned a {}-dimensional embedding, expected {expected}",
                self.embedder.name(),
                query.len()
            )));
        }

        Ok(self
            .catalog
            .candidates()
            .iter()
            .zip(&self.descriptions)
            .map(|(candidate, description)| {
                (candidate.symbol.clone(), cosine_similarity(&query, description))
            })
            .collect())
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::Semantic
    }
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("embedder", &self.embedder.name())
            .field("descriptions", &self.descriptions.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
