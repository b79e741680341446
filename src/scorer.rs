//! Scoring methods.
//!
//! Every method implements the [`Scorer`] trait: it receives the (already
//! preprocessed) request text and returns a sparse [`ScoreVector`] over the
//! catalog. The ensemble only sees a scorer's [`ScorerKind`] and its vector.
//!
//! - [`KeywordScorer`]: phrase lookup in the catalog's keyword table
//! - [`SentimentScorer`]: emotion classifier mapped to emotion emoji groups
//! - [`SemanticScorer`]: cosine similarity against emoji descriptions

pub mod deadline;
pub mod keyword;
pub mod semantic;
pub mod sentiment;
pub mod types;

pub use deadline::DeadlineScorer;
pub use keyword::KeywordScorer;
pub use semantic::SemanticScorer;
pub use sentiment::SentimentScorer;
pub use types::{Evidence, ScoreReport, ScoreVector, ScorerKind};

use crate::error::Result;

/// Contract shared by all scoring methods.
pub trait Scorer: Send + Sync {
    /// Score every relevant catalog emoji for `text`.
    fn score(&self, text: &str) -> Result<ScoreVector>;

    /// The method this scorer implements.
    fn kind(&self) -> ScorerKind;

    /// Get the name of this scorer for debugging and logging.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Score `text` and report the evidence used.
    ///
    /// The default implementation reports no evidence.
    fn score_detailed(&self, text: &str) -> Result<ScoreReport> {
        Ok(ScoreReport::new(self.score(text)?))
    }
}
