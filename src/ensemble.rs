//! Ensemble scoring and ranking.
//!
//! A request flows through the pieces of this module in order:
//!
//! 1. [`SuggestionEngine`] validates the [`Method`], preprocesses the text and
//!    runs the scorers the method needs
//! 2. [`ScoreNormalizer`] rescales each scorer's output into `[0, 1]`
//! 3. [`EnsembleCombiner`] merges the normalized vectors (weighted sum, max,
//!    voting or passthrough), renormalizing weights over the scorers that
//!    succeeded
//! 4. [`Ranker`] sorts, breaks ties by catalog order and keeps the top `k`

pub mod combiner;
pub mod config;
pub mod engine;
pub mod method;
pub mod normalizer;
pub mod ranker;
pub mod types;
pub mod weights;

pub use combiner::{EnsembleCombiner, Outcomes, ScorerOutcome};
pub use config::EngineConfig;
pub use engine::{SuggestionEngine, SuggestionEngineBuilder};
pub use method::Method;
pub use normalizer::{NormalizedVector, ScoreNormalizer};
pub use ranker::{PaddingPolicy, Ranker};
pub use types::{DetectedEmotion, ScoredEmoji, Suggestion, SuggestionDetails};
pub use weights::EnsembleWeights;
