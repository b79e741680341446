//! Inference backends consumed by the sentiment and semantic scorers.
//!
//! The engine treats models as black boxes behind two contracts:
//!
//! - [`EmotionClassifier`]: `classify(text) -> (label, confidence)`
//! - [`TextEmbedder`]: `embed(text) -> vector`
//!
//! Calls go through [`call_with_timeout`] so a slow backend degrades a single
//! request instead of blocking it.
//!
//! Bundled backends that need no model files:
//!
//! - [`LexiconEmotionClassifier`]: emotion cue counting
//! - [`StarRatingClassifier`]: adapter for 1–5 star sentiment models
//! - [`HashedNgramEmbedder`]: feature-hashed word and trigram embedding

pub mod classifier;
pub mod embedder;
pub mod hashed;
pub mod lexicon;
pub mod star_rating;
pub mod timeout;

pub use classifier::{Classification, EmotionClassifier};
pub use embedder::{TextEmbedder, cosine_similarity};
pub use hashed::HashedNgramEmbedder;
pub use lexicon::LexiconEmotionClassifier;
pub use star_rating::{StarRater, StarRatingClassifier};
pub use timeout::call_with_timeout;
