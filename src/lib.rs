//! # Vimoji
//!
//! Emoji suggestion for Vietnamese text, built as an ensemble of
//! independent scorers.
//!
//! ## Features
//!
//! - Keyword matching against a curated phrase table
//! - Emotion-based scoring through a pluggable classifier
//! - Embedding similarity against emoji descriptions
//! - Weighted, max and voting combination with graceful degradation
//! - Vietnamese text preprocessing (teencode, URLs, repeated characters)
//! - Offline evaluation with precision, recall, MRR and nDCG
//!
//! ```
//! use std::sync::Arc;
//! use vimoji::prelude::*;
//!
//! let catalog = Arc::new(EmojiCatalog::builtin().unwrap());
//! let engine = SuggestionEngine::offline(catalog, EngineConfig::default()).unwrap();
//! let suggestion = engine.suggest("Chúc mừng bạn!", Method::Keyword, 3).unwrap();
//! assert_eq!(suggestion.symbols(), vec!["😊", "🎉", "🥳"]);
//! ```

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod ensemble;
pub mod error;
pub mod evaluation;
pub mod inference;
pub mod scorer;

pub mod prelude {
    pub use crate::catalog::{EmojiCatalog, Emotion};
    pub use crate::ensemble::{
        EngineConfig, EnsembleWeights, Method, PaddingPolicy, Suggestion, SuggestionDetails,
        SuggestionEngine,
    };
    pub use crate::error::{Result, VimojiError};
    pub use crate::inference::{EmotionClassifier, TextEmbedder};
    pub use crate::scorer::{Scorer, ScorerKind};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
