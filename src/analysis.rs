//! Text analysis for Vietnamese input.
//!
//! Two layers are provided:
//!
//! - [`normalizer`]: the minimal, diacritic-preserving normalization applied to
//!   both keyword phrases and input text before substring matching
//!   (NFC, lowercase, whitespace collapse).
//! - [`preprocessor`]: the full cleaning pipeline for social-media text
//!   (URLs, mentions, hashtags, emoji, repeated characters, teencode).
//!
//! # Example
//!
//! ```
//! use vimoji::analysis::{normalize_text, TextPreprocessor};
//!
//! assert_eq!(normalize_text("  Chúc   MỪNG bạn! "), "chúc mừng bạn!");
//!
//! let preprocessor = TextPreprocessor::default();
//! assert_eq!(preprocessor.preprocess("Ko bít sao 😢"), "không biết sao");
//! ```

pub mod normalizer;
pub mod preprocessor;
pub mod teencode;

pub use normalizer::normalize_text;
pub use preprocessor::{PreprocessorConfig, TextPreprocessor};
