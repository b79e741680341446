//! Emoji catalog: the static tables every scorer reads from.
//!
//! - **Emoji registry**: symbol → Vietnamese description, in insertion order.
//!   Insertion order is the ranking tie-breaker.
//! - **Keyword table**: normalized phrase → ordered emoji list.
//! - **Emotion groups**: one emoji list per Plutchik emotion.
//!
//! Tables are plain data ([`CatalogConfig`]) until validated into an
//! [`EmojiCatalog`], which is read-only afterwards.
//!
//! # Example
//!
//! ```
//! use vimoji::catalog::{Emotion, EmojiCatalog};
//!
//! let catalog = EmojiCatalog::builtin().unwrap();
//! assert!(catalog.lookup_description("🎉").is_some());
//! assert!(!catalog.emotion_group(Emotion::Joy).is_empty());
//! ```

pub mod config;
pub mod emotion;
pub mod registry;

pub use config::{CatalogConfig, EmojiCandidate, KeywordEntry};
pub use emotion::Emotion;
pub use registry::EmojiCatalog;
