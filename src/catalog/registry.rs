//! The validated, read-only emoji catalog.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use ahash::AHashMap;
use tracing::info;

use crate::analysis::normalize_text;
use crate::catalog::config::{CatalogConfig, EmojiCandidate, KeywordEntry};
use crate::catalog::emotion::Emotion;
use crate::error::{Result, VimojiError};

/// Immutable registry of emoji candidates, keyword entries and emotion groups.
///
/// Built once at startup with [`EmojiCatalog::from_config`]; there are no
/// mutating operations. Share it between scorers with an `Arc`.
#[derive(Debug, Clone)]
pub struct EmojiCatalog {
    candidates: Vec<EmojiCandidate>,
    positions: AHashMap<String, usize>,
    keywords: Vec<KeywordEntry>,
    emotions: BTreeMap<Emotion, Vec<String>>,
}

impl EmojiCatalog {
    /// Validate the configuration tables and build the catalog.
    ///
    /// Fails with [`VimojiError::Config`] when the emoji table is empty or has
    /// duplicate or blank symbols, when a keyword phrase is blank or repeated
    /// after normalization, when any keyword entry or emotion group refers to
    /// an unregistered symbol, or when one of the eight emotion groups is
    /// missing or empty.
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        if config.emojis.is_empty() {
            return Err(VimojiError::config("emoji table is empty"));
        }

        let mut positions = AHashMap::with_capacity(config.emojis.len());
        for (position, candidate) in config.emojis.iter().enumerate() {
            if candidate.symbol.trim().is_empty() || candidate.symbol.trim() != candidate.symbol {
                return Err(VimojiError::config(format!(
                    "emoji #{position} has a blank or padded symbol"
                )));
            }
            if positions.insert(candidate.symbol.clone(), position).is_some() {
                return Err(VimojiError::config(format!(
                    "duplicate emoji symbol '{}'",
                    candidate.symbol
                )));
            }
        }

        let keywords = Self::validate_keywords(config.keywords, &positions)?;
        let emotions = Self::validate_emotions(config.emotions, &positions)?;

        info!(
            emojis = config.emojis.len(),
            keywords = keywords.len(),
            "emoji catalog loaded"
        );

        Ok(Self {
            candidates: config.emojis,
            positions,
            keywords,
            emotions,
        })
    }

    /// Build the catalog from the built-in tables.
    pub fn builtin() -> Result<Self> {
        Self::from_config(CatalogConfig::builtin()?)
    }

    /// Build the catalog from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(CatalogConfig::from_file(path)?)
    }

    fn validate_keywords(
        entries: Vec<KeywordEntry>,
        positions: &AHashMap<String, usize>,
    ) -> Result<Vec<KeywordEntry>> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut validated = Vec::with_capacity(entries.len());

        for entry in entries {
            let phrase = normalize_text(&entry.phrase);
            if phrase.is_empty() {
                return Err(VimojiError::config("keyword phrase is blank"));
            }
            if !seen.insert(phrase.clone()) {
                return Err(VimojiError::config(format!(
                    "duplicate keyword phrase '{phrase}'"
                )));
            }
            if entry.emojis.is_empty() {
                return Err(VimojiError::config(format!(
                    "keyword '{phrase}' maps to no emoji"
                )));
            }

            let mut listed = HashSet::with_capacity(entry.emojis.len());
            for symbol in &entry.emojis {
                if !positions.contains_key(symbol) {
                    return Err(VimojiError::config(format!(
                        "keyword '{phrase}' refers to unknown emoji '{symbol}'"
                    )));
                }
                if !listed.insert(symbol.as_str()) {
                    return Err(VimojiError::config(format!(
                        "keyword '{phrase}' lists emoji '{symbol}' twice"
                    )));
                }
            }

            validated.push(KeywordEntry {
                phrase,
                emojis: entry.emojis,
            });
        }

        Ok(validated)
    }

    fn validate_emotions(
        emotions: BTreeMap<Emotion, Vec<String>>,
        positions: &AHashMap<String, usize>,
    ) -> Result<BTreeMap<Emotion, Vec<String>>> {
        for emotion in Emotion::ALL {
            let group = emotions.get(&emotion).ok_or_else(|| {
                VimojiError::config(format!("emotion group '{emotion}' is missing"))
            })?;
            if group.is_empty() {
                return Err(VimojiError::config(format!(
                    "emotion group '{emotion}' is empty"
                )));
            }
            if let Some(symbol) = group.iter().find(|symbol| !positions.contains_key(*symbol)) {
                return Err(VimojiError::config(format!(
                    "emotion group '{emotion}' refers to unknown emoji '{symbol}'"
                )));
            }
        }
        Ok(emotions)
    }

    /// Description of a registered emoji.
    pub fn lookup_description(&self, symbol: &str) -> Option<&str> {
        self.positions
            .get(symbol)
            .map(|&position| self.candidates[position].description.as_str())
    }

    /// All symbols in insertion order.
    pub fn all_symbols(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.symbol.as_str()).collect()
    }

    /// All candidates in insertion order.
    pub fn candidates(&self) -> &[EmojiCandidate] {
        &self.candidates
    }

    /// Insertion index of a symbol; lower registers first and wins ties.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.positions.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Keyword entries with normalized phrases, in declaration order.
    pub fn keywords(&self) -> &[KeywordEntry] {
        &self.keywords
    }

    /// Emoji group for an emotion.
    pub fn emotion_group(&self, emotion: Emotion) -> &[String] {
        self.emotions
            .get(&emotion)
            .map(|group| group.as_slice())
            .unwrap_or(&[])
    }

    /// All emotion groups in canonical emotion order.
    pub fn emotion_groups(&self) -> &BTreeMap<Emotion, Vec<String>> {
        &self.emotions
    }
}
