//! Serializable catalog tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::emotion::Emotion;
use crate::error::Result;

/// Catalog tables shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../resources/catalog.json");

/// A single emoji and its Vietnamese description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCandidate {
    /// The emoji grapheme.
    pub symbol: String,
    /// Free-text Vietnamese description used for semantic matching.
    pub description: String,
}

impl EmojiCandidate {
    pub fn new<S: Into<String>, D: Into<String>>(symbol: S, description: D) -> Self {
        Self {
            symbol: symbol.into(),
            description: description.into(),
        }
    }
}

/// A keyword phrase and the emoji it suggests, most relevant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub phrase: String,
    pub emojis: Vec<String>,
}

impl KeywordEntry {
    pub fn new<S: Into<String>>(phrase: S, emojis: &[&str]) -> Self {
        Self {
            phrase: phrase.into(),
            emojis: emojis.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Raw catalog configuration, as loaded from JSON.
///
/// Nothing is validated here; [`EmojiCatalog::from_config`](crate::catalog::EmojiCatalog::from_config)
/// does that once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Emoji registry in insertion (tie-break) order.
    pub emojis: Vec<EmojiCandidate>,
    /// Keyword table in declaration order.
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    /// Emotion → emoji group.
    #[serde(default)]
    pub emotions: BTreeMap<Emotion, Vec<String>>,
}

impl CatalogConfig {
    /// Parse the built-in tables.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse catalog tables from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load catalog tables from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the tables as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
