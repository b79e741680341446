//! Diacritic-preserving text normalization.

use unicode_normalization::UnicodeNormalization;

/// Normalize text for keyword matching.
///
/// Applies NFC composition so that precomposed and decomposed Vietnamese
/// diacritics compare equal, lowercases, trims, and collapses runs of
/// whitespace into a single space. Diacritics are never stripped: "mừng" and
/// "mung" stay distinct.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
