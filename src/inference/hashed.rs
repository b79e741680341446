//! Feature-hashing text embedder.
//!
//! Projects word unigrams and character trigrams into a fixed number of
//! buckets with a signed hash, then L2-normalizes. No model files are needed,
//! which makes it the default semantic backend when no external embedding
//! service is configured.

use ahash::RandomState;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::normalize_text;
use crate::error::{Result, VimojiError};
use crate::inference::embedder::TextEmbedder;

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = 512;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Hashing embedder over words and character trigrams.
#[derive(Debug, Clone)]
pub struct HashedNgramEmbedder {
    dimension: usize,
    hasher: RandomState,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            hasher: Self::fixed_hasher(),
        }
    }
}

impl HashedNgramEmbedder {
    /// Create an embedder with the given number of buckets.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VimojiError::config("embedding dimension must be positive"));
        }
        Ok(Self {
            dimension,
            hasher: Self::fixed_hasher(),
        })
    }

    // Fixed seeds keep description and query embeddings in the same space.
    fn fixed_hasher() -> RandomState {
        RandomState::with_seeds(
            0x5649_4d4f_4a49_0001,
            0x5649_4d4f_4a49_0002,
            0x5649_4d4f_4a49_0003,
            0x5649_4d4f_4a49_0004,
        )
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = self.hasher.hash_one(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl TextEmbedder for HashedNgramEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = normalize_text(text);
        let mut vector = vec![0.0f32; self.dimension];

        for word in normalized.unicode_words() {
            self.add_feature(&mut vector, word, WORD_WEIGHT);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &trigram, TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashed-ngram"
    }
}
