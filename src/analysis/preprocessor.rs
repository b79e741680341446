//! Cleaning pipeline for informal Vietnamese text.
//!
//! The steps run in a fixed order:
//!
//! 1. Unicode NFC composition
//! 2. Lowercasing
//! 3. URL, e-mail, @mention and #hashtag removal
//! 4. Emoji removal
//! 5. Repeated character squashing (`vuiiiii` → `vuii`)
//! 6. Teencode replacement on word boundaries, longest key first
//! 7. Whitespace collapse
//!
//! Every step can be switched off through [`PreprocessorConfig`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::analysis::teencode::builtin_dictionary;
use crate::error::{Result, VimojiError};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL pattern"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid e-mail pattern"));

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid mention pattern"));

static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag pattern"));

static EMOJI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}", // emoticons
        r"\x{1F300}-\x{1F5FF}", // symbols & pictographs
        r"\x{1F680}-\x{1F6FF}", // transport & map
        r"\x{1F1E0}-\x{1F1FF}", // flags
        r"\x{1F900}-\x{1F9FF}", // supplemental symbols
        r"\x{1FA00}-\x{1FAFF}",
        r"\x{2300}-\x{23FF}",
        r"\x{2702}-\x{27B0}",
        r"\x{24C2}-\x{1F251}",
        r"\x{203C}\x{2049}\x{200D}",
        "]+",
    ))
    .expect("valid emoji pattern")
});

static BUILTIN_TEENCODE: LazyLock<Arc<TeencodeReplacer>> = LazyLock::new(|| {
    Arc::new(TeencodeReplacer::new(builtin_dictionary()).expect("valid built-in teencode table"))
});

/// Toggles for each preprocessing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    pub lowercase: bool,
    pub remove_urls: bool,
    pub remove_emails: bool,
    pub remove_mentions: bool,
    pub remove_hashtags: bool,
    pub remove_emoji: bool,
    pub squash_repeated: bool,
    pub replace_teencode: bool,
    pub normalize_unicode: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_urls: true,
            remove_emails: true,
            remove_mentions: true,
            remove_hashtags: true,
            remove_emoji: true,
            squash_repeated: true,
            replace_teencode: true,
            normalize_unicode: true,
        }
    }
}

/// Whole-word teencode replacement backed by a single alternation pattern.
#[derive(Debug)]
pub struct TeencodeReplacer {
    pattern: Regex,
    dictionary: HashMap<String, String>,
}

impl TeencodeReplacer {
    /// Compile a replacer for the given slang → formal dictionary.
    pub fn new(dictionary: HashMap<String, String>) -> Result<Self> {
        let dictionary: HashMap<String, String> = dictionary
            .into_iter()
            .map(|(slang, formal)| (slang.to_lowercase(), formal))
            .filter(|(slang, _)| !slang.trim().is_empty())
            .collect();

        if dictionary.is_empty() {
            return Err(VimojiError::config("teencode dictionary is empty"));
        }

        // Longest first so that "bye bye" wins over "bye".
        let mut keys: Vec<&String> = dictionary.keys().collect();
        keys.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let alternation = keys
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .map_err(|e| VimojiError::config(format!("invalid teencode table: {e}")))?;

        Ok(Self {
            pattern,
            dictionary,
        })
    }

    /// Replace every whole-word slang occurrence in `text`.
    pub fn replace(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                self.dictionary
                    .get(&matched.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }

    /// Number of dictionary entries.
    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }
}

/// Configurable text preprocessor.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    config: PreprocessorConfig,
    teencode: Arc<TeencodeReplacer>,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self {
            config: PreprocessorConfig::default(),
            teencode: Arc::clone(&BUILTIN_TEENCODE),
        }
    }
}

impl TextPreprocessor {
    /// Create a preprocessor with the built-in teencode table.
    pub fn new(config: PreprocessorConfig) -> Self {
        Self {
            config,
            teencode: Arc::clone(&BUILTIN_TEENCODE),
        }
    }

    /// Create a preprocessor with a custom teencode dictionary.
    pub fn with_teencode(
        config: PreprocessorConfig,
        dictionary: HashMap<String, String>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            teencode: Arc::new(TeencodeReplacer::new(dictionary)?),
        })
    }

    /// Get the active configuration.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Run the pipeline on a single text.
    pub fn preprocess(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut text: String = if self.config.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.config.lowercase {
            text = text.to_lowercase();
        }
        if self.config.remove_urls {
            text = URL_PATTERN.replace_all(&text, "").into_owned();
        }
        if self.config.remove_emails {
            text = EMAIL_PATTERN.replace_all(&text, "").into_owned();
        }
        if self.config.remove_mentions {
            text = MENTION_PATTERN.replace_all(&text, "").into_owned();
        }
        if self.config.remove_hashtags {
            text = HASHTAG_PATTERN.replace_all(&text, "").into_owned();
        }
        if self.config.remove_emoji {
            text = EMOJI_PATTERN.replace_all(&text, " ").into_owned();
        }
        if self.config.squash_repeated {
            text = squash_repeated_chars(&text);
        }
        if self.config.replace_teencode {
            text = self.teencode.replace(&text);
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Run the pipeline on several texts.
    pub fn preprocess_batch(&self, texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| self.preprocess(text)).collect()
    }
}

/// Reduce runs of three or more identical characters to two.
pub fn squash_repeated_chars(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run <= 2 {
            output.push(c);
        }
    }

    output
}

/// Extract every emoji run found in `text`.
pub fn extract_emojis(text: &str) -> Vec<String> {
    EMOJI_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline() {
        let preprocessor = TextPreprocessor::default();
        assert_eq!(preprocessor.preprocess("Chúc mừng bạn! 🎉🎊"), "chúc mừng bạn!");
        assert_eq!(preprocessor.preprocess("Ko bít sao 😢"), "không biết sao");
    }

    #[test]
    fn test_removes_urls_mentions_hashtags() {
        let preprocessor = TextPreprocessor::default();
        let output = preprocessor.preprocess("Xem https://example.com @ban #vui nhé");
        assert_eq!(output, "xem nhé");
    }

    #[test]
    fn test_removes_emails() {
        let preprocessor = TextPreprocessor::default();
        assert_eq!(preprocessor.preprocess("gửi a@b.com nha"), "gửi nha");
    }

    #[test]
    fn test_squash_repeated_chars() {
        assert_eq!(squash_repeated_chars("vuiiiii"), "vuii");
        assert_eq!(squash_repeated_chars("quáááá"), "quáá");
        assert_eq!(squash_repeated_chars("ok"), "ok");
        assert_eq!(squash_repeated_chars(""), "");
    }

    #[test]
    fn test_teencode_whole_words_only() {
        let preprocessor = TextPreprocessor::default();
        // "k" alone is slang, but not inside "kinh"
        assert_eq!(preprocessor.preprocess("k sợ"), "không sợ");
        assert_eq!(preprocessor.preprocess("kinh quá"), "kinh quá");
    }

    #[test]
    fn test_teencode_prefers_longest_key() {
        let preprocessor = TextPreprocessor::default();
        assert_eq!(preprocessor.preprocess("bye bye nhé"), "tạm biệt nhé");
        assert_eq!(preprocessor.preprocess("thank you"), "cảm ơn");
    }

    #[test]
    fn test_steps_can_be_disabled() {
        let config = PreprocessorConfig {
            replace_teencode: false,
            remove_emoji: false,
            ..Default::default()
        };
        let preprocessor = TextPreprocessor::new(config);
        assert_eq!(preprocessor.preprocess("Ko 😢"), "ko 😢");
    }

    #[test]
    fn test_custom_teencode() {
        let mut dictionary = HashMap::new();
        dictionary.insert("hp".to_string(), "hạnh phúc".to_string());
        let preprocessor =
            TextPreprocessor::with_teencode(PreprocessorConfig::default(), dictionary).unwrap();
        assert_eq!(preprocessor.preprocess("HP quá"), "hạnh phúc quá");
        // Built-in entries are not part of a custom table.
        assert_eq!(preprocessor.preprocess("ko"), "ko");
    }

    #[test]
    fn test_empty_custom_teencode_is_rejected() {
        let result = TextPreprocessor::with_teencode(PreprocessorConfig::default(), HashMap::new());
        assert!(matches!(result, Err(VimojiError::Config(_))));
    }

    #[test]
    fn test_extract_emojis() {
        let emojis = extract_emojis("vui 😊 quá 🎉");
        assert_eq!(emojis, vec!["😊".to_string(), "🎉".to_string()]);
    }

    #[test]
    fn test_batch() {
        let preprocessor = TextPreprocessor::default();
        let output = preprocessor.preprocess_batch(&["Vui", "BUỒN"]);
        assert_eq!(output, vec!["vui".to_string(), "buồn".to_string()]);
    }
}
