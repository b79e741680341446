//! Vietnamese teencode (internet slang) dictionary.
//!
//! Keys are matched as whole words after lowercasing. Multi-word keys are
//! allowed and take precedence over shorter keys sharing a prefix.

use std::collections::HashMap;

/// Built-in slang → standard Vietnamese pairs.
pub const BUILTIN_TEENCODE: &[(&str, &str)] = &[
    // negation
    ("ko", "không"),
    ("k", "không"),
    ("kh", "không"),
    ("khg", "không"),
    ("hok", "không"),
    ("hem", "không"),
    ("hông", "không"),
    // được
    ("dc", "được"),
    ("đc", "được"),
    ("dk", "được"),
    ("đk", "được"),
    ("duoc", "được"),
    // pronouns and people
    ("bn", "bạn"),
    ("mk", "mình"),
    ("mik", "mình"),
    ("ng", "người"),
    ("ngta", "người ta"),
    ("nyc", "người yêu cũ"),
    ("ny", "người yêu"),
    ("vk", "vợ"),
    ("ck", "chồng"),
    // verbs and adverbs
    ("ns", "nói"),
    ("r", "rồi"),
    ("oy", "rồi"),
    ("rui", "rồi"),
    ("trc", "trước"),
    ("truoc", "trước"),
    ("sd", "sau đó"),
    ("bt", "biết"),
    ("bít", "biết"),
    ("biet", "biết"),
    ("bjt", "biết"),
    ("nte", "như thế"),
    ("ntn", "như thế nào"),
    ("cx", "cũng"),
    ("cg", "cũng"),
    ("cug", "cũng"),
    ("vs", "với"),
    ("thik", "thích"),
    ("thix", "thích"),
    ("iu", "yêu"),
    ("yeu", "yêu"),
    ("bh", "bao giờ"),
    ("bjh", "bao giờ"),
    ("lm", "làm"),
    ("nc", "nước"),
    ("nhiu", "nhiều"),
    ("qa", "quá"),
    ("đag", "đang"),
    ("dag", "đang"),
    ("z", "vậy"),
    ("v", "vậy"),
    ("vay", "vậy"),
    ("vl", "vãi"),
    ("vcl", "vãi"),
    ("j z", "gì vậy"),
    ("j v", "gì vậy"),
    ("gì z", "gì vậy"),
    ("gi z", "gì vậy"),
    ("xỉu", "ngất"),
    ("gato", "ghen ăn tức ở"),
    // places
    ("hn", "hà nội"),
    ("sg", "sài gòn"),
    // particles
    ("ak", "ạ"),
    ("ah", "à"),
    // borrowed words
    ("okie", "ok"),
    ("oke", "ok"),
    ("okla", "ok"),
    ("bye bye", "tạm biệt"),
    ("bye", "tạm biệt"),
    ("bai", "tạm biệt"),
    ("hi", "xin chào"),
    ("hello", "xin chào"),
    ("thank you", "cảm ơn"),
    ("thanks", "cảm ơn"),
    ("thks", "cảm ơn"),
    ("tks", "cảm ơn"),
    ("sorry", "xin lỗi"),
    ("sr", "xin lỗi"),
    ("sry", "xin lỗi"),
    ("please", "làm ơn"),
    ("plz", "làm ơn"),
    ("pls", "làm ơn"),
    ("lol", "haha"),
    ("kk", "haha"),
    ("dep zai", "đẹp trai"),
    ("đẹp zai", "đẹp trai"),
    ("pro", "giỏi"),
    ("cool", "tuyệt"),
    ("cute", "dễ thương"),
    ("wtf", "cái gì"),
    ("omg", "trời ơi"),
];

/// Build an owned teencode dictionary from the built-in pairs.
pub fn builtin_dictionary() -> HashMap<String, String> {
    BUILTIN_TEENCODE
        .iter()
        .map(|(slang, formal)| (slang.to_string(), formal.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_no_duplicate_keys() {
        let dictionary = builtin_dictionary();
        assert_eq!(dictionary.len(), BUILTIN_TEENCODE.len());
    }

    #[test]
    fn test_keys_are_lowercase() {
        for (slang, _) in BUILTIN_TEENCODE {
            assert_eq!(*slang, slang.to_lowercase());
        }
    }
}
