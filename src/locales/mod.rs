//! Target language handling for Translator-RS
//!
//! Language codes follow Youdao's naming (`zh-CHS`, `zh-CHT`); other
//! providers map them to their own codes.

/// Pseudo-language that picks a target per query
pub const AUTO: &str = "auto";

/// Supported target languages, in the order the host presents them
pub const TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("zh-CHS", "Chinese (Simplified)"),
    ("zh-CHT", "Chinese (Traditional)"),
    ("en", "English"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ru", "Russian"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("ar", "Arabic"),
    ("de", "German"),
];

/// Check if a target language code is supported
pub fn is_supported(code: &str) -> bool {
    TARGET_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Get the language code at a host combo-box index.
/// Out-of-range indices fall back to `auto`.
pub fn target_by_index(index: usize) -> &'static str {
    TARGET_LANGUAGES.get(index).map(|(c, _)| *c).unwrap_or(AUTO)
}

/// Display name for a language code
pub fn display_name(code: &str) -> Option<&'static str> {
    TARGET_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Whether the text contains CJK ideographs or kana/hangul
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x3040..=0x30FF   // Hiragana, Katakana
            | 0x3400..=0x4DBF // CJK Extension A
            | 0x4E00..=0x9FFF // CJK Unified Ideographs
            | 0xAC00..=0xD7AF // Hangul syllables
            | 0xF900..=0xFAFF)
    })
}

/// Resolve the concrete target for a query.
///
/// `auto` translates CJK text into English and everything else into
/// Simplified Chinese.
pub fn resolve_target<'a>(code: &'a str, text: &str) -> &'a str {
    if code != AUTO {
        return code;
    }
    if contains_cjk(text) {
        "en"
    } else {
        "zh-CHS"
    }
}

/// Map a language code to Google's naming
pub fn google_code(code: &str) -> &str {
    match code {
        "zh-CHS" => "zh-CN",
        "zh-CHT" => "zh-TW",
        other => other,
    }
}

/// Get list of all supported target languages
pub fn get_supported_languages() -> Vec<(&'static str, &'static str)> {
    TARGET_LANGUAGES.to_vec()
}
