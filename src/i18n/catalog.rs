//! Language catalog: the fixed set of language codes accepted for translation.
//!
//! The catalog is a process-wide singleton initialized on first access with
//! `OnceLock`. It is never mutated afterwards, so lookups need no locking.

use std::sync::OnceLock;

/// Every code a translation request may name as `source` or `target`.
///
/// Mostly ISO 639-1, plus a few ISO 639-2 codes (`ceb`, `haw`, `hmn`) and one
/// region-qualified code (`zh-TW`).
const SUPPORTED_CODES: &[&str] = &[
    "af", "sq", "am", "ar", "hy", "az", "eu", "be", "bn", "bs", "bg", "ca", "ceb", "zh", "zh-TW",
    "co", "hr", "cs", "da", "nl", "en", "eo", "et", "fi", "fr", "gl", "ka", "de", "el", "gu", "ht",
    "ha", "haw", "he", "hi", "hmn", "hu", "is", "ig", "id", "ga", "it", "ja", "jv", "kn", "kk",
    "km", "rw", "ko", "ku", "ky", "la", "lo", "lv", "lt", "lb", "mk", "mg", "ms", "ml", "mt", "mi",
    "mr", "mn", "my", "ne", "no", "ny", "or", "ps", "fa", "pl", "pt", "pa", "ro", "ru", "sm", "gd",
    "sr", "st", "sn", "sd", "si", "sk", "sl", "so", "es", "su", "sw", "sv", "tl", "tg", "ta", "tt",
    "te", "th", "tr", "tk", "uk", "ur", "ug", "uz", "vi", "cy", "xh", "yi", "yo", "zu",
];

/// Immutable set of supported language codes.
pub struct LanguageCatalog {
    codes: &'static [&'static str],
}

/// Global catalog instance (initialized lazily)
static CATALOG: OnceLock<LanguageCatalog> = OnceLock::new();

impl LanguageCatalog {
    /// Get the global catalog instance.
    pub fn get() -> &'static LanguageCatalog {
        CATALOG.get_or_init(|| LanguageCatalog {
            codes: SUPPORTED_CODES,
        })
    }

    /// Check whether `code` names a supported language, ignoring ASCII case.
    ///
    /// `"EN"`, `"en"` and `"En"` are all supported; so are `"zh-TW"` and
    /// `"zh-tw"`.
    pub fn is_supported(&self, code: &str) -> bool {
        self.codes
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(code))
    }

    /// All supported codes, in catalog order.
    pub fn codes(&self) -> &'static [&'static str] {
        self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
