//! Translation request validation.
//!
//! Rules run in a fixed order and stop at the first violation, so a caller
//! always sees the message of the earliest rule that failed rather than an
//! aggregate of every problem in the request.

use crate::i18n::LanguageCatalog;
use serde_json::Value;
use thiserror::Error;

/// Reason reported for a request that passes every rule.
pub const NO_ERRORS: &str = "No errors.";

/// The first rule a translation request violated.
///
/// The `Display` text is the human-readable reason returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Text must be of type string.")]
    TextNotString,

    #[error("Text must contain at least one character.")]
    TextEmpty,

    #[error("Source must be of type string.")]
    SourceNotString,

    #[error("Source must contain at least two characters.")]
    SourceTooShort,

    #[error("Source language is not supported or incorrect source language code provided.")]
    SourceUnsupported,

    #[error("Target must be of type string.")]
    TargetNotString,

    #[error("Target must contain at least two characters.")]
    TargetTooShort,

    #[error("Target language is not supported or incorrect target language code provided.")]
    TargetUnsupported,
}

/// A request that passed validation, with language codes lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Error variants for one language-code field.
struct CodeRules {
    not_string: ValidationError,
    too_short: ValidationError,
    unsupported: ValidationError,
}

const SOURCE_RULES: CodeRules = CodeRules {
    not_string: ValidationError::SourceNotString,
    too_short: ValidationError::SourceTooShort,
    unsupported: ValidationError::SourceUnsupported,
};

const TARGET_RULES: CodeRules = CodeRules {
    not_string: ValidationError::TargetNotString,
    too_short: ValidationError::TargetTooShort,
    unsupported: ValidationError::TargetUnsupported,
};

/// Validator for translation requests.
pub struct RequestValidator;

impl RequestValidator {
    /// Validate the raw `text`, `source` and `target` values of a request body.
    ///
    /// Checks, in order: `text` is a non-empty string; `source` is a string of
    /// at least two characters naming a catalog language; the same for
    /// `target`. Returns the first violation.
    pub fn validate(
        text: &Value,
        source: &Value,
        target: &Value,
    ) -> Result<ValidatedRequest, ValidationError> {
        let text = text.as_str().ok_or(ValidationError::TextNotString)?;
        if utf16_len(text) < 1 {
            return Err(ValidationError::TextEmpty);
        }

        let source = Self::check_code(source, &SOURCE_RULES)?;
        let target = Self::check_code(target, &TARGET_RULES)?;

        Ok(ValidatedRequest {
            text: text.to_string(),
            source,
            target,
        })
    }

    /// Run the string, length and catalog checks for one language code and
    /// return it lowercased.
    fn check_code(value: &Value, rules: &CodeRules) -> Result<String, ValidationError> {
        let code = value.as_str().ok_or(rules.not_string)?;
        if utf16_len(code) <= 1 {
            return Err(rules.too_short);
        }
        if !LanguageCatalog::get().is_supported(code) {
            return Err(rules.unsupported);
        }
        Ok(code.to_lowercase())
    }
}

/// Length in UTF-16 code units.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}
