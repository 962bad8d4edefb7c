//! Internationalization (i18n) module for the bilingual quote form.
//!
//! Every response message is looked up here. Message keys are an enum and
//! each language is a struct with one field per key, so a missing translation
//! is a compile error rather than a runtime fallback.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their tables
//! - `language`: Validated `Language` type with request-value fallback to English
//! - `strings`: `MessageKey` and the English/Arabic message tables
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{translate, Language, MessageKey};
//!
//! let language = Language::from_request_value(Some("ar"));
//! let text = translate(MessageKey::Success, language);
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{LanguageStrings, MessageKey, ARABIC_STRINGS, ENGLISH_STRINGS};

/// Translate a typed key into the given language.
pub fn translate(key: MessageKey, language: Language) -> &'static str {
    language.message(key)
}

/// Translate by string key and language code.
///
/// Unknown languages fall back to English. Unknown keys fall back to the
/// language's `generic_error`, then to English `generic_error`.
pub fn translate_key(key: &str, language: &str) -> &'static str {
    let language = Language::from_request_value(Some(language));
    match key.parse::<MessageKey>() {
        Ok(key) => language.message(key),
        Err(_) => {
            let fallback = language.message(MessageKey::GenericError);
            if fallback.is_empty() {
                Language::canonical().message(MessageKey::GenericError)
            } else {
                fallback
            }
        }
    }
}
