//! Language type: validated language representation.
//!
//! Requests carry a free-form `language` value; this module turns it into a
//! `Language` that is guaranteed to exist in the registry.

use crate::i18n::strings::{LanguageStrings, MessageKey};
use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};

/// A validated language.
///
/// Only supported, enabled languages can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "ar")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const ARABIC: Language = Language { code: "ar" };

    /// Create a Language from an exact language code.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Resolve a user-supplied language value.
    ///
    /// The value is trimmed and lowercased; anything that is not an enabled
    /// language (including a missing value) resolves to the canonical language.
    pub fn from_request_value(value: Option<&str>) -> Language {
        let normalized = value.unwrap_or_default().trim().to_lowercase();
        Language::from_code(&normalized).unwrap_or_else(|_| Language::canonical())
    }

    /// Get the canonical (fallback) language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This should
    /// never happen if the Language was constructed properly (via `from_code`
    /// or constants).
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Message table for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        self.config().strings
    }

    /// Translate a message key into this language.
    pub fn message(&self, key: MessageKey) -> &'static str {
        self.strings().get(key)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}
