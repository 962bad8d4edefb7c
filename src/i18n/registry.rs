//! Language registry: Single source of truth for all supported languages.
//!
//! This module provides a centralized registry of all languages the quote form
//! answers in. It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use crate::i18n::strings::{LanguageStrings, ARABIC_STRINGS, ENGLISH_STRINGS};
use anyhow::{bail, Result};
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar")
    pub code: &'static str,

    /// Whether this is the fallback language (only one should be true)
    pub is_canonical: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,

    /// Message table for this language
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if there is not exactly one canonical language. `validate()`
    /// runs at startup so this cannot happen while serving requests.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check the registry before serving traffic.
    ///
    /// Fails when there is not exactly one enabled canonical language or when
    /// any enabled language has an empty message.
    pub fn validate(&self) -> Result<()> {
        validate_languages(&self.languages)
    }
}

fn validate_languages(languages: &[LanguageConfig]) -> Result<()> {
    let canonical_count = languages
        .iter()
        .filter(|lang| lang.is_canonical && lang.enabled)
        .count();
    if canonical_count != 1 {
        bail!(
            "Expected exactly one enabled canonical language, found {}",
            canonical_count
        );
    }

    for lang in languages.iter().filter(|lang| lang.enabled) {
        let missing = lang.strings.missing_keys();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|key| key.as_str()).collect();
            bail!(
                "Language '{}' has empty messages for: {}",
                lang.code,
                names.join(", ")
            );
        }
    }

    Ok(())
}

/// Default language configurations: English (canonical) and Arabic.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            is_canonical: true,
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "ar",
            is_canonical: false,
            enabled: true,
            strings: &ARABIC_STRINGS,
        },
    ]
}
