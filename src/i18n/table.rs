//! Compiled translation catalog.

use std::collections::HashMap;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Errors raised while loading a compiled translation catalog.
#[derive(Error, Debug)]
pub enum TableError {
    /// Error when the catalog file cannot be read
    #[error("Failed to read translation catalog: {0}")]
    Io(#[from] std::io::Error),
    /// Error when the catalog is not valid JSON
    #[error("Failed to parse translation catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Translation catalog: language → package → message id → template.
///
/// Shape on disk:
///
/// ```json
/// { "langs": ["en", "ru"], "translations": { "en": { "app": { "greeting": "Hello" } } } }
/// ```
///
/// Loaded once at startup and never mutated afterwards; every lookup reads
/// the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationTable {
    /// Supported language codes, ordered. The first entry is the fallback
    /// language.
    pub langs: Vec<String>,

    /// Language → package → message id → template string.
    pub translations: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl TranslationTable {
    /// Load a catalog from a compiled JSON file.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    pub fn load(path: &Path) -> Result<Self, TableError> {
        tracing::debug!(path = %path.display(), "Loading translation catalog");
        let content = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&content)?;
        Ok(table)
    }

    /// The designated fallback language. `None` when no languages are
    /// configured.
    #[must_use]
    pub fn fallback_language(&self) -> Option<&str> {
        self.langs.first().map(String::as_str)
    }

    /// Whether `language` is one of the supported languages.
    #[must_use]
    pub fn is_supported(&self, language: &str) -> bool {
        self.langs.iter().any(|lang| lang == language)
    }

    /// Template stored under `(language, package, id)`, if any.
    #[must_use]
    pub fn template(&self, language: &str, package: &str, id: &str) -> Option<&str> {
        self.translations.get(language)?.get(package)?.get(id).map(String::as_str)
    }
}
