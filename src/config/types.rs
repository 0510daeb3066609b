use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "langs[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A package the CLI registers and compiles.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntry {
    /// Package name as registered (`plugins.*` names shorten for asset
    /// paths but stay intact as translation keys).
    pub name: String,

    /// Assets source directory, relative to the workspace root.
    pub assets_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Supported languages, ordered. The first entry is the fallback
    /// language; an empty list disables translation entirely.
    pub langs: Vec<String>,

    /// Package assumed for message references and asset locations without a
    /// `package@` part.
    pub default_package: String,

    /// URL prefix built assets are served under.
    pub assets_public_prefix: String,

    /// Glob locating per-package message files, relative to each package's
    /// assets directory. The file stem is the language code.
    pub lang_file_pattern: String,

    /// Packages to register when running the CLI.
    pub packages: Vec<PackageEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            langs: vec!["en".to_string()],
            default_package: "app".to_string(),
            assets_public_prefix: "/assets".to_string(),
            lang_file_pattern: "lang/*.json".to_string(),
            packages: Vec::new(),
        }
    }
}

impl Settings {
    /// # Errors
    /// - Empty or duplicate language codes
    /// - Empty default package
    /// - Public prefix not rooted at `/`
    /// - Invalid lang file glob
    /// - Empty or duplicate package names
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (index, lang) in self.langs.iter().enumerate() {
            if lang.is_empty() {
                errors.push(ValidationError::new(
                    format!("langs[{index}]"),
                    "Language codes cannot be empty",
                ));
            } else if self.langs.iter().take(index).any(|seen| seen == lang) {
                errors.push(ValidationError::new(
                    format!("langs[{index}]"),
                    format!("Duplicate language code '{lang}'"),
                ));
            }
        }

        if self.default_package.is_empty() {
            errors.push(ValidationError::new(
                "defaultPackage",
                "The default package cannot be empty. Example: \"app\"",
            ));
        }

        if !self.assets_public_prefix.starts_with('/') {
            errors.push(ValidationError::new(
                "assetsPublicPrefix",
                format!(
                    "The prefix must start with '/', got '{}'",
                    self.assets_public_prefix
                ),
            ));
        }

        if self.lang_file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "langFilePattern",
                "The pattern cannot be empty. Example: \"lang/*.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.lang_file_pattern) {
            errors.push(ValidationError::new(
                "langFilePattern",
                format!("Invalid glob pattern '{}': {e}", self.lang_file_pattern),
            ));
        }

        for (index, package) in self.packages.iter().enumerate() {
            if package.name.is_empty() {
                errors.push(ValidationError::new(
                    format!("packages[{index}].name"),
                    "Package names cannot be empty",
                ));
            } else if self.packages.iter().take(index).any(|seen| seen.name == package.name) {
                errors.push(ValidationError::new(
                    format!("packages[{index}].name"),
                    format!("Duplicate package '{}'", package.name),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
