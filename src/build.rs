//! Translation catalog compiler.
//!
//! Folds every registered package's per-language message files into one
//! [`TranslationTable`], the static resource pages resolve messages from.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use serde_json::Value;
use thiserror::Error;

use crate::config::Settings;
use crate::i18n::TranslationTable;
use crate::registry::PackageRegistry;

/// Errors for catalog compilation.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Error when the configured lang file pattern is not a valid glob
    #[error("Invalid lang file pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        message: String,
    },
    /// Error when a message file cannot be read
    #[error("Failed to read message file '{path}': {source}")]
    Read {
        /// The offending file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Error when a message file is not valid JSON
    #[error("Failed to parse message file '{path}': {source}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Error when the compiled catalog cannot be serialized
    #[error("Failed to serialize translation catalog: {0}")]
    Serialize(serde_json::Error),
    /// Error when the compiled catalog cannot be written
    #[error("Failed to write translation catalog '{path}': {source}")]
    Write {
        /// The target file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Compile the translation catalog for every registered package.
///
/// Packages without message files simply contribute nothing; packages are
/// keyed in the table by their full registered name, so `plugins.*` entries
/// stay `plugins.`-qualified.
///
/// # Errors
/// - Invalid lang file pattern
/// - Unreadable or unparseable message file
pub fn compile(
    registry: &PackageRegistry,
    settings: &Settings,
) -> Result<TranslationTable, BuildError> {
    let pattern = build_pattern(&settings.lang_file_pattern)?;

    let mut translations: HashMap<String, HashMap<String, HashMap<String, String>>> =
        settings.langs.iter().map(|lang| (lang.clone(), HashMap::new())).collect();

    for package in registry.packages() {
        for (language, path) in find_message_files(&package.assets_dir, &pattern, &settings.langs)
        {
            tracing::debug!(
                package = package.full_name.as_str(),
                language = language.as_str(),
                "Compiling translations"
            );
            let messages = load_message_file(&path)?;
            if let Some(for_language) = translations.get_mut(&language) {
                for_language.insert(package.full_name.clone(), messages);
            }
        }
    }

    Ok(TranslationTable { langs: settings.langs.clone(), translations })
}

/// Serialize a compiled catalog to `path`, creating parent directories.
///
/// # Errors
/// - Directory creation or file write error
pub fn write(table: &TranslationTable, path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| BuildError::Write { path: path.to_path_buf(), source })?;
    }

    let json = serde_json::to_string(table).map_err(BuildError::Serialize)?;

    tracing::debug!(path = %path.display(), "Writing translation catalog");
    std::fs::write(path, json)
        .map_err(|source| BuildError::Write { path: path.to_path_buf(), source })
}

/// Build the glob set matching message files.
fn build_pattern(pattern: &str) -> Result<GlobSet, BuildError> {
    let glob = Glob::new(pattern).map_err(|e| BuildError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder.build().map_err(|e| BuildError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Locate per-language message files under a package's assets directory.
///
/// Walks the directory, keeps files matching the pattern relative to the
/// assets dir, and takes the file stem as the language code. Files whose
/// stem is not a configured language are skipped with a warning.
fn find_message_files(
    assets_dir: &Path,
    pattern: &GlobSet,
    langs: &[String],
) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();

    for result in WalkBuilder::new(assets_dir)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(assets_dir) else {
            continue;
        };
        if !pattern.is_match(relative_path) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        match langs.iter().find(|lang| *lang == stem) {
            Some(language) => found.push((language.clone(), path.to_path_buf())),
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "Message file does not match a configured language"
                );
            }
        }
    }

    // Walk order is platform dependent; keep the output stable.
    found.sort();
    found
}

/// Read and flatten one message file.
fn load_message_file(path: &Path) -> Result<HashMap<String, String>, BuildError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| BuildError::Read { path: path.to_path_buf(), source })?;
    let json: Value = serde_json::from_str(&content)
        .map_err(|source| BuildError::Parse { path: path.to_path_buf(), source })?;

    let mut messages = HashMap::new();
    flatten_messages(&json, None, &mut messages);
    Ok(messages)
}

/// Flatten nested message JSON into dot-separated message ids.
///
/// Message templates are strings; other scalars are stringified, arrays are
/// skipped with a warning.
fn flatten_messages(value: &Value, prefix: Option<&str>, result: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let id = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten_messages(value, Some(&id), result);
            }
        }
        Value::Array(_) => {
            tracing::warn!(
                id = prefix.unwrap_or_default(),
                "Arrays are not valid message templates, skipping"
            );
        }
        Value::String(s) => {
            if let Some(id) = prefix {
                result.insert(id.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(id) = prefix {
                result.insert(id.to_string(), value.to_string());
            }
        }
    }
}
