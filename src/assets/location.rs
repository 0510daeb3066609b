//! `package@path` asset locations and URL resolution.

use thiserror::Error;

use crate::registry::{
    PackageRegistry,
    RegistryError,
};

/// Package assumed for locations without an explicit `package@` part.
pub const DEFAULT_PACKAGE: &str = "app";

/// Errors for asset location handling.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Error when a location's extension maps to no known collection.
    /// This is a caller contract violation, not a recoverable condition.
    #[error("Cannot determine collection of location '{0}'")]
    UnknownCollection(String),
    /// Error when the location names an unregistered package
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Asset collections that can be preloaded and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Script assets, rendered as `<script>` tags.
    Js,
    /// Stylesheet assets, rendered as `<link rel="stylesheet">` tags.
    Css,
}

impl Collection {
    /// Detect the collection from a location's file extension. A version
    /// query suffix (`?v=…`) is ignored.
    ///
    /// # Errors
    /// - `UnknownCollection` for anything that is neither `.js` nor `.css`
    pub fn detect(location: &str) -> Result<Self, AssetError> {
        let path = location.split_once('?').map_or(location, |(path, _)| path);
        if path.ends_with(".js") {
            Ok(Self::Js)
        } else if path.ends_with(".css") {
            Ok(Self::Css)
        } else {
            Err(AssetError::UnknownCollection(location.to_string()))
        }
    }
}

/// Split a location into `(package, path)`.
///
/// Only a location with exactly one `@` names its package; anything else is
/// a path inside [`DEFAULT_PACKAGE`].
#[must_use]
pub fn split_location(location: &str) -> (&str, &str) {
    let parts: Vec<&str> = location.split('@').collect();
    match *parts.as_slice() {
        [package, path] => (package, path),
        _ => (DEFAULT_PACKAGE, location),
    }
}

/// Resolve a location to a public URL.
///
/// Absolute locations (`http(s)://…`, protocol-relative `//…`, or rooted
/// `/…`) pass through untouched; everything else resolves its package
/// through the registry.
///
/// # Errors
/// - `Registry` when the package is not registered
pub fn url(
    registry: &PackageRegistry,
    public_prefix: &str,
    location: &str,
) -> Result<String, AssetError> {
    if location.starts_with("http") || location.starts_with("//") || location.starts_with('/') {
        return Ok(location.to_string());
    }

    let (package, path) = split_location(location);
    let package = registry.resolve(package)?;

    Ok(format!("{public_prefix}/{}/{path}", package.name))
}
