//! Registry of packages that ship static assets.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

/// Errors for package registration and lookup.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Error when a location names a package nobody registered
    #[error("Asset package '{0}' is not registered")]
    NotRegistered(String),
    /// Error when a package is registered twice
    #[error("Asset package '{0}' is already registered")]
    AlreadyRegistered(String),
    /// Error when the registered assets directory does not exist
    #[error("Assets directory '{0}' is not found")]
    AssetsDirNotFound(PathBuf),
}

/// A registered package and its assets source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPackage {
    /// Short registry name; `plugins.*` packages register under the segment
    /// after the prefix, which is also the name used in asset URLs.
    pub name: String,

    /// Name exactly as registered. Translation catalogs key packages by this
    /// full name, which is what makes `plugins.`-qualified lookups land.
    pub full_name: String,

    /// Directory holding the package's asset sources.
    pub assets_dir: PathBuf,
}

impl AssetPackage {
    /// Public URL path the package's built assets are served under.
    #[must_use]
    pub fn public_path(&self, prefix: &str) -> String {
        format!("{prefix}/{}/", self.name)
    }
}

/// In-memory registry of asset packages.
///
/// Populated once during startup; lookup-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    /// Short name → package.
    packages: HashMap<String, AssetPackage>,
}

impl PackageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package rooted at `assets_dir`.
    ///
    /// # Errors
    /// - `AlreadyRegistered` when the (shortened) name is taken
    /// - `AssetsDirNotFound` when `assets_dir` is not a directory
    pub fn register(&mut self, name: &str, assets_dir: &Path) -> Result<(), RegistryError> {
        let short = short_name(name);
        if self.packages.contains_key(short) {
            return Err(RegistryError::AlreadyRegistered(short.to_string()));
        }
        if !assets_dir.is_dir() {
            return Err(RegistryError::AssetsDirNotFound(assets_dir.to_path_buf()));
        }

        tracing::debug!(package = short, dir = %assets_dir.display(), "Registering asset package");
        self.packages.insert(
            short.to_string(),
            AssetPackage {
                name: short.to_string(),
                full_name: name.to_string(),
                assets_dir: assets_dir.to_path_buf(),
            },
        );

        Ok(())
    }

    /// Whether `name` refers to a registered package.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.packages.contains_key(short_name(name))
    }

    /// Look up a registered package.
    ///
    /// # Errors
    /// - `NotRegistered` when the package is unknown
    pub fn resolve(&self, name: &str) -> Result<&AssetPackage, RegistryError> {
        let short = short_name(name);
        self.packages.get(short).ok_or_else(|| RegistryError::NotRegistered(short.to_string()))
    }

    /// Registered packages, in no particular order.
    pub fn packages(&self) -> impl Iterator<Item = &AssetPackage> {
        self.packages.values()
    }
}

/// `plugins.foo` registers and resolves as `foo`.
fn short_name(name: &str) -> &str {
    name.strip_prefix("plugins.")
        .map_or(name, |rest| rest.split('.').next().unwrap_or(rest))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("app", "app")]
    #[case("plugins.widget", "widget")]
    #[case("plugins.widget.extra", "widget")]
    #[case("theme.dark", "theme.dark")]
    fn short_name_cases(#[case] name: &str, #[case] expected: &str) {
        assert_that!(short_name(name), eq(expected));
    }

    #[googletest::test]
    fn register_and_resolve() {
        let dir = TempDir::new().unwrap();
        let mut registry = PackageRegistry::new();

        registry.register("app", dir.path()).unwrap();

        let package = registry.resolve("app").unwrap();
        expect_that!(package.name, eq("app"));
        expect_that!(package.full_name, eq("app"));
        expect_that!(registry.is_registered("app"), eq(true));
    }

    #[googletest::test]
    fn plugins_package_registers_under_short_name() {
        let dir = TempDir::new().unwrap();
        let mut registry = PackageRegistry::new();

        registry.register("plugins.widget", dir.path()).unwrap();

        let package = registry.resolve("widget").unwrap();
        expect_that!(package.name, eq("widget"));
        expect_that!(package.full_name, eq("plugins.widget"));
        // Full-name lookups shorten the same way.
        expect_that!(registry.is_registered("plugins.widget"), eq(true));
    }

    #[rstest]
    fn duplicate_registration_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut registry = PackageRegistry::new();
        registry.register("plugins.widget", dir.path()).unwrap();

        let result = registry.register("widget", dir.path());

        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(name)) if name == "widget"));
    }

    #[rstest]
    fn missing_assets_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut registry = PackageRegistry::new();

        let result = registry.register("app", &dir.path().join("missing"));

        assert!(matches!(result, Err(RegistryError::AssetsDirNotFound(_))));
    }

    #[rstest]
    fn unregistered_lookup_fails() {
        let registry = PackageRegistry::new();

        let result = registry.resolve("app");

        assert!(matches!(result, Err(RegistryError::NotRegistered(name)) if name == "app"));
    }

    #[googletest::test]
    fn public_path_uses_short_name() {
        let dir = TempDir::new().unwrap();
        let mut registry = PackageRegistry::new();
        registry.register("plugins.widget", dir.path()).unwrap();

        let package = registry.resolve("widget").unwrap();

        expect_that!(package.public_path("/assets"), eq("/assets/widget/"));
    }
}
