//! assetman
//!
//! Asset and translation manager for package-based web sites.
//!
//! Packages register the directory their static assets live in; pages queue
//! assets for preloading and render them as HTML tags; a compiler folds each
//! package's per-language message files into a single translation catalog;
//! and [`i18n::Translator`] resolves `package@message.id` references against
//! that catalog with language and package fallback.

pub mod assets;
pub mod build;
pub mod config;
pub mod i18n;
pub mod query;
pub mod registry;

// 最もよく使う型を再エクスポート
pub use i18n::{
    PageContext,
    TranslationTable,
    Translator,
};
