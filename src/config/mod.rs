//! Settings for the asset manager.

mod loader;
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    PackageEntry,
    Settings,
    ValidationError,
};
