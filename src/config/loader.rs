//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    Settings,
};

/// Load settings from a workspace.
///
/// Looks for a `.assetman.json` file at the workspace root.
///
/// # Arguments
/// * `workspace_root` - workspace root path
///
/// # Returns
/// - `Ok(Some(settings))`: file found and loaded
/// - `Ok(None)`: no settings file
/// - `Err(ConfigError)`: read or parse error
///
/// # Errors
/// - File read error
/// - JSON parse error
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<Settings>, ConfigError> {
    let config_path = workspace_root.join(".assetman.json");

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
