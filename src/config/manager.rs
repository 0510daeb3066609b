//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    Settings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: Settings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: Settings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースの設定を読み込み
        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(Settings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            Settings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_settings(&mut self, new_settings: Settings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        // バリデーション
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を更新
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.current_settings
    }

    /// ワークスペースのルートパスを取得
    #[must_use]
    pub fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn load_settings_without_workspace_uses_defaults() {
        let mut manager = ConfigManager::new();

        manager.load_settings(None).unwrap();

        assert_that!(manager.get_settings().default_package, eq("app"));
        assert_that!(manager.workspace_root(), none());
    }

    #[rstest]
    fn load_settings_from_workspace_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".assetman.json"),
            r#"{"langs": ["ru", "en"], "defaultPackage": "theme"}"#,
        )
        .unwrap();
        let mut manager = ConfigManager::new();

        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_that!(manager.get_settings().langs, elements_are![eq("ru"), eq("en")]);
        assert_that!(manager.get_settings().default_package, eq("theme"));
    }

    #[rstest]
    fn load_settings_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".assetman.json"), r#"{"defaultPackage": ""}"#).unwrap();
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    #[rstest]
    fn update_settings_validates() {
        let mut manager = ConfigManager::new();
        let invalid = Settings { assets_public_prefix: "assets".to_string(), ..Settings::default() };

        let result = manager.update_settings(invalid);

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        // 失敗した更新は反映されない
        assert_that!(manager.get_settings().assets_public_prefix, eq("/assets"));
    }
}
