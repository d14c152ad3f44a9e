//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    PluginConfig,
};

/// ワークスペースから設定を読み込む
///
/// `.i18n-bundle.json` ファイルを探して読み込む。相対パスの
/// `root` / `outputDir` / `outputRoot` はワークスペース基準で解決する。
///
/// # Returns
/// - `Ok(Some(config))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub fn load_from_workspace(workspace_root: &Path) -> Result<Option<PluginConfig>, ConfigError> {
    let config_path = workspace_root.join(".i18n-bundle.json");

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let mut config: PluginConfig = serde_json::from_str(&content)?;
    config.resolve_relative_to(workspace_root);

    Ok(Some(config))
}
