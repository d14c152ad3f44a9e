//! プラグイン設定モジュール

mod loader;
mod types;

pub use loader::load_from_workspace;
pub use types::{
    BuildMode,
    ConfigError,
    PluginConfig,
    ValidationError,
};
