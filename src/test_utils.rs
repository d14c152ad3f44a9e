//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use crate::config::{
    BuildMode,
    PluginConfig,
};
use crate::diagnostics::{
    DiagnosticsSink,
    Severity,
};

/// Collects diagnostics in memory so tests can assert on them.
#[derive(Debug, Default)]
pub(crate) struct RecordingDiagnostics {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingDiagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn warnings(&self) -> Vec<String> {
        self.messages_with(Severity::Warning)
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.messages_with(Severity::Error)
    }

    fn messages_with(&self, severity: Severity) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(recorded, _)| *recorded == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push((Severity::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push((Severity::Error, message.to_string()));
    }
}

/// テスト用の設定を作成する（`root` 配下に `app/**/*.i18n.json` を探す）
pub(crate) fn test_config(root: &std::path::Path, mode: BuildMode) -> PluginConfig {
    PluginConfig {
        entry: vec!["app/**/*.i18n.json".to_string()],
        root: root.to_path_buf(),
        output_dir: root.join("dist/i18n"),
        manifest_base: "/assets/i18n".to_string(),
        mode,
        ..PluginConfig::default()
    }
}
