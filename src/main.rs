//! Entry point for the standalone one-shot bundle runner.

use std::path::PathBuf;
use std::process::ExitCode;

use i18n_bundle_plugin::I18nBundlePlugin;
use i18n_bundle_plugin::config::load_from_workspace;
use i18n_bundle_plugin::detect::TimestampSnapshot;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().init();

    let workspace_root =
        std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);

    let config = match load_from_workspace(&workspace_root) {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::error!("no .i18n-bundle.json found under {}", workspace_root.display());
            return ExitCode::FAILURE;
        }
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut plugin = match I18nBundlePlugin::new(config) {
        Ok(plugin) => plugin,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // A one-shot run has no host change map: the empty snapshot forces a
    // full cold-start pass.
    if let Err(err) = plugin.on_make(&TimestampSnapshot::new()).await {
        tracing::error!("build pass failed: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
