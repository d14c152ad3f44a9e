use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "entry[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build mode, deciding artifact naming and development-only checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Fixed `.dev.json` artifact names, missing-key check enabled.
    Development,
    /// Content-hashed artifact names.
    Production,
}

impl BuildMode {
    /// Derive the mode from the `I18N_BUNDLE_ENV` environment variable.
    ///
    /// Anything other than `development` (including an unset variable)
    /// selects production.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("I18N_BUNDLE_ENV").as_deref() {
            Ok("development") => Self::Development,
            _ => Self::Production,
        }
    }

    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Plugin settings, supplied once at construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// Ordered glob patterns locating fragment files, relative to `root`.
    pub entry: Vec<String>,

    /// Directory the entry patterns are matched against.
    pub root: PathBuf,

    /// Directory artifacts are physically written to.
    pub output_dir: PathBuf,

    /// Public URL/path prefix embedded in the manifest.
    pub manifest_base: String,

    /// The closed set of supported locales. Not discovered at runtime.
    pub locales: Vec<Locale>,

    /// Locale whose keys the other locales are checked against.
    pub reference_locale: Locale,

    /// The host build's managed output root. Artifacts under it are staged
    /// for the host's own emit phase instead of written directly to disk.
    pub output_root: Option<PathBuf>,

    /// Development or production behavior, defaulting from the environment.
    #[serde(default = "BuildMode::from_env")]
    pub mode: BuildMode,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            entry: Vec::new(),
            root: PathBuf::from("."),
            output_dir: PathBuf::from("static/assets/i18n"),
            manifest_base: "/static/assets/i18n".to_string(),
            locales: vec!["zh_cn".to_string(), "en".to_string()],
            reference_locale: "en".to_string(),
            output_root: None,
            mode: BuildMode::from_env(),
        }
    }
}

impl PluginConfig {
    /// # Errors
    /// - No entry pattern configured
    /// - Invalid glob pattern
    /// - Empty locale set, or a reference locale outside it
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.entry.is_empty() {
            errors.push(ValidationError::new(
                "entry",
                "At least one pattern is required. Example: [\"app/**/*.i18n.json\"]",
            ));
        }

        for (index, pattern) in self.entry.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("entry[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.locales.is_empty() {
            errors.push(ValidationError::new(
                "locales",
                "At least one locale is required. Example: [\"zh_cn\", \"en\"]",
            ));
        } else if !self.locales.contains(&self.reference_locale) {
            errors.push(ValidationError::new(
                "referenceLocale",
                format!(
                    "Locale '{}' is not part of 'locales'. Missing-key checks need a configured reference",
                    self.reference_locale
                ),
            ));
        }

        if self.manifest_base.is_empty() {
            errors.push(ValidationError::new(
                "manifestBase",
                "The prefix cannot be empty. Example: \"/static/assets/i18n\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Resolve `root`, `outputDir` and `outputRoot` against a workspace
    /// directory when they were given as relative paths.
    pub fn resolve_relative_to(&mut self, workspace_root: &Path) {
        if self.root.is_relative() {
            self.root = workspace_root.join(&self.root);
        }
        if self.output_dir.is_relative() {
            self.output_dir = workspace_root.join(&self.output_dir);
        }
        if let Some(output_root) = &self.output_root
            && output_root.is_relative()
        {
            self.output_root = Some(workspace_root.join(output_root));
        }
    }
}
