use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::models::ExtractorSettings;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const TESSERACT_PATH_ENV: &str = "RESUME_EXTRACT_TESSERACT";

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            file_path: settings_path(),
        }
    }

    pub fn with_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub async fn load(&self) -> anyhow::Result<ExtractorSettings> {
        if !tokio::fs::try_exists(&self.file_path)
            .await
            .unwrap_or(false)
        {
            debug!(path = %self.file_path.display(), "no settings file, using defaults");
            return Ok(ExtractorSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| {
                format!("failed to read settings file {}", self.file_path.display())
            })?;

        let parsed = serde_json::from_str::<ExtractorSettings>(&content).with_context(|| {
            format!("invalid JSON in settings file {}", self.file_path.display())
        })?;

        Ok(parsed.sanitized())
    }

    pub async fn save(&self, settings: &ExtractorSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create settings dir {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.file_path, json)
            .await
            .with_context(|| {
                format!("failed to write settings file {}", self.file_path.display())
            })?;
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment overrides win over the settings file. The lookup is injected so
/// callers and tests do not depend on process state.
pub fn apply_overrides(
    mut settings: ExtractorSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> ExtractorSettings {
    if let Some(key) = lookup(GEMINI_API_KEY_ENV) {
        settings.gemini_api_key = Some(key);
    }
    if let Some(path) = lookup(TESSERACT_PATH_ENV) {
        settings.tesseract_path = path;
    }
    settings.sanitized()
}

fn settings_path() -> PathBuf {
    app_data_root().join("settings.json")
}

pub fn app_data_root() -> PathBuf {
    if let Some(path) = dirs::data_local_dir() {
        return path.join("ResumeExtract");
    }

    PathBuf::from(".").join("ResumeExtract")
}
