use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiCredentials;
use crate::config::{APP_ID, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout_secs: u64,
}

impl Default for InboxSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for InboxSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl InboxSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Both halves of the key pair must be present for authenticated requests.
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(ApiCredentials {
                    api_key: key.clone(),
                    api_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }

    fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("HELPDESK_BASE_URL") {
            self.base_url = url;
        }
        if let Some(key) = var("HELPDESK_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(secret) = var("HELPDESK_API_SECRET") {
            self.api_secret = Some(secret);
        }
        if let Some(secs) = var("HELPDESK_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .parse()
                .with_context(|| format!("HELPDESK_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        Ok(())
    }
}

pub struct SettingsService;

impl SettingsService {
    /// Settings file contents, or defaults when there is no file, then env overrides.
    pub fn load() -> Result<InboxSettings> {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => InboxSettings::default(),
        };
        settings.apply_overrides(|name| std::env::var(name).ok())?;
        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<InboxSettings> {
        if !path.exists() {
            return Ok(InboxSettings::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings at {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed settings file {}", path.display()))
    }

    pub fn save_to(path: &Path, settings: &InboxSettings) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings at {}", path.display()))
    }

    fn settings_path() -> Option<PathBuf> {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
            .ok()?;
        Some(config_dir.join(APP_ID).join("settings.json"))
    }
}
