// Settings are a small JSON file next to the log, loaded once at start-up.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::helper::{HelperScript, catalog};
use crate::retry::{DEFAULT_BACKOFF, DEFAULT_RETRIES, RetryPolicy};
use crate::urls::{AssetUrls, TRANSLATIONS_DEFAULT_BASE};

pub const DEFAULT_SITE_URL: &str = "http://localhost:5173";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub site_url: String,              // Origin the site is served from.
    pub translations_base: String,     // Where script JSON/PDF/images live.
    pub retries: u32,                  // Extra attempts after the first failure.
    pub backoff_ms: u64,               // First retry delay; doubles each attempt.
    pub helper_script: Option<String>, // Last script picked in the helper.
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            site_url: DEFAULT_SITE_URL.to_string(),
            translations_base: TRANSLATIONS_DEFAULT_BASE.to_string(),
            retries: DEFAULT_RETRIES,
            backoff_ms: DEFAULT_BACKOFF.as_millis() as u64,
            helper_script: None,
            debug_mode: false,
        }
    }
}

/// `~/grimoire/data`, or `./data` when there is no home directory.
pub fn data_dir() -> PathBuf {
    dir::home_dir()
        .map(|home| home.join("grimoire").join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> PathBuf {
        data_dir().join(SETTINGS_FILE)
    }

    // A missing file is not an error; a broken one is.
    pub fn load() -> io::Result<Self> {
        Self::load_or_default(Self::default_path())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> io::Result<Self> {
        match Self::load_settings_from_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            result => result,
        }
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to_file(Self::default_path())
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.backoff_ms))
    }

    pub fn asset_urls(&self) -> AssetUrls {
        AssetUrls::from_env(&self.site_url, Some(&self.translations_base))
    }

    /// The persisted helper script, or the default when unset or no longer known.
    pub fn helper_script(&self) -> &'static HelperScript {
        catalog::find_or_default(self.helper_script.as_deref())
    }

    pub fn select_helper_script(&mut self, script_id: &str) -> bool {
        match catalog::find(script_id) {
            Some(script) => {
                self.helper_script = Some(script.id.to_string());
                true
            }
            None => false,
        }
    }
}
