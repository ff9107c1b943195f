use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{NoteError, Result, DEFAULT_CAPACITY_BYTES};

const CONFIG_FILE_NAME: &str = "config.json";
const DATA_FILE_NAME: &str = "notes.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// File backing the note medium
    pub data_file: PathBuf,

    /// Capacity of the note medium in bytes
    pub capacity_bytes: u64,

    /// Quiet period before an edit is saved, in milliseconds
    pub debounce_ms: u64,

    /// How often relative dates are refreshed, in seconds
    pub date_refresh_secs: u64,

    /// Editor command used by `edit --editor`
    pub editor_command: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "notecat")
}

impl Default for Config {
    fn default() -> Self {
        let data_file = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME));

        Self {
            data_file,
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            debounce_ms: 200,
            date_refresh_secs: 60,
            editor_command: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| NoteError::Config {
            message: format!("invalid config file {}: {}", path.display(), e),
        })?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.date_refresh_secs == 0 {
            return Err(NoteError::Config {
                message: "date_refresh_secs must be greater than zero".to_string(),
            });
        }
        if self.capacity_bytes == 0 {
            warn!("capacity_bytes is 0; every save will fail");
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn date_refresh(&self) -> Duration {
        Duration::from_secs(self.date_refresh_secs)
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            if !editor.trim().is_empty() {
                return editor;
            }
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else {
            for editor in &["nano", "vim", "vi"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "vi".to_string()
        }
    }
}
