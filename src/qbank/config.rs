use crate::codec::AnswerPolicy;
use crate::error::{QbankError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const CONFIG_DIR_ENV: &str = "QBANK_CONFIG_DIR";
const DEFAULT_PREVIEW_WIDTH: usize = 80;

pub const KEYS: [&str; 3] = ["default-file", "answer-policy", "preview-width"];

/// Configuration for qbank, stored as `config.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QbankConfig {
    /// CSV file used when `--file` is not given
    #[serde(default)]
    pub default_file: Option<PathBuf>,

    /// How unrecognized answer cells are handled on load
    #[serde(default)]
    pub answer_policy: AnswerPolicy,

    /// Question preview width in list output
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
}

fn default_preview_width() -> usize {
    DEFAULT_PREVIEW_WIDTH
}

impl Default for QbankConfig {
    fn default() -> Self {
        Self {
            default_file: None,
            answer_policy: AnswerPolicy::default(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

/// `$QBANK_CONFIG_DIR` if set, otherwise the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "qbank", "qbank")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| QbankError::Config("Could not determine config directory".into()))
}

impl QbankConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(QbankError::Io)?;
        let config: QbankConfig =
            serde_json::from_str(&content).map_err(QbankError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(QbankError::Io)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(QbankError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(QbankError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-file" => Some(
                self.default_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "answer-policy" => Some(self.answer_policy.to_string()),
            "preview-width" => Some(self.preview_width.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default-file" => {
                let value = value.trim();
                self.default_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "answer-policy" => self.answer_policy = value.parse()?,
            "preview-width" => {
                let width: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid preview width: {}", value))?;
                if width < 4 {
                    return Err("Preview width must be at least 4".to_string());
                }
                self.preview_width = width;
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}
