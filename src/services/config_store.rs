// Configuration Storage Service
// Handles config file read/write and model directory resolution

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::services::classifier::DEFAULT_MAX_LENGTH;

pub const MODEL_DIR_ENV: &str = "AUTHENTIAI_MODEL_DIR";
pub const CONFIG_DIR_ENV: &str = "AUTHENTIAI_CONFIG_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            model: ModelConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Relative paths are looked up next to the executable, then in the working directory.
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_true")]
    pub lower_case: bool,
    /// Defaults to `lower_case` when unset, matching BERT tokenizer conventions.
    #[serde(default)]
    pub strip_accents: Option<bool>,
    /// "auto", "cpu" or "cuda"
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            max_length: DEFAULT_MAX_LENGTH,
            lower_case: true,
            strip_accents: None,
            device: default_device(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_model_dir() -> PathBuf { PathBuf::from("modello_finale") }
fn default_max_length() -> usize { DEFAULT_MAX_LENGTH }
fn default_true() -> bool { true }
fn default_device() -> String { "auto".to_string() }
fn default_width() -> f32 { 650.0 }
fn default_height() -> f32 { 600.0 }

impl ModelConfig {
    /// Resolve the model directory from the environment, the executable location
    /// and the working directory.
    pub fn resolve_dir(&self) -> PathBuf {
        let env_override = env::var(MODEL_DIR_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let cwd = env::current_dir().ok();
        resolve_model_dir(env_override, &self.dir, exe_dir.as_deref(), cwd.as_deref())
    }

    pub fn strip_accents(&self) -> bool {
        self.strip_accents.unwrap_or(self.lower_case)
    }
}

/// Pick the model directory. An explicit override or absolute path is used
/// as-is; a relative path is tried under `exe_dir` then `cwd`, and the first
/// existing candidate wins. With no existing candidate the first one is
/// returned so the load error names a meaningful path.
pub fn resolve_model_dir(
    env_override: Option<PathBuf>,
    configured: &Path,
    exe_dir: Option<&Path>,
    cwd: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = env_override {
        return dir;
    }
    if configured.is_absolute() {
        return configured.to_path_buf();
    }

    let candidates: Vec<PathBuf> = [exe_dir, cwd]
        .into_iter()
        .flatten()
        .map(|base| base.join(configured))
        .collect();

    candidates
        .iter()
        .find(|c| c.is_dir())
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| configured.to_path_buf())
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        match env::var(CONFIG_DIR_ENV) {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|p| p.join("authentiai")),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    /// Load configuration, writing the defaults out on first run so there is a
    /// file to edit.
    pub fn load_or_init(&self) -> Result<AppConfig, ConfigError> {
        if self.config_file.exists() {
            return self.load();
        }
        let config = AppConfig::default();
        self.save(&config)?;
        Ok(config)
    }
}
