//! Configuration management for sereno.
//!
//! Loads config from YAML files in standard locations. Every section is
//! optional; missing keys take their defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub device_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_secs: 10,
            device_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub locale: String,
    pub backend: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: "pt-BR".into(),
            backend: "espeak-ng".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub backend: String,
    /// arboard only: how long to keep serving the selection after a copy.
    pub hold_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            backend: "xclip".into(),
            hold_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MicConfig {
    pub tick_ms: u64,
    pub initial_level: f64,
    pub max_step: f64,
    pub alert_threshold: f64,
    pub event_type: String,
}

impl Default for MicConfig {
    fn default() -> Self {
        Self {
            tick_ms: 800,
            initial_level: 8.0,
            max_step: 10.0,
            alert_threshold: 85.0,
            event_type: "som_alto".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub color: String,
    pub volume: f32,
    pub sample_rate: u32,
    pub loop_secs: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            color: "brown".into(),
            volume: 0.2,
            sample_rate: 44100,
            loop_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub speech: SpeechConfig,
    pub clipboard: ClipboardConfig,
    pub mic: MicConfig,
    pub noise: NoiseConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/sereno/config.yaml
    /// 3. /etc/sereno/config.yaml
    ///
    /// Read and parse failures are logged and fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(config_path) = Self::resolve(path) else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&config_path) {
            Ok(config) => {
                info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("{}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    /// An explicit path wins even if it does not exist, so the failure is
    /// reported rather than silently replaced by another file.
    fn resolve(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::candidate_paths().into_iter().find(|p| p.exists()),
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join("config.yaml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config/sereno/config.yaml"));
        }
        paths.push(PathBuf::from("/etc/sereno/config.yaml"));
        paths
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }
}
