//! Configuration management for tavola.
//!
//! Loads config from YAML files in standard locations, then lets
//! environment variables override ports, paths and API keys.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::mindmap::{MindmapOptions, DEFAULT_LABEL_MAX_CHARS, DEFAULT_MAX_KEYWORDS, DEFAULT_THEME};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub texts_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let texts_dir = dirs::data_dir()
            .map(|d| d.join("tavola").join("user_texts"))
            .unwrap_or_else(|| PathBuf::from("/tmp/user_texts"));
        Self { texts_dir }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language_code: String,
    pub audio_encoding: String,
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".into(),
            api_key: None,
            language_code: "pt-BR".into(),
            audio_encoding: "MP3".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            host: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            temperature: 0.5,
            max_tokens: 600,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
    pub default_theme: String,
    pub max_keywords: usize,
    pub label_max_chars: usize,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.into(),
            max_keywords: DEFAULT_MAX_KEYWORDS,
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
        }
    }
}

impl MindmapConfig {
    pub fn options(&self) -> MindmapOptions {
        MindmapOptions {
            default_theme: self.default_theme.clone(),
            max_keywords: self.max_keywords,
            label_max_chars: self.label_max_chars,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub tts: TtsConfig,
    pub llm: LlmConfig,
    pub mindmap: MindmapConfig,
}

impl Config {
    /// Load configuration from YAML file, then apply environment overrides.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/tavola/config.yaml
    /// 3. /etc/tavola/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = Self::load_file(path);
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_file(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("config.yaml")),
                dirs::home_dir().map(|h| h.join(".config/tavola/config.yaml")),
                Some(PathBuf::from("/etc/tavola/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_yaml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }

    /// Override settings from environment lookups (`PORT`, `TAVOLA_TEXTS_DIR`,
    /// `GOOGLE_TTS_API_KEY`, `OPENAI_API_KEY`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!("Ignoring invalid PORT {port:?}: {e}"),
            }
        }
        if let Some(dir) = lookup("TAVOLA_TEXTS_DIR").filter(|d| !d.is_empty()) {
            self.storage.texts_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("GOOGLE_TTS_API_KEY").filter(|k| !k.is_empty()) {
            self.tts.api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
    }
}
