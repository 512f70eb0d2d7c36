use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the LLM provider.
///
/// Loaded from `~/.florapal/config.json`, falling back to a local
/// `config.toml`, with environment variables taking precedence over both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_max_output_tokens() -> u32 {
    // ~120 words of answer plus markdown slack
    512
}

fn default_temperature() -> f32 {
    0.7
}

fn app_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".florapal")
}

fn config_json_path() -> PathBuf {
    app_dir().join("config.json")
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config {
            api_key: None,
            api_base: None,
            model: None,
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        };

        let mut loaded = false;
        let json_path = config_json_path();
        if json_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&json_path) {
                if let Ok(file_config) = serde_json::from_str::<Config>(&content) {
                    config = file_config;
                    loaded = true;
                }
            }
        }

        if !loaded && std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        if let Ok(api_key) = std::env::var("API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(api_base) = std::env::var("API_BASE") {
            config.api_base = Some(api_base);
        }
        if let Ok(model) = std::env::var("MODEL") {
            config.model = Some(model);
        }
        if let Ok(max_tokens) = std::env::var("MAX_OUTPUT_TOKENS") {
            if let Ok(value) = max_tokens.trim().parse() {
                config.max_output_tokens = value;
            }
        }
        config
    }
}
