use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::aggregate::TimeBucket;
use crate::focus::AnalysisFocus;

pub const CONFIG_FILE_NAME: &str = "energy-analyst.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>, // For OpenAI-compatible APIs

    /// Optional: Override max_tokens for LLM requests
    /// If not specified, uses provider-specific defaults:
    /// - anthropic: 4096
    /// - openai: 4096
    /// - openai-compatible (ollama): 16384
    /// - gemini: 8192
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }

        match self.provider.as_str() {
            "anthropic" => 4096,
            "openai" => 4096,
            "openai-compatible" => 16384, // ollama and similar
            "gemini" => 8192,
            _ => 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rows of the table included in the prompt (default: 50)
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Rows shown by `preview` (default: 10)
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Focus used when none is given on the command line
    #[serde(default = "default_focus")]
    pub default_focus: String,

    /// Bucket for the usage-over-time aggregate: "day", "month" or "year"
    #[serde(default = "default_time_bucket")]
    pub time_bucket: String,
}

fn default_max_rows() -> usize {
    50
}

fn default_preview_rows() -> usize {
    10
}

fn default_focus() -> String {
    "asset-management".to_string()
}

fn default_time_bucket() -> String {
    "month".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            preview_rows: default_preview_rows(),
            default_focus: default_focus(),
            time_bucket: default_time_bucket(),
        }
    }
}

impl AnalysisConfig {
    pub fn get_default_focus(&self) -> Result<AnalysisFocus> {
        AnalysisFocus::from_str(&self.default_focus)
            .context("invalid analysis.default_focus in config")
    }

    pub fn get_time_bucket(&self) -> Result<TimeBucket> {
        TimeBucket::from_str(&self.time_bucket).context("invalid analysis.time_bucket in config")
    }
}

impl Config {
    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("failed to load config from {}", config_path));
        }

        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("energy-analyst").join("config.toml"));
        }
        Self::load_first_present(&candidates)
    }

    /// First candidate file that exists wins. A file that exists but cannot
    /// be read or parsed is an error, not a fall-through.
    fn load_first_present(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            match fs::read_to_string(path) {
                Ok(content) => {
                    debug!("Loaded config from {:?}", path);
                    return toml::from_str(&content)
                        .with_context(|| format!("failed to parse config {}", path.display()));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to read config {}", path.display()))
                }
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get API key from environment variable specified in config
    pub fn get_api_key(&self) -> Result<String> {
        match &self.llm.api_key_env {
            Some(env_var) => {
                // "none" means no API key needed (e.g., Ollama)
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }

                // openai-compatible: local servers need no key, gateways do
                if self.llm.provider == "openai-compatible" {
                    return Ok(env::var(env_var).unwrap_or_default());
                }

                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            base_url: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}
