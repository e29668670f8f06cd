use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::{KeywordError, KeywordTables, ScoringParams};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub claude: ClaudeSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Remote vision model settings; without an API key the service runs heuristic-only
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeSettings {
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClaudeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            anthropic_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String { "https://api.anthropic.com/v1/messages".to_string() }
fn default_model() -> String { "claude-opus-4-1-20250805".to_string() }
fn default_anthropic_version() -> String { "2023-06-01".to_string() }
fn default_max_tokens() -> u32 { 2048 }
fn default_timeout_secs() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl UploadSettings {
    pub fn is_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }

    /// JSON body limit large enough for a base64-encoded image of `max_bytes`
    pub fn json_limit(&self) -> usize {
        self.max_bytes / 3 * 4 + 64 * 1024
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_max_bytes() -> usize { 10 * 1024 * 1024 }
fn default_allowed_mime_types() -> Vec<String> {
    ["image/png", "image/jpeg", "image/jpg", "image/webp", "image/heic", "image/heif"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_baseline")]
    pub baseline: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    /// Optional TOML file replacing the built-in keyword tables
    pub keywords_file: Option<String>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            step: default_step(),
            keywords_file: None,
        }
    }
}

fn default_baseline() -> f64 { 55.0 }
fn default_step() -> f64 { 6.0 }

impl ScoringSettings {
    pub fn params(&self) -> ScoringParams {
        ScoringParams {
            baseline: self.baseline,
            step: self.step,
        }
    }

    pub fn keyword_tables(&self) -> Result<KeywordTables, KeywordError> {
        match &self.keywords_file {
            Some(path) => KeywordTables::load_from(path),
            None => Ok(KeywordTables::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CUPID)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CUPID__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CUPID")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables that sit outside the CUPID prefix
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let api_key = std::env::var("ANTHROPIC_AI_KEY").ok().filter(|k| !k.is_empty());

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = api_key {
        builder = builder.set_override("claude.api_key", key)?;
    }

    builder.build()
}
