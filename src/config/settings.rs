//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub telegram: TelegramConfig,
    pub vk: Option<VkConfig>,
    pub redis: RedisConfig,
    pub questions: QuestionsConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub token: String,
    /// Chat that receives warnings and errors
    pub admin_chat_id: Option<i64>,
}

/// VK community bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VkConfig {
    pub token: String,
    pub group_id: u64,
    #[serde(default = "default_vk_api_url")]
    pub api_url: String,
    #[serde(default = "default_vk_api_version")]
    pub api_version: String,
    /// Long poll wait, 1..=90 seconds
    #[serde(default = "default_vk_wait_seconds")]
    pub wait_seconds: u64,
    #[serde(default = "default_vk_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_vk_api_url() -> String {
    VkConfig::API_URL.to_string()
}

fn default_vk_api_version() -> String {
    VkConfig::API_VERSION.to_string()
}

fn default_vk_wait_seconds() -> u64 {
    25
}

fn default_vk_timeout_seconds() -> u64 {
    10
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    /// Sessions never expire when unset
    pub ttl_seconds: Option<u64>,
}

/// Question bank locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionsConfig {
    pub json_path: String,
    pub raw_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_name: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit configuration file
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name(path))
    }

    fn load(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("telegram.token", defaults.telegram.token)?
            .set_default("redis.url", defaults.redis.url)?
            .set_default("redis.prefix", defaults.redis.prefix)?
            .set_default("questions.json_path", defaults.questions.json_path)?
            .set_default("questions.raw_dir", defaults.questions.raw_dir)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.directory", defaults.logging.directory)?
            .set_default("logging.file_name", defaults.logging.file_name)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("QUIZBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::QuizBotError> {
        super::validation::validate_settings(self)
    }
}

impl VkConfig {
    /// Default API endpoint and version
    pub const API_URL: &'static str = "https://api.vk.com/method";
    pub const API_VERSION: &'static str = "5.199";

    /// Build a VK config with default endpoint settings
    pub fn new(token: impl Into<String>, group_id: u64) -> Self {
        Self {
            token: token.into(),
            group_id,
            api_url: Self::API_URL.to_string(),
            api_version: Self::API_VERSION.to_string(),
            wait_seconds: default_vk_wait_seconds(),
            timeout_seconds: default_vk_timeout_seconds(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                token: String::new(),
                admin_chat_id: None,
            },
            vk: None,
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "quizbot:".to_string(),
                ttl_seconds: None,
            },
            questions: QuestionsConfig {
                json_path: "questions.json".to_string(),
                raw_dir: "questions".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_name: "quizbot.log".to_string(),
            },
        }
    }
}
