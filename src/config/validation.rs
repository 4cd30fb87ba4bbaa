//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{QuizBotError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_telegram_config(&settings.telegram)?;
    validate_redis_config(&settings.redis)?;
    validate_questions_config(&settings.questions)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref vk_config) = settings.vk {
        validate_vk_config(vk_config)?;
    }

    Ok(())
}

/// Validate Telegram configuration
fn validate_telegram_config(config: &super::TelegramConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(QuizBotError::Config(
            "Telegram bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate VK configuration
fn validate_vk_config(config: &super::VkConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(QuizBotError::Config(
            "VK token is required when the vk section is present".to_string()
        ));
    }

    if config.group_id == 0 {
        return Err(QuizBotError::Config(
            "VK group ID must be greater than 0".to_string()
        ));
    }

    if !(1..=90).contains(&config.wait_seconds) {
        return Err(QuizBotError::Config(
            format!("VK long poll wait must be between 1 and 90 seconds, got {}", config.wait_seconds)
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(QuizBotError::Config(
            "VK timeout must be greater than 0".to_string()
        ));
    }

    url::Url::parse(&config.api_url)?;

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(QuizBotError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if config.ttl_seconds == Some(0) {
        return Err(QuizBotError::Config(
            "Session TTL must be greater than 0 when set".to_string()
        ));
    }

    Ok(())
}

/// Validate question bank configuration
fn validate_questions_config(config: &super::QuestionsConfig) -> Result<()> {
    if config.json_path.is_empty() {
        return Err(QuizBotError::Config(
            "Question bank path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(QuizBotError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(QuizBotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
