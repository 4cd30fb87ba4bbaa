//! Error handling for QuizBot
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for QuizBot application
#[derive(Error, Debug)]
pub enum QuizBotError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("VK API error: {0}")]
    Vk(#[from] VkError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Question bank is empty")]
    EmptyQuestionBank,

    #[error("Question is not in the bank: {0}")]
    UnknownQuestion(String),

    #[error("No active question for {user}")]
    NoActiveQuestion { user: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// VK API specific errors
#[derive(Error, Debug)]
pub enum VkError {
    #[error("VK API returned error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("VK request timed out")]
    Timeout,

    #[error("VK service unavailable")]
    ServiceUnavailable,

    #[error("VK request failed: {0}")]
    RequestFailed(String),

    #[error("Long poll failed with code {0}")]
    LongPollFailed(i64),

    #[error("Invalid VK response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for QuizBot operations
pub type Result<T> = std::result::Result<T, QuizBotError>;

impl QuizBotError {
    /// Check if the error is a transport failure worth retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            QuizBotError::Telegram(_) => true,
            QuizBotError::Vk(e) => e.is_transport(),
            QuizBotError::Redis(_) => true,
            QuizBotError::Http(_) => true,
            QuizBotError::Io(_) => true,
            QuizBotError::Serialization(_) => false,
            QuizBotError::UrlParse(_) => false,
            QuizBotError::Config(_) => false,
            QuizBotError::EmptyQuestionBank => false,
            QuizBotError::UnknownQuestion(_) => false,
            QuizBotError::NoActiveQuestion { .. } => false,
            QuizBotError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            QuizBotError::Config(_) => ErrorSeverity::Critical,
            QuizBotError::EmptyQuestionBank => ErrorSeverity::Critical,
            QuizBotError::NoActiveQuestion { .. } => ErrorSeverity::Info,
            QuizBotError::InvalidInput(_) => ErrorSeverity::Info,
            e if e.is_recoverable() => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

impl VkError {
    /// Whether the failure happened on the wire rather than in the API itself
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VkError::Timeout | VkError::ServiceUnavailable | VkError::RequestFailed(_) | VkError::LongPollFailed(_)
        )
    }
}

impl From<reqwest::Error> for VkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VkError::Timeout
        } else if e.is_connect() {
            VkError::ServiceUnavailable
        } else if e.is_decode() {
            VkError::InvalidResponse(e.to_string())
        } else {
            VkError::RequestFailed(e.to_string())
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
