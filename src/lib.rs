//! QuizBot
//!
//! A quiz chatbot for Telegram and VK. Users request a random question from
//! a bank, answer it, and get told whether they were right. Each user's
//! current question lives in Redis so both platforms share one store.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod state;
pub mod quiz;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{QuizBotError, Result};

// Re-export main components for easy access
pub use quiz::QuestionBank;
pub use services::{QuizService, VkClient};
pub use state::{RedisSessionStore, SessionKey, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
