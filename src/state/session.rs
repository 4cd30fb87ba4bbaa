//! Per-user quiz session
//!
//! A session records the question currently posed to a user and where the
//! conversation stands. It is created on the first question request and
//! overwritten on every following one.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messaging platform a user talks through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Telegram,
    Vk,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Telegram => "tg",
            Platform::Vk => "vk",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one user's session across platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub platform: Platform,
    pub user_id: i64,
}

impl SessionKey {
    pub fn telegram(user_id: i64) -> Self {
        Self { platform: Platform::Telegram, user_id }
    }

    pub fn vk(user_id: i64) -> Self {
        Self { platform: Platform::Vk, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.user_id)
    }
}

/// Where the conversation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Ready for a new-question request
    #[default]
    AwaitingRequest,
    /// A question is outstanding
    AwaitingAnswer,
}

/// Stored session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Text of the last question posed
    pub question: String,
    pub state: ConversationState,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Session with an outstanding question
    pub fn awaiting_answer(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            state: ConversationState::AwaitingAnswer,
            updated_at: Utc::now(),
        }
    }

    /// Whether an answer is expected
    pub fn is_awaiting_answer(&self) -> bool {
        self.state == ConversationState::AwaitingAnswer
    }

    /// Same question, ready for the next request
    pub fn resolved(&self) -> Self {
        Self {
            question: self.question.clone(),
            state: ConversationState::AwaitingRequest,
            updated_at: Utc::now(),
        }
    }
}
