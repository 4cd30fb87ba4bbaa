//! Start command handler
//!
//! Handles /start, which greets the user and shows the quiz menu, and
//! /cancel, which abandons the outstanding question.

use std::sync::Arc;
use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::handlers::send_replies;
use crate::services::QuizService;
use crate::state::{SessionKey, SessionStore};
use crate::utils::errors::{QuizBotError, Result};
use crate::utils::logging::log_user_action;

/// Resolve the session key for the message author
pub(crate) fn sender_key(msg: &Message) -> Result<SessionKey> {
    let user = msg.from.as_ref().ok_or_else(|| {
        QuizBotError::InvalidInput("No user in message".to_string())
    })?;
    Ok(SessionKey::telegram(user.id.0 as i64))
}

/// Handle /start command
pub async fn handle_start<S: SessionStore>(
    bot: Bot,
    msg: Message,
    quiz: Arc<QuizService<S>>,
) -> Result<()> {
    let key = sender_key(&msg)?;
    debug!(user = %key, chat_id = ?msg.chat.id, "Processing /start command");

    let replies = quiz.start(&key).await?;
    send_replies(&bot, msg.chat.id, &replies).await?;

    log_user_action(&key, "start", None);
    Ok(())
}

/// Handle /cancel command
pub async fn handle_cancel<S: SessionStore>(
    bot: Bot,
    msg: Message,
    quiz: Arc<QuizService<S>>,
) -> Result<()> {
    let key = sender_key(&msg)?;
    debug!(user = %key, chat_id = ?msg.chat.id, "Processing /cancel command");

    let replies = quiz.cancel(&key).await?;
    send_replies(&bot, msg.chat.id, &replies).await?;

    log_user_action(&key, "cancel", None);
    Ok(())
}
