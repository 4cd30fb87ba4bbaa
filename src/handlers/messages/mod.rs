//! Message handlers module
//!
//! Handles incoming text messages: menu buttons and answers alike go
//! through the quiz service.

use std::sync::Arc;
use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::handlers::{commands::start::sender_key, send_replies};
use crate::services::QuizService;
use crate::state::SessionStore;
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Handle incoming text messages
pub async fn handle_message<S: SessionStore>(
    bot: Bot,
    msg: Message,
    quiz: Arc<QuizService<S>>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = ?msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let key = sender_key(&msg)?;
    debug!(user = %key, chat_id = ?msg.chat.id, "Processing message");

    let replies = quiz.handle_text(&key, text).await?;
    send_replies(&bot, msg.chat.id, &replies).await?;

    log_user_action(&key, "message", Some(text));
    Ok(())
}
