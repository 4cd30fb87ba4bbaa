//! Command handlers module
//!
//! This module contains handlers for the bot commands /start, /help and /cancel.

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::services::QuizService;
use crate::state::SessionStore;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды викторины:")]
pub enum Command {
    #[command(description = "Начать викторину")]
    Start,
    #[command(description = "Показать справку")]
    Help,
    #[command(description = "Отказаться от текущего вопроса")]
    Cancel,
}

/// Main command dispatcher
pub async fn handle_command<S: SessionStore>(
    bot: Bot,
    msg: Message,
    cmd: Command,
    quiz: Arc<QuizService<S>>,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, quiz).await,
        Command::Help => help::handle_help(bot, msg).await,
        Command::Cancel => start::handle_cancel(bot, msg, quiz).await,
    }
}
