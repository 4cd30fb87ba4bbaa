//! Bot handlers module
//!
//! This module contains the platform adapters organized by type:
//! - Command handlers for Telegram bot commands
//! - Message handlers for Telegram text messages
//! - The VK long poll loop

pub mod commands;
pub mod messages;
pub mod vk;

use teloxide::{prelude::*, types::{ChatId, KeyboardButton, KeyboardMarkup}};
use crate::quiz::{Reply, MENU_LAYOUT};
use crate::utils::errors::Result;

// Re-export commonly used handler functions
pub use commands::*;
pub use messages::*;
pub use vk::VkBot;

/// The quiz menu as a Telegram reply keyboard
pub fn menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(
        MENU_LAYOUT
            .iter()
            .map(|row| row.iter().map(|&label| KeyboardButton::new(label)).collect::<Vec<_>>()),
    )
}

/// Send replies in order, attaching the menu where asked
pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: &[Reply]) -> Result<()> {
    for reply in replies {
        if reply.menu {
            bot.send_message(chat_id, reply.text.clone())
                .reply_markup(menu_keyboard())
                .await?;
        } else {
            bot.send_message(chat_id, reply.text.clone()).await?;
        }
    }
    Ok(())
}
