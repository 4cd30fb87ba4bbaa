//! Help command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let help_text = "🧠 Викторина\n\n\
        /start - показать меню\n\
        /cancel - отказаться от текущего вопроса\n\
        /help - эта справка\n\n\
        Нажмите «Новый вопрос», чтобы получить вопрос, и отправьте ответ сообщением. \
        «Сдаться» покажет правильный ответ.";

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
