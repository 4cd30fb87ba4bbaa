//! QuizBot
//!
//! Main application entry point: runs the Telegram dispatcher and, when
//! configured, the VK long poll loop against one shared session store.

use std::sync::Arc;
use teloxide::{prelude::*, types::{ChatId, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use QuizBot::{
    config::Settings,
    handlers::{commands::{self, Command}, messages::handle_message, VkBot},
    quiz::QuestionBank,
    services::{QuizService, VkClient},
    state::RedisSessionStore,
    utils::{helpers::mask_secret, logging::{self, TelegramAlertLayer}},
};

type Store = RedisSessionStore;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    let bot = Bot::new(&settings.telegram.token);

    // Initialize logging
    let alerts = settings
        .telegram
        .admin_chat_id
        .map(|chat_id| TelegramAlertLayer::spawn(bot.clone(), ChatId(chat_id)));
    let _log_guard = logging::init_logging(&settings.logging, alerts)?;

    info!("Starting {}...", QuizBot::info());

    // Load questions
    info!(path = %settings.questions.json_path, "Loading question bank...");
    let bank = Arc::new(QuestionBank::load(&settings.questions.json_path).await?);

    // Initialize session storage
    info!("Connecting to Redis...");
    let store = RedisSessionStore::new(settings.redis.clone()).await?;
    store.test_connection().await?;

    let quiz = Arc::new(QuizService::new(bank, store));

    let vk_bot = match settings.vk.clone() {
        Some(vk_config) => {
            info!(group_id = vk_config.group_id, token = %mask_secret(&vk_config.token), "VK adapter enabled");
            Some(VkBot::new(VkClient::new(vk_config)?, quiz.clone()))
        }
        None => {
            info!("VK adapter not configured, running Telegram only");
            None
        }
    };

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![quiz])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error in Telegram handler"))
        .enable_ctrlc_handler()
        .build();

    info!("QuizBot is ready!");

    match vk_bot {
        Some(vk_bot) => {
            tokio::select! {
                _ = dispatcher.dispatch() => {}
                _ = vk_bot.run() => {}
            }
        }
        None => dispatcher.dispatch().await,
    }

    info!("QuizBot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .branch(
            // Handle commands
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_commands)
        )
        .branch(
            // Handle regular messages
            dptree::endpoint(handle_messages)
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    quiz: Arc<QuizService<Store>>,
) -> HandlerResult {
    if let Err(e) = commands::handle_command(bot, msg, cmd, quiz).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    quiz: Arc<QuizService<Store>>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, quiz).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}
