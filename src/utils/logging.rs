//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the QuizBot application. Besides stdout and a daily rolling file, WARN
//! and ERROR events can be forwarded to an administrator's Telegram chat.

use std::fmt::{self, Write as _};
use teloxide::{prelude::*, types::ChatId};
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{info, Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;
use crate::state::SessionKey;
use crate::utils::errors::{QuizBotError, Result};
use crate::utils::helpers::truncate_text;

/// Telegram's message length limit
const ALERT_MAX_CHARS: usize = 4096;

/// Targets whose events are never forwarded; failures of the alert
/// request itself would otherwise feed back into the channel.
const QUIET_TARGETS: &[&str] = &["teloxide", "reqwest", "hyper"];

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped and must be
/// held for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig, alerts: Option<TelegramAlertLayer>) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| QuizBotError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let forwarding = alerts.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer::layer().with_writer(std::io::stdout))
        .with(fmt_layer::layer().with_ansi(false).with_writer(non_blocking))
        .with(alerts)
        .try_init()
        .map_err(|e| QuizBotError::Config(format!("Failed to install logger: {}", e)))?;

    info!(level = %config.level, alerts = forwarding, "Logging initialized");
    Ok(guard)
}

/// Layer that queues WARN and ERROR events for delivery to Telegram
#[derive(Debug, Clone)]
pub struct TelegramAlertLayer {
    sender: mpsc::UnboundedSender<String>,
}

impl TelegramAlertLayer {
    /// Create the layer and spawn the task delivering its alerts to `chat_id`
    pub fn spawn(bot: Bot, chat_id: ChatId) -> Self {
        let (layer, receiver) = Self::channel();
        tokio::spawn(forward_alerts(bot, chat_id, receiver));
        layer
    }

    /// Create the layer with the receiving end of its queue
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<S: Subscriber> Layer<S> for TelegramAlertLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > Level::WARN {
            return;
        }
        if QUIET_TARGETS.iter().any(|target| meta.target().starts_with(target)) {
            return;
        }

        let mut visitor = AlertVisitor::default();
        event.record(&mut visitor);

        let text = format!("{} {}: {}", meta.level(), meta.target(), visitor.finish());
        // Closed receiver means the forwarder is gone; nothing left to do
        let _ = self.sender.send(truncate_text(&text, ALERT_MAX_CHARS));
    }
}

/// Deliver queued alerts until every sender is dropped
async fn forward_alerts(bot: Bot, chat_id: ChatId, mut receiver: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = receiver.recv().await {
        if let Err(e) = bot.send_message(chat_id, text).await {
            // INFO so the failure is not queued again
            info!(error = %e, "Failed to deliver alert to admin chat");
        }
    }
}

#[derive(Default)]
struct AlertVisitor {
    message: String,
    fields: String,
}

impl AlertVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for AlertVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Log user actions with structured data
pub fn log_user_action(user: &SessionKey, action: &str, details: Option<&str>) {
    info!(
        user = %user,
        action = action,
        details = details,
        "User action performed"
    );
}
