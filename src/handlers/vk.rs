//! VK long poll loop
//!
//! Receives community messages through the Bots Long Poll API and answers
//! them through the quiz service.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use crate::services::{IncomingMessage, LongPollServer, QuizService, VkClient};
use crate::state::{SessionKey, SessionStore};
use crate::utils::errors::{ErrorSeverity, Result, VkError};
use crate::utils::logging::log_user_action;

/// Pause before reconnecting after a failure
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// VK side of the bot
pub struct VkBot<S> {
    client: VkClient,
    quiz: Arc<QuizService<S>>,
    reconnect_delay: Duration,
}

impl<S: SessionStore> VkBot<S> {
    pub fn new(client: VkClient, quiz: Arc<QuizService<S>>) -> Self {
        Self { client, quiz, reconnect_delay: RECONNECT_DELAY }
    }

    /// Override the pause between reconnect attempts
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Poll forever, reconnecting after any failure
    pub async fn run(&self) {
        info!(group_id = self.client.config().group_id, "Starting VK long poll");

        loop {
            match self.listen().await {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "VK long poll interrupted, reconnecting");
                }
                Err(e) => {
                    error!(error = ?e, "VK long poll failed, reconnecting");
                }
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Obtain a long poll server and keep polling it
    async fn listen(&self) -> Result<()> {
        let mut server = self.client.get_long_poll_server().await?;
        loop {
            self.poll_once(&mut server).await?;
        }
    }

    /// Run one long poll request and dispatch its messages.
    ///
    /// Returns the number of messages handled. The server's `ts` is advanced,
    /// and the server itself is refreshed when VK reports the key expired.
    pub async fn poll_once(&self, server: &mut LongPollServer) -> Result<usize> {
        let response = self.client.poll(server).await?;

        match response.failed {
            None => {}
            Some(1) => {
                debug!("VK event history outdated, continuing from new ts");
                if let Some(ts) = response.ts {
                    server.ts = ts;
                }
                return Ok(0);
            }
            Some(code @ (2 | 3)) => {
                debug!(code = code, "VK long poll key expired, requesting new server");
                *server = self.client.get_long_poll_server().await?;
                return Ok(0);
            }
            Some(code) => return Err(VkError::LongPollFailed(code).into()),
        }

        if let Some(ts) = response.ts {
            server.ts = ts;
        }

        let mut handled = 0;
        for update in &response.updates {
            let message = match update.message() {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed VK event");
                    continue;
                }
            };

            if let Err(e) = self.handle_message(&message).await {
                match e.severity() {
                    ErrorSeverity::Info | ErrorSeverity::Warning => {
                        warn!(error = %e, from_id = message.from_id, "Failed to handle VK message");
                    }
                    _ => error!(error = %e, from_id = message.from_id, "Error handling VK message"),
                }
            }
            handled += 1;
        }

        Ok(handled)
    }

    /// Answer a single private message
    pub async fn handle_message(&self, message: &IncomingMessage) -> Result<()> {
        // Non-positive ids belong to communities
        if message.from_id <= 0 {
            return Ok(());
        }
        // Group conversations have their own peer id
        if message.peer_id != message.from_id {
            debug!(from_id = message.from_id, peer_id = message.peer_id, "Ignoring group conversation message");
            return Ok(());
        }

        let key = SessionKey::vk(message.from_id);
        debug!(user = %key, peer_id = message.peer_id, "Processing VK message");

        let replies = self.quiz.handle_text(&key, &message.text).await?;
        for reply in &replies {
            self.client.send_message(message.peer_id, reply).await?;
        }

        log_user_action(&key, "message", Some(&message.text));
        Ok(())
    }
}
