//! Quiz service
//!
//! Glue shared by both platform adapters: load the user's session, run the
//! conversation engine, persist what it returns and hand back the replies.

use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::quiz::{engine, QuestionBank, Reply, Turn, NO_ACTIVE_QUESTION};
use crate::state::{SessionKey, SessionStore};
use crate::utils::errors::{QuizBotError, Result};

/// Runs quiz conversations against a session store
#[derive(Debug)]
pub struct QuizService<S> {
    bank: Arc<QuestionBank>,
    store: S,
}

impl<S: SessionStore> QuizService<S> {
    /// Create a new QuizService instance
    pub fn new(bank: Arc<QuestionBank>, store: S) -> Self {
        Self { bank, store }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Greet the user and show the menu
    pub async fn start(&self, key: &SessionKey) -> Result<Vec<Reply>> {
        let session = self.store.load(key).await?;
        let turn = engine::begin(key, session.as_ref());
        self.commit(key, turn).await
    }

    /// Abandon the outstanding question
    pub async fn cancel(&self, key: &SessionKey) -> Result<Vec<Reply>> {
        let session = self.store.load(key).await?;
        let turn = engine::cancel(key, session.as_ref());
        self.commit(key, turn).await
    }

    /// Handle a plain text message
    pub async fn handle_text(&self, key: &SessionKey, text: &str) -> Result<Vec<Reply>> {
        let session = self.store.load(key).await?;

        let outcome = {
            let mut rng = rand::thread_rng();
            engine::respond(key, session.as_ref(), text, &self.bank, &mut rng)
        };

        match outcome {
            Ok(turn) => self.commit(key, turn).await,
            Err(QuizBotError::NoActiveQuestion { user }) => {
                warn!(user = %user, "Answer received without an active question");
                Ok(vec![Reply::with_menu(NO_ACTIVE_QUESTION)])
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the turn's session and return its replies
    async fn commit(&self, key: &SessionKey, turn: Turn) -> Result<Vec<Reply>> {
        if let Some(session) = &turn.session {
            self.store.save(key, session).await?;
            info!(user = %key, state = ?turn.state, "Session updated");
        } else {
            debug!(user = %key, state = ?turn.state, "Session unchanged");
        }
        Ok(turn.replies)
    }
}
