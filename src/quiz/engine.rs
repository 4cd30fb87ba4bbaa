//! Conversation engine
//!
//! Pure functions of `(session, message, bank)` that decide what to reply,
//! which state comes next and which session record to persist. Platform
//! adapters supply only the transport around them.

use rand::Rng;
use tracing::debug;
use crate::state::{ConversationState, Session, SessionKey};
use crate::utils::errors::{QuizBotError, Result};
use super::answer::{full_answer, is_correct};
use super::bank::QuestionBank;
use super::{CANCELLED, CORRECT, GIVE_UP, GIVE_UP_PREFIX, GREETING, INCORRECT, MY_SCORE, NEW_QUESTION};

/// One outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Attach the menu keyboard
    pub menu: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), menu: false }
    }

    pub fn with_menu(text: impl Into<String>) -> Self {
        Self { text: text.into(), menu: true }
    }

    /// Fixed greeting with the menu keyboard
    pub fn greeting() -> Self {
        Self::with_menu(GREETING)
    }
}

/// Outcome of handling one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Messages to send, in order
    pub replies: Vec<Reply>,
    /// State after this turn
    pub state: ConversationState,
    /// Record to persist, if it changed
    pub session: Option<Session>,
}

/// Park an outstanding question so the next message is not judged against it
fn park(session: Option<&Session>) -> Option<Session> {
    session
        .filter(|session| session.is_awaiting_answer())
        .map(Session::resolved)
}

fn state_of(session: Option<&Session>) -> ConversationState {
    session.map(|session| session.state).unwrap_or_default()
}

/// Greet the user and show the menu
pub fn begin(key: &SessionKey, session: Option<&Session>) -> Turn {
    debug!(user = %key, "Starting conversation");
    Turn {
        replies: vec![Reply::greeting()],
        state: ConversationState::AwaitingRequest,
        session: park(session),
    }
}

/// Abandon the outstanding question
pub fn cancel(key: &SessionKey, session: Option<&Session>) -> Turn {
    debug!(user = %key, "Cancelling conversation");
    Turn {
        replies: vec![Reply::text(CANCELLED), Reply::greeting()],
        state: ConversationState::AwaitingRequest,
        session: park(session),
    }
}

/// Pose a random question and remember it for the user
pub fn request_question<R: Rng + ?Sized>(
    key: &SessionKey,
    bank: &QuestionBank,
    rng: &mut R,
) -> Result<Turn> {
    let question = bank.random_question(rng)?;
    debug!(user = %key, "Posing new question");

    Ok(Turn {
        replies: vec![Reply::text(question)],
        state: ConversationState::AwaitingAnswer,
        session: Some(Session::awaiting_answer(question)),
    })
}

/// Judge an answer attempt against the user's outstanding question
pub fn submit_answer(
    key: &SessionKey,
    session: Option<&Session>,
    text: &str,
    bank: &QuestionBank,
) -> Result<Turn> {
    let session = session
        .filter(|session| session.is_awaiting_answer())
        .ok_or_else(|| QuizBotError::NoActiveQuestion { user: key.to_string() })?;

    let answer = bank
        .answer(&session.question)
        .ok_or_else(|| QuizBotError::UnknownQuestion(session.question.clone()))?;

    if is_correct(answer, text) {
        debug!(user = %key, "Answer is correct");
        return Ok(Turn {
            replies: vec![Reply::text(CORRECT), Reply::greeting()],
            state: ConversationState::AwaitingRequest,
            session: Some(session.resolved()),
        });
    }

    if text == GIVE_UP {
        debug!(user = %key, "User gave up");
        return Ok(Turn {
            replies: vec![
                Reply::text(format!("{}{}", GIVE_UP_PREFIX, full_answer(answer))),
                Reply::greeting(),
            ],
            state: ConversationState::AwaitingRequest,
            session: Some(session.resolved()),
        });
    }

    debug!(user = %key, "Answer is incorrect");
    Ok(Turn {
        replies: vec![Reply::text(INCORRECT)],
        state: ConversationState::AwaitingAnswer,
        session: None,
    })
}

/// Route an inbound text the way every adapter does
pub fn respond<R: Rng + ?Sized>(
    key: &SessionKey,
    session: Option<&Session>,
    text: &str,
    bank: &QuestionBank,
    rng: &mut R,
) -> Result<Turn> {
    match text {
        NEW_QUESTION => request_question(key, bank, rng),
        MY_SCORE => {
            debug!(user = %key, "Score requested, nothing to report");
            Ok(Turn {
                replies: Vec::new(),
                state: state_of(session),
                session: None,
            })
        }
        _ => submit_answer(key, session, text, bank),
    }
}
