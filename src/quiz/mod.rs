//! Quiz core
//!
//! The question bank, the answer-matching rule, and the two-state
//! conversation engine shared by every platform adapter.

pub mod answer;
pub mod bank;
pub mod corpus;
pub mod engine;

pub use answer::{full_answer, is_correct, short_answer};
pub use bank::QuestionBank;
pub use engine::{Reply, Turn};

/// Button that requests a new question
pub const NEW_QUESTION: &str = "Новый вопрос";

/// Button that reveals the answer
pub const GIVE_UP: &str = "Сдаться";

/// Score button, accepted and ignored
pub const MY_SCORE: &str = "Мой счёт";

/// Reply keyboard layout, row by row
pub const MENU_LAYOUT: &[&[&str]] = &[&[NEW_QUESTION, GIVE_UP], &[MY_SCORE]];

pub const GREETING: &str = "Напряги извилины";
pub const CORRECT: &str = "Правильно!";
pub const INCORRECT: &str = "Неправильно. Попробуйте ещё раз.";
pub const GIVE_UP_PREFIX: &str = "Правильный ответ: ";
pub const CANCELLED: &str = "Если хотите, можете начать заново с /start.";
pub const NO_ACTIVE_QUESTION: &str = "Чтобы получить вопрос, нажмите «Новый вопрос».";
