//! Complete quiz sessions through the service layer

use std::sync::Arc;
use serial_test::serial;
use QuizBot::config::RedisConfig;
use QuizBot::quiz::{QuestionBank, Reply, CORRECT, GREETING, INCORRECT, NO_ACTIVE_QUESTION};
use QuizBot::services::QuizService;
use QuizBot::state::{ConversationState, MemorySessionStore, RedisSessionStore, SessionKey, SessionStore};

use crate::helpers::{init_test_logging, quiz_service, QUESTION};

fn three_question_bank() -> Arc<QuestionBank> {
    Arc::new(
        QuestionBank::from_pairs(vec![
            ("Столица Франции?".to_string(), "Ответ: Париж.".to_string()),
            ("Сколько будет дважды два?".to_string(), "Ответ:\n4. Зачёт: четыре.".to_string()),
            ("Автор «Войны и мира»?".to_string(), "Ответ: Толстой. Лев Николаевич.".to_string()),
        ])
        .unwrap(),
    )
}

#[tokio::test]
async fn test_full_session_with_retries() {
    init_test_logging();
    let quiz = quiz_service();
    let key = SessionKey::telegram(1);

    assert_eq!(quiz.start(&key).await.unwrap(), vec![Reply::greeting()]);

    let replies = quiz.handle_text(&key, "Новый вопрос").await.unwrap();
    assert_eq!(replies, vec![Reply::text(QUESTION)]);

    for attempt in ["Лермонтов", "Гоголь", ""] {
        let replies = quiz.handle_text(&key, attempt).await.unwrap();
        assert_eq!(replies, vec![Reply::text(INCORRECT)]);
    }

    let replies = quiz.handle_text(&key, "ПУШКИН!").await.unwrap();
    assert_eq!(replies, vec![Reply::text(CORRECT), Reply::with_menu(GREETING)]);

    // The resolved question is no longer judged
    let replies = quiz.handle_text(&key, "Пушкин").await.unwrap();
    assert_eq!(replies, vec![Reply::with_menu(NO_ACTIVE_QUESTION)]);
}

#[tokio::test]
async fn test_every_question_can_be_answered() {
    init_test_logging();
    let quiz = QuizService::new(three_question_bank(), MemorySessionStore::new());
    let key = SessionKey::vk(2);

    for _ in 0..20 {
        quiz.handle_text(&key, "Новый вопрос").await.unwrap();
        let session = quiz.store().load(&key).await.unwrap().unwrap();
        assert_eq!(session.state, ConversationState::AwaitingAnswer);

        let answer = quiz.bank().answer(&session.question).unwrap();
        let attempt = format!("кажется, {}", QuizBot::quiz::short_answer(answer).to_lowercase());

        let replies = quiz.handle_text(&key, &attempt).await.unwrap();
        assert_eq!(replies[0].text, CORRECT);
    }
}

#[tokio::test]
async fn test_only_latest_question_is_answerable() {
    init_test_logging();
    let quiz = QuizService::new(three_question_bank(), MemorySessionStore::new());
    let key = SessionKey::telegram(3);

    quiz.handle_text(&key, "Новый вопрос").await.unwrap();
    let first = quiz.store().load(&key).await.unwrap().unwrap().question;

    // Keep requesting until a different question replaces the first one
    let mut latest = first.clone();
    for _ in 0..200 {
        quiz.handle_text(&key, "Новый вопрос").await.unwrap();
        latest = quiz.store().load(&key).await.unwrap().unwrap().question;
        if latest != first {
            break;
        }
    }
    assert_ne!(latest, first, "a different question should eventually be posed");

    let stale_answer = QuizBot::quiz::short_answer(quiz.bank().answer(&first).unwrap()).to_string();
    let replies = quiz.handle_text(&key, &stale_answer).await.unwrap();
    assert_eq!(replies, vec![Reply::text(INCORRECT)]);

    let session = quiz.store().load(&key).await.unwrap().unwrap();
    assert_eq!(session.question, latest);
    assert_eq!(session.state, ConversationState::AwaitingAnswer);

    let current_answer = QuizBot::quiz::short_answer(quiz.bank().answer(&latest).unwrap()).to_string();
    let replies = quiz.handle_text(&key, &current_answer).await.unwrap();
    assert_eq!(replies[0].text, CORRECT);
}

#[tokio::test]
async fn test_concurrent_users_do_not_interfere() {
    init_test_logging();
    let quiz = QuizService::new(three_question_bank(), MemorySessionStore::new());
    let quiz = Arc::new(quiz);

    let mut tasks = Vec::new();
    for user_id in 0..10 {
        let quiz = quiz.clone();
        tasks.push(tokio::spawn(async move {
            let key = SessionKey::telegram(user_id);
            quiz.handle_text(&key, "Новый вопрос").await.unwrap();
            let question = quiz.store().load(&key).await.unwrap().unwrap().question;
            let answer = quiz.bank().answer(&question).unwrap().to_string();
            quiz.handle_text(&key, QuizBot::quiz::short_answer(&answer)).await.unwrap()
        }));
    }

    for task in tasks {
        let replies = task.await.unwrap();
        assert_eq!(replies[0].text, CORRECT);
    }
    assert_eq!(quiz.store().len().await, 10);
}

/// Requires a Redis server at REDIS_URL (default redis://localhost:6379)
#[tokio::test]
#[serial]
#[ignore]
async fn test_session_survives_in_redis() {
    init_test_logging();
    let config = RedisConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        prefix: "quizbot_test:".to_string(),
        ttl_seconds: Some(60),
    };
    let key = SessionKey::telegram(424242);

    let store = RedisSessionStore::new(config.clone()).await.unwrap();
    let quiz = QuizService::new(three_question_bank(), store);
    quiz.handle_text(&key, "Новый вопрос").await.unwrap();
    let question = quiz.store().load(&key).await.unwrap().unwrap().question;

    // A fresh connection sees the same question
    let store = RedisSessionStore::new(config).await.unwrap();
    let quiz = QuizService::new(three_question_bank(), store);
    let answer = quiz.bank().answer(&question).unwrap().to_string();

    let replies = quiz.handle_text(&key, QuizBot::quiz::short_answer(&answer)).await.unwrap();
    assert_eq!(replies[0].text, CORRECT);
}
