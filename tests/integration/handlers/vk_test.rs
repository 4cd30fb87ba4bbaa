//! Integration tests for the VK client and long poll loop

use std::time::Duration;
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{matchers::{method, path}, Mock, ResponseTemplate};
use QuizBot::handlers::VkBot;
use QuizBot::quiz::{Reply, GREETING};
use QuizBot::services::IncomingMessage;
use QuizBot::state::{ConversationState, SessionKey, SessionStore};
use QuizBot::utils::errors::{QuizBotError, VkError};

use crate::helpers::{
    init_test_logging, message_new, pose_question, quiz_service, VkMockServer, QUESTION, TEST_GROUP_ID,
};

const VK_USER_ID: i64 = 55501;

#[tokio::test]
async fn test_get_long_poll_server() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_long_poll_server("server_key", 1u64).await;

    let server = vk.create_client().get_long_poll_server().await.unwrap();
    assert_eq!(server.key, "server_key");
    assert_eq!(server.ts, "100");
    assert!(server.server.ends_with("/longpoll"));

    let requests = vk.server.received_requests().await.unwrap();
    let form = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(form.contains(&format!("group_id={}", TEST_GROUP_ID)));
    assert!(form.contains("access_token=vk_test_token"));
    assert!(form.contains("v=5.199"));
}

#[tokio::test]
async fn test_api_error_envelope() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_api_error("groups.getLongPollServer", 5, "User authorization failed").await;

    let error = vk.create_client().get_long_poll_server().await.unwrap_err();
    assert!(!error.is_recoverable());
    assert_matches!(error, QuizBotError::Vk(VkError::Api { code: 5, .. }));
}

/// Number of `groups.getLongPollServer` calls the mock received
async fn handshake_count(vk: &VkMockServer) -> usize {
    vk.server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.url.path() == "/method/groups.getLongPollServer")
        .count()
}

#[tokio::test]
async fn test_run_reconnects_after_api_error() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_api_error("groups.getLongPollServer", 10, "Internal server error").await;

    let bot = VkBot::new(vk.create_client(), quiz_service())
        .with_reconnect_delay(Duration::from_millis(20));

    let outcome = tokio::time::timeout(Duration::from_millis(500), bot.run()).await;
    assert!(outcome.is_err(), "run must keep going after an API error");
    assert!(handshake_count(&vk).await >= 2);
}

#[tokio::test]
async fn test_run_reconnects_after_malformed_poll_body() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_long_poll_server("key", 2u64..).await;
    Mock::given(method("GET"))
        .and(path("/longpoll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
        .mount(&vk.server)
        .await;

    let bot = VkBot::new(vk.create_client(), quiz_service())
        .with_reconnect_delay(Duration::from_millis(20));

    let outcome = tokio::time::timeout(Duration::from_millis(500), bot.run()).await;
    assert!(outcome.is_err(), "run must keep going after a malformed poll response");
    assert!(handshake_count(&vk).await >= 2);
}

#[tokio::test]
async fn test_send_message_with_keyboard() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_send_message(2).await;
    let client = vk.create_client();

    let message_id = client.send_message(VK_USER_ID, &Reply::greeting()).await.unwrap();
    assert_eq!(message_id, 1);
    client.send_message(VK_USER_ID, &Reply::text("Правильно!")).await.unwrap();

    let sent = vk.sent_messages().await;
    assert!(sent[0].contains(&format!("peer_id={}", VK_USER_ID)));
    assert!(sent[0].contains("random_id="));
    assert!(sent[0].contains("keyboard="));
    assert!(!sent[1].contains("keyboard="));
}

#[tokio::test]
async fn test_correct_answer_sends_two_messages() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(message_new(VK_USER_ID, "Пушкин", "101")).await;
    vk.mock_send_message(2).await;

    let quiz = quiz_service();
    let key = SessionKey::vk(VK_USER_ID);
    pose_question(&quiz, &key).await;

    let bot = VkBot::new(vk.create_client(), quiz.clone());
    let mut server = vk.long_poll_server("key", "100");

    let handled = bot.poll_once(&mut server).await.unwrap();
    assert_eq!(handled, 1);
    assert_eq!(server.ts, "101");

    let session = quiz.store().load(&key).await.unwrap().unwrap();
    assert_eq!(session.state, ConversationState::AwaitingRequest);
    assert_eq!(session.question, QUESTION);
}

#[tokio::test]
async fn test_new_question_request() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_send_message(1).await;

    let quiz = quiz_service();
    let bot = VkBot::new(vk.create_client(), quiz.clone());

    bot.handle_message(&IncomingMessage {
        from_id: VK_USER_ID,
        peer_id: VK_USER_ID,
        text: "Новый вопрос".to_string(),
    })
    .await
    .unwrap();

    let sent = vk.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].contains("keyboard="));

    let session = quiz.store().load(&SessionKey::vk(VK_USER_ID)).await.unwrap().unwrap();
    assert_eq!(session.question, QUESTION);
}

#[tokio::test]
async fn test_sessions_are_separate_per_platform() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_send_message(1).await;

    let quiz = quiz_service();
    // Same numeric id, but the question was posed on Telegram
    pose_question(&quiz, &SessionKey::telegram(VK_USER_ID)).await;

    let bot = VkBot::new(vk.create_client(), quiz.clone());
    bot.handle_message(&IncomingMessage {
        from_id: VK_USER_ID,
        peer_id: VK_USER_ID,
        text: "Пушкин".to_string(),
    })
    .await
    .unwrap();

    // Prompted for a question instead of being judged
    let sent = vk.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("keyboard="));
    assert!(!sent[0].contains(&form_value(GREETING)));
}

#[tokio::test]
async fn test_community_messages_are_ignored() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(message_new(-(TEST_GROUP_ID as i64), "Новый вопрос", "101")).await;
    vk.mock_send_message(0).await;

    let quiz = quiz_service();
    let bot = VkBot::new(vk.create_client(), quiz.clone());
    let mut server = vk.long_poll_server("key", "100");

    bot.poll_once(&mut server).await.unwrap();
    assert!(quiz.store().is_empty().await);
}

#[tokio::test]
async fn test_outdated_history_takes_new_ts() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(json!({ "failed": 1, "ts": "140" })).await;
    vk.mock_send_message(0).await;

    let bot = VkBot::new(vk.create_client(), quiz_service());
    let mut server = vk.long_poll_server("key", "100");

    assert_eq!(bot.poll_once(&mut server).await.unwrap(), 0);
    assert_eq!(server.ts, "140");
    assert_eq!(server.key, "key");
}

#[tokio::test]
async fn test_expired_key_refreshes_server() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(json!({ "failed": 2 })).await;
    vk.mock_long_poll_server("fresh_key", 1u64).await;

    let bot = VkBot::new(vk.create_client(), quiz_service());
    let mut server = vk.long_poll_server("stale_key", "100");

    assert_eq!(bot.poll_once(&mut server).await.unwrap(), 0);
    assert_eq!(server.key, "fresh_key");
    assert_eq!(server.ts, "100");
}

#[tokio::test]
async fn test_unknown_failure_code_is_an_error() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(json!({ "failed": 4 })).await;

    let bot = VkBot::new(vk.create_client(), quiz_service());
    let mut server = vk.long_poll_server("key", "100");

    let error = bot.poll_once(&mut server).await.unwrap_err();
    assert_matches!(error, QuizBotError::Vk(VkError::LongPollFailed(4)));
    assert!(error.is_recoverable());
}

#[tokio::test]
async fn test_send_failure_does_not_stop_polling() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_poll(message_new(VK_USER_ID, "Новый вопрос", "101")).await;
    vk.mock_api_error("messages.send", 901, "Can't send messages for users without permission").await;

    let bot = VkBot::new(vk.create_client(), quiz_service());
    let mut server = vk.long_poll_server("key", "100");

    assert_eq!(bot.poll_once(&mut server).await.unwrap(), 1);
    assert_eq!(server.ts, "101");
}

#[tokio::test]
async fn test_group_conversation_messages_are_ignored() {
    init_test_logging();
    let vk = VkMockServer::new().await;
    vk.mock_send_message(0).await;

    let quiz = quiz_service();
    let bot = VkBot::new(vk.create_client(), quiz.clone());

    bot.handle_message(&IncomingMessage {
        from_id: VK_USER_ID,
        peer_id: 2_000_000_001,
        text: "Новый вопрос".to_string(),
    })
    .await
    .unwrap();

    assert!(quiz.store().is_empty().await);
}

/// URL-encode a value the way a form body carries it
fn form_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
