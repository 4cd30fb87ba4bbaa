//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server answering sendMessage
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let mock = Self { server };
        mock.mock_send_message().await;
        mock
    }

    /// Bot pointed at this server
    pub fn create_bot(&self) -> Bot {
        let api_url = url::Url::parse(&self.server.uri()).unwrap();
        Bot::new(TEST_BOT_TOKEN).set_api_url(api_url)
    }

    /// Setup mock for sendMessage endpoint
    async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot12345:test_token/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "QuizBot",
                        "username": "quiz_bot"
                    },
                    "chat": {
                        "id": 987654321,
                        "first_name": "Test",
                        "type": "private"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every sendMessage request received so far, in order
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.url.path().to_lowercase().ends_with("/sendmessage"))
            .map(|req| req.body_json::<Value>().unwrap())
            .collect()
    }

    /// Texts of every message sent so far, in order
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent_messages()
            .await
            .iter()
            .map(|body| body["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
