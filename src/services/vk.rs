//! VK API client
//!
//! Thin client over the VK HTTP API covering what the bot needs: the Bots
//! Long Poll handshake and poll request, and `messages.send` with the menu
//! keyboard.

use std::time::Duration;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use crate::config::VkConfig;
use crate::quiz::{Reply, GIVE_UP, MENU_LAYOUT, NEW_QUESTION};
use crate::utils::errors::{Result, VkError};

/// Long poll server coordinates from `groups.getLongPollServer`
#[derive(Debug, Clone, Deserialize)]
pub struct LongPollServer {
    pub key: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: String,
}

/// Response to a long poll request
#[derive(Debug, Clone, Deserialize)]
pub struct LongPollResponse {
    #[serde(default, deserialize_with = "deserialize_optional_ts")]
    pub ts: Option<String>,
    #[serde(default)]
    pub updates: Vec<LongPollUpdate>,
    /// 1: history outdated, 2: key expired, 3: information lost
    pub failed: Option<i64>,
}

/// Raw long poll event
#[derive(Debug, Clone, Deserialize)]
pub struct LongPollUpdate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub object: serde_json::Value,
}

/// Private message sent to the community
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    pub from_id: i64,
    pub peer_id: i64,
    #[serde(default)]
    pub text: String,
}

impl LongPollUpdate {
    /// The new message carried by a `message_new` event
    pub fn message(&self) -> std::result::Result<Option<IncomingMessage>, VkError> {
        if self.kind != "message_new" {
            return Ok(None);
        }

        // API 5.103+ nests the message under `message`
        let payload = self.object.get("message").unwrap_or(&self.object);
        serde_json::from_value(payload.clone())
            .map(Some)
            .map_err(|e| VkError::InvalidResponse(format!("message_new: {}", e)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TsValue {
    Text(String),
    Number(u64),
}

impl From<TsValue> for String {
    fn from(value: TsValue) -> Self {
        match value {
            TsValue::Text(text) => text,
            TsValue::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_ts<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    TsValue::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_ts<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Option::<TsValue>::deserialize(deserializer).map(|value| value.map(String::from))
}

/// VK method call envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    error_msg: String,
}

/// Button colors understood by VK keyboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Primary,
    Secondary,
    Negative,
    Positive,
}

#[derive(Debug, Clone, Serialize)]
struct ButtonAction {
    #[serde(rename = "type")]
    kind: &'static str,
    label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    action: ButtonAction,
    color: ButtonColor,
}

impl KeyboardButton {
    pub fn text(label: impl Into<String>, color: ButtonColor) -> Self {
        Self {
            action: ButtonAction { kind: "text", label: label.into() },
            color,
        }
    }
}

/// Reply keyboard in VK's JSON format
#[derive(Debug, Clone, Serialize)]
pub struct Keyboard {
    pub one_time: bool,
    pub buttons: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    /// The quiz menu, hidden after one press
    pub fn menu() -> Self {
        let buttons = MENU_LAYOUT
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&label| {
                        let color = match label {
                            NEW_QUESTION => ButtonColor::Positive,
                            GIVE_UP => ButtonColor::Negative,
                            _ => ButtonColor::Primary,
                        };
                        KeyboardButton::text(label, color)
                    })
                    .collect()
            })
            .collect();

        Self { one_time: true, buttons }
    }
}

/// VK API client
#[derive(Clone)]
#[derive(Debug)]
pub struct VkClient {
    client: Client,
    config: VkConfig,
}

impl VkClient {
    /// Create a new VkClient instance
    pub fn new(config: VkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.wait_seconds + config.timeout_seconds))
            .user_agent("QuizBot/1.0")
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &VkConfig {
        &self.config
    }

    /// Call an API method and unwrap its envelope
    async fn call_method<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), method);

        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("access_token", self.config.token.clone()));
        form.push(("v", self.config.api_version.clone()));

        debug!(method = method, "Calling VK API method");

        let response = self.client
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .form(&form)
            .send()
            .await
            .map_err(VkError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VkError::RequestFailed(format!("HTTP {}: {}", status, error_text)).into());
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(VkError::from)?;
        match envelope {
            ApiEnvelope { error: Some(error), .. } => Err(VkError::Api {
                code: error.error_code,
                message: error.error_msg,
            }
            .into()),
            ApiEnvelope { response: Some(response), .. } => Ok(response),
            _ => Err(VkError::InvalidResponse(format!("{} returned neither response nor error", method)).into()),
        }
    }

    /// Fetch long poll server coordinates for the community
    pub async fn get_long_poll_server(&self) -> Result<LongPollServer> {
        let server: LongPollServer = self
            .call_method("groups.getLongPollServer", &[("group_id", self.config.group_id.to_string())])
            .await?;
        debug!(server = %server.server, ts = %server.ts, "Obtained VK long poll server");
        Ok(server)
    }

    /// Wait for events newer than the server's `ts`
    pub async fn poll(&self, server: &LongPollServer) -> Result<LongPollResponse> {
        let address = if server.server.starts_with("http") {
            server.server.clone()
        } else {
            format!("https://{}", server.server)
        };
        let url = url::Url::parse(&address)?;
        let wait = self.config.wait_seconds.to_string();

        let response = self.client
            .get(url)
            .query(&[
                ("act", "a_check"),
                ("key", server.key.as_str()),
                ("ts", server.ts.as_str()),
                ("wait", wait.as_str()),
            ])
            .send()
            .await
            .map_err(VkError::from)?;

        if !response.status().is_success() {
            return Err(VkError::RequestFailed(format!("Long poll HTTP {}", response.status())).into());
        }

        let body: LongPollResponse = response.json().await.map_err(VkError::from)?;
        debug!(updates = body.updates.len(), failed = ?body.failed, "Long poll returned");
        Ok(body)
    }

    /// Send one reply, attaching the menu keyboard when asked
    pub async fn send_message(&self, peer_id: i64, reply: &Reply) -> Result<i64> {
        let mut params = vec![
            ("peer_id", peer_id.to_string()),
            ("message", reply.text.clone()),
            ("random_id", rand::random::<i32>().to_string()),
        ];
        if reply.menu {
            params.push(("keyboard", serde_json::to_string(&Keyboard::menu())?));
        }

        let message_id: i64 = self.call_method("messages.send", &params).await?;
        debug!(peer_id = peer_id, message_id = message_id, "VK message sent");
        Ok(message_id)
    }
}
