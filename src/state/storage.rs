//! Session storage implementation
//!
//! This module handles persistence of quiz sessions. Redis is the production
//! store; an in-memory store backs tests and local runs.

use std::collections::HashMap;
use std::future::Future;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::session::{Session, SessionKey};

/// Key-value store holding one session per user
pub trait SessionStore: Send + Sync {
    /// Fetch the user's session, if any
    fn load(&self, key: &SessionKey) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Overwrite the user's session
    fn save(&self, key: &SessionKey, session: &Session) -> impl Future<Output = Result<()>> + Send;
}

/// Redis-based session store
#[derive(Clone)]
pub struct RedisSessionStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisSessionStore {
    /// Create a new session store instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Get the Redis key for a user's session
    fn session_key(&self, key: &SessionKey) -> String {
        format!("{}session:{}:{}", self.config.prefix, key.platform, key.user_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Decode a stored value
///
/// Values written before sessions carried an explicit state are bare
/// question texts; they are read as an outstanding question.
fn decode_session(key: &SessionKey, data: &str) -> Session {
    match serde_json::from_str::<Session>(data) {
        Ok(session) => session,
        Err(e) => {
            warn!(user = %key, error = %e, "Stored value is not a session record, reading it as a bare question");
            Session::awaiting_answer(data)
        }
    }
}

impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>> {
        let redis_key = self.session_key(key);
        debug!(user = %key, key = %redis_key, "Loading session from Redis");

        let mut conn = self.connection_manager.clone();
        let stored: Option<String> = match conn.get::<&str, Option<String>>(&redis_key).await {
            Ok(data) => data,
            Err(e) => {
                error!(user = %key, error = %e, "Failed to get session from Redis");
                return Err(e.into());
            }
        };

        Ok(stored.map(|data| decode_session(key, &data)))
    }

    async fn save(&self, key: &SessionKey, session: &Session) -> Result<()> {
        let redis_key = self.session_key(key);
        let serialized = serde_json::to_string(session)?;
        let mut conn = self.connection_manager.clone();

        let result = match self.config.ttl_seconds {
            Some(ttl_seconds) => conn.set_ex::<_, _, ()>(&redis_key, serialized, ttl_seconds).await,
            None => conn.set::<_, _, ()>(&redis_key, serialized).await,
        };

        match result {
            Ok(()) => {
                debug!(user = %key, state = ?session.state, "Session saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(user = %key, error = %e, "Failed to save session to Redis");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn save(&self, key: &SessionKey, session: &Session) -> Result<()> {
        self.sessions.write().await.insert(*key, session.clone());
        Ok(())
    }
}
