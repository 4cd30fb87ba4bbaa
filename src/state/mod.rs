//! State management module
//!
//! This module handles per-user quiz sessions and their storage

pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use session::{ConversationState, Platform, Session, SessionKey};
pub use storage::{MemorySessionStore, RedisSessionStore, SessionStore};
