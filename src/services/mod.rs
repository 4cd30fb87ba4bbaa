//! Services module
//!
//! This module contains the quiz service shared by the adapters and the
//! VK API client

pub mod quiz;
pub mod vk;

// Re-export commonly used services
pub use quiz::QuizService;
pub use vk::{IncomingMessage, Keyboard as VkKeyboard, LongPollServer, VkClient};
