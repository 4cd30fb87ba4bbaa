//! Integration tests module
//!
//! This module contains all integration tests for QuizBot, organized by
//! platform adapter and end-to-end scenario.
