//! Test helpers module
//!
//! Mock servers for both platform APIs and sample quiz data.

pub mod telegram_mock;

pub use telegram_mock::*;
pub use vk_mock::*;
pub use test_data::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}
