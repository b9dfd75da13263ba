#![deny(unsafe_code)]

//! Shared test utilities for the SuggestBot workspace.
//!
//! Provides an in-memory platform, state and message builders, config
//! builders, and tracing helpers so that individual crate tests stay concise
//! and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! suggestbot-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod message;
pub mod platform;
pub mod state;
pub mod tracing_setup;

pub use config::TestConfigBuilder;
pub use message::MessageBuilder;
pub use platform::{RecordingPlatform, SentMessage};
pub use state::{TestService, TestState, TestStateBuilder};
pub use tracing_setup::init_test_tracing;
