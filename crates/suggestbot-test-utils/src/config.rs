//! Configuration builders for tests.

use suggestbot_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .save_file(dir.path().join("saveData.json"))
///     .presence("Testing")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn presence(mut self, presence: &str) -> Self {
        self.config.bot.presence = presence.to_string();
        self
    }

    pub fn event_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.bot.event_queue_capacity = capacity;
        self
    }

    pub fn save_file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.config.storage.save_file = path.as_ref().display().to_string();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
