//! [`BotState`] fixtures backed by a temporary save file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use suggestbot_config::BotConfig;
use suggestbot_core::platform::Platform;
use suggestbot_core::{BotHandle, BotService, BotState};
use suggestbot_core::guild::GuildConfig;
use suggestbot_core::id::{ChannelId, GuildId, MessageId, RoleId};
use suggestbot_core::store::{SaveData, Store};
use tempfile::TempDir;

/// A bot state whose save file lives in a temp directory.
///
/// The directory is deleted when this value is dropped.
pub struct TestState {
    pub state: BotState,
    save_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestState {
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Read back what has been persisted so far.
    pub async fn saved(&self) -> SaveData {
        Store::new(&self.save_path)
            .load()
            .await
            .expect("failed to read test save file")
    }

    /// Whether anything has been persisted yet.
    pub fn was_saved(&self) -> bool {
        self.save_path.exists()
    }

    /// Hand the state to a [`BotService`] with default bot settings.
    pub fn into_service(self, platform: Arc<dyn Platform>) -> TestService {
        let (service, handle) = BotService::new(self.state, platform, &BotConfig::default());
        TestService {
            service,
            handle,
            save_path: self.save_path,
            _temp_dir: self._temp_dir,
        }
    }
}

/// A [`BotService`] over a [`TestState`], keeping its temp directory alive.
pub struct TestService {
    pub service: BotService,
    pub handle: BotHandle,
    save_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestService {
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub async fn saved(&self) -> SaveData {
        Store::new(&self.save_path)
            .load()
            .await
            .expect("failed to read test save file")
    }
}

/// Fluent builder for [`TestState`].
///
/// # Example
///
/// ```ignore
/// let mut fixture = TestStateBuilder::new()
///     .guild("g1", Some("suggestions"))
///     .admin_role("g1", "mods")
///     .build();
/// ```
#[derive(Default)]
pub struct TestStateBuilder {
    guilds: Vec<GuildConfig>,
    suggestions: Vec<(i64, String, String)>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guild with default settings.
    pub fn guild(mut self, guild_id: &str, suggestion_channel: Option<&str>) -> Self {
        self.guilds.push(GuildConfig::new(
            GuildId::from(guild_id),
            suggestion_channel.map(ChannelId::from),
        ));
        self
    }

    /// Grant a role elevated access in an already added guild.
    pub fn admin_role(mut self, guild_id: &str, role_id: &str) -> Self {
        if let Some(config) = self.find(guild_id) {
            config.admin_role_ids.insert(RoleId::from(role_id));
        }
        self
    }

    /// Change the prefix of an already added guild.
    pub fn prefix(mut self, guild_id: &str, prefix: &str) -> Self {
        if let Some(config) = self.find(guild_id) {
            config.bot_prefix = prefix.to_string();
        }
        self
    }

    /// Add a suggestion record.
    pub fn suggestion(mut self, timestamp_millis: i64, message_id: &str, origin_channel: &str) -> Self {
        self.suggestions.push((
            timestamp_millis,
            message_id.to_string(),
            origin_channel.to_string(),
        ));
        self
    }

    fn find(&mut self, guild_id: &str) -> Option<&mut GuildConfig> {
        self.guilds
            .iter_mut()
            .find(|config| config.guild_id.as_str() == guild_id)
    }

    pub fn build(self) -> TestState {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let save_path = temp_dir.path().join("saveData.json");

        let mut state = BotState::new(Store::new(&save_path));
        for config in self.guilds {
            state.guilds.insert(config);
        }
        for (timestamp, message_id, channel) in self.suggestions {
            state.suggestions.record(
                timestamp,
                MessageId::new(message_id),
                ChannelId::new(channel),
            );
        }

        TestState {
            state,
            save_path,
            _temp_dir: temp_dir,
        }
    }
}
