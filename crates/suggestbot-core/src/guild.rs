//! Per-guild settings.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::id::{ChannelId, GuildId, RoleId};
use crate::token::DEFAULT_PREFIX;

/// Settings the bot keeps for one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    pub guild_id: GuildId,

    /// Roles whose members may run elevated commands.
    #[serde(default)]
    pub admin_role_ids: BTreeSet<RoleId>,

    /// Where forwarded suggestions are posted. `None` until configured.
    #[serde(
        default,
        alias = "suggestionChannelid",
        with = "empty_as_none"
    )]
    pub suggestion_channel_id: Option<ChannelId>,

    #[serde(default = "default_prefix")]
    pub bot_prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl GuildConfig {
    /// Defaults for a newly joined guild: no admin roles, the default prefix,
    /// and the guild's default channel (if any) as suggestion channel.
    pub fn new(guild_id: GuildId, default_channel: Option<ChannelId>) -> Self {
        Self {
            guild_id,
            admin_role_ids: BTreeSet::new(),
            suggestion_channel_id: default_channel,
            bot_prefix: default_prefix(),
        }
    }
}

/// The save file stores a missing channel as `""`.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::id::ChannelId;

    pub fn serialize<S: Serializer>(
        value: &Option<ChannelId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map(ChannelId::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ChannelId>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok((!raw.is_empty()).then(|| ChannelId::new(raw)))
    }
}

/// All known guild configs, keyed by guild id.
#[derive(Debug, Clone, Default)]
pub struct GuildDirectory {
    guilds: HashMap<GuildId, GuildConfig>,
}

impl GuildDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, guild_id: &GuildId) -> Option<&GuildConfig> {
        self.guilds.get(guild_id)
    }

    pub fn get_mut(&mut self, guild_id: &GuildId) -> Option<&mut GuildConfig> {
        self.guilds.get_mut(guild_id)
    }

    pub fn contains(&self, guild_id: &GuildId) -> bool {
        self.guilds.contains_key(guild_id)
    }

    /// Insert or replace a config.
    pub fn insert(&mut self, config: GuildConfig) {
        self.guilds.insert(config.guild_id.clone(), config);
    }

    /// Register defaults for a guild unless it already has a config.
    ///
    /// Returns `true` when a new config was created.
    pub fn ensure(&mut self, guild_id: GuildId, default_channel: Option<ChannelId>) -> bool {
        if self.guilds.contains_key(&guild_id) {
            return false;
        }
        self.insert(GuildConfig::new(guild_id, default_channel));
        true
    }

    pub fn len(&self) -> usize {
        self.guilds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }

    /// Configs sorted by guild id, for stable output.
    pub fn sorted(&self) -> Vec<&GuildConfig> {
        let mut configs: Vec<_> = self.guilds.values().collect();
        configs.sort_by(|a, b| a.guild_id.cmp(&b.guild_id));
        configs
    }
}
