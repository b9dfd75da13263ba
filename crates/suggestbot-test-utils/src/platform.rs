//! In-memory [`Platform`] that records everything the bot sends.
//!
//! Configure guilds, members and failure modes up front with the builder
//! methods, wrap it in an `Arc`, and inspect [`RecordingPlatform::sent`]
//! afterwards. Sends longer than the platform's message limit are rejected
//! the way the real platform rejects them.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use suggestbot_core::BoxFuture;
use suggestbot_core::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use suggestbot_core::permissions::{Member, Permissions};
use suggestbot_core::platform::{OutboundMessage, Platform, PlatformError};

/// A message the bot sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub content: String,
    pub tts: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    sent: Vec<SentMessage>,
    deleted: Vec<(ChannelId, MessageId)>,
    presence: Option<String>,
    next_id: u64,
}

/// Scriptable platform double.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    guilds: Vec<GuildId>,
    guild_names: HashMap<GuildId, String>,
    default_channels: HashMap<GuildId, ChannelId>,
    members: HashMap<(GuildId, UserId), Member>,
    failing_channels: HashSet<ChannelId>,
    closed_dms: HashSet<ChannelId>,
    recorded: Mutex<Recorded>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guild the bot is a member of.
    pub fn with_guild(mut self, guild_id: &str, name: &str, default_channel: Option<&str>) -> Self {
        let guild_id = GuildId::from(guild_id);
        self.guild_names.insert(guild_id.clone(), name.to_string());
        if let Some(channel) = default_channel {
            self.default_channels
                .insert(guild_id.clone(), ChannelId::from(channel));
        }
        self.guilds.push(guild_id);
        self
    }

    /// Add a member to a guild.
    pub fn with_member(mut self, guild_id: &str, member: Member) -> Self {
        self.members
            .insert((GuildId::from(guild_id), member.user_id.clone()), member);
        self
    }

    /// Sends to this channel fail as if it had been deleted.
    pub fn with_failing_channel(mut self, channel_id: &str) -> Self {
        self.failing_channels.insert(ChannelId::from(channel_id));
        self
    }

    /// Opening a DM for this channel fails.
    pub fn with_closed_dm(mut self, channel_id: &str) -> Self {
        self.closed_dms.insert(ChannelId::from(channel_id));
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("recording platform lock poisoned")
    }

    /// Every message sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.recorded().sent.clone()
    }

    /// Contents of the messages sent to one channel, in order.
    pub fn sent_to(&self, channel_id: &str) -> Vec<String> {
        self.recorded()
            .sent
            .iter()
            .filter(|m| m.channel_id.as_str() == channel_id)
            .map(|m| m.content.clone())
            .collect()
    }

    pub fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.recorded().deleted.clone()
    }

    /// The last presence text set.
    pub fn presence(&self) -> Option<String> {
        self.recorded().presence.clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut recorded = self.recorded();
        recorded.sent.clear();
        recorded.deleted.clear();
    }
}

impl Platform for RecordingPlatform {
    fn send_message(
        &self,
        channel_id: &ChannelId,
        message: OutboundMessage,
    ) -> BoxFuture<'_, Result<MessageId, PlatformError>> {
        let result = if self.failing_channels.contains(channel_id) {
            Err(PlatformError::UnknownChannel(channel_id.clone()))
        } else if let Err(e) = message.check_length() {
            Err(e)
        } else {
            let mut recorded = self.recorded();
            recorded.next_id += 1;
            let id = MessageId::new(format!("sent-{}", recorded.next_id));
            recorded.sent.push(SentMessage {
                channel_id: channel_id.clone(),
                content: message.content,
                tts: message.tts,
            });
            Ok(id)
        };
        Box::pin(async move { result })
    }

    fn delete_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> BoxFuture<'_, Result<(), PlatformError>> {
        self.recorded()
            .deleted
            .push((channel_id.clone(), message_id.clone()));
        Box::pin(async { Ok(()) })
    }

    fn open_dm_channel(
        &self,
        channel_id: &ChannelId,
    ) -> BoxFuture<'_, Result<ChannelId, PlatformError>> {
        let result = if self.closed_dms.contains(channel_id) {
            Err(PlatformError::DirectMessageUnavailable(channel_id.to_string()))
        } else {
            Ok(channel_id.clone())
        };
        Box::pin(async move { result })
    }

    fn member(
        &self,
        guild_id: &GuildId,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<Option<Member>, PlatformError>> {
        let member = self
            .members
            .get(&(guild_id.clone(), user_id.clone()))
            .cloned();
        Box::pin(async move { Ok(member) })
    }

    fn guild_name(&self, guild_id: &GuildId) -> Option<String> {
        self.guild_names.get(guild_id).cloned()
    }

    fn guilds(&self) -> Vec<GuildId> {
        self.guilds.clone()
    }

    fn is_guild_member(&self, guild_id: &GuildId, user_id: &UserId) -> bool {
        self.members
            .contains_key(&(guild_id.clone(), user_id.clone()))
    }

    fn default_channel(&self, guild_id: &GuildId) -> Option<ChannelId> {
        self.default_channels.get(guild_id).cloned()
    }

    fn set_presence(&self, activity: &str) {
        self.recorded().presence = Some(activity.to_string());
    }
}

/// A member with no roles and no permissions.
pub fn member(user_id: &str) -> Member {
    Member {
        user_id: UserId::from(user_id),
        is_owner: false,
        role_ids: Vec::new(),
        permissions: Permissions::NONE,
    }
}

/// A member holding the given roles.
pub fn member_with_roles(user_id: &str, roles: &[&str]) -> Member {
    Member {
        role_ids: roles.iter().map(|r| RoleId::from(*r)).collect(),
        ..member(user_id)
    }
}

/// The guild owner.
pub fn owner(user_id: &str) -> Member {
    Member {
        is_owner: true,
        ..member(user_id)
    }
}
