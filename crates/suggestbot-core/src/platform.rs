//! The chat platform boundary.
//!
//! Everything the bot needs from the chat platform goes through [`Platform`]:
//! a few read queries and confirmable sends. Connection management,
//! reconnection and the gateway event stream live on the other side of this
//! trait.

use tracing::warn;

use crate::BoxFuture;
use crate::id::{ChannelId, GuildId, MessageId, UserId};
use crate::permissions::Member;

/// Errors reported by the platform client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("message too long: {length} characters")]
    MessageTooLong { length: usize },

    #[error("channel not found: {0}")]
    UnknownChannel(ChannelId),

    #[error("cannot open a direct message channel: {0}")]
    DirectMessageUnavailable(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Longest message content the platform accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// A message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
    /// Read aloud by clients with text-to-speech enabled.
    pub tts: bool,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tts: false,
        }
    }

    pub fn with_tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    /// Reject content longer than [`MAX_MESSAGE_CHARS`].
    pub fn check_length(&self) -> Result<(), PlatformError> {
        let length = self.content.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(PlatformError::MessageTooLong { length });
        }
        Ok(())
    }
}

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub is_bot: bool,
}

/// A message received from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub author: Author,
    /// Raw message content, markup included.
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
    pub has_attachments: bool,
}

impl InboundMessage {
    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// The chat platform client as seen by the bot.
///
/// Sends resolve once the platform has confirmed delivery; callers that do
/// not care about confirmation just log the error.
pub trait Platform: Send + Sync {
    /// Send a message and wait for the platform to accept it.
    fn send_message(
        &self,
        channel_id: &ChannelId,
        message: OutboundMessage,
    ) -> BoxFuture<'_, Result<MessageId, PlatformError>>;

    fn delete_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> BoxFuture<'_, Result<(), PlatformError>>;

    /// Resolve a direct-message channel id to a channel the bot can send to,
    /// opening it if it is not cached.
    fn open_dm_channel(&self, channel_id: &ChannelId)
    -> BoxFuture<'_, Result<ChannelId, PlatformError>>;

    /// Look up a guild member; `None` if the user is not in the guild.
    fn member(
        &self,
        guild_id: &GuildId,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<Option<Member>, PlatformError>>;

    fn guild_name(&self, guild_id: &GuildId) -> Option<String>;

    /// Guilds the bot is currently a member of.
    fn guilds(&self) -> Vec<GuildId>;

    fn is_guild_member(&self, guild_id: &GuildId, user_id: &UserId) -> bool;

    /// Default channel of a guild, used as the initial suggestion channel.
    fn default_channel(&self, guild_id: &GuildId) -> Option<ChannelId>;

    fn set_presence(&self, activity: &str);
}

/// Send a plain-text notice, logging failures instead of returning them.
pub async fn notify(platform: &dyn Platform, channel_id: &ChannelId, text: impl Into<String>) {
    if let Err(e) = platform
        .send_message(channel_id, OutboundMessage::text(text))
        .await
    {
        warn!(channel = %channel_id, error = %e, "Failed to send notice");
    }
}
