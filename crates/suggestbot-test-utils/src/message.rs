//! Inbound message builder.

use suggestbot_core::InboundMessage;
use suggestbot_core::id::{ChannelId, GuildId, MessageId, UserId};
use suggestbot_core::platform::Author;

/// Fluent builder for [`InboundMessage`].
///
/// # Example
///
/// ```ignore
/// let message = MessageBuilder::guild("g1", "general", "alice")
///     .content("sb!help")
///     .build();
/// ```
pub struct MessageBuilder {
    message: InboundMessage,
}

impl MessageBuilder {
    /// A message posted in a guild channel.
    pub fn guild(guild_id: &str, channel_id: &str, author_id: &str) -> Self {
        let mut builder = Self::direct(channel_id, author_id);
        builder.message.guild_id = Some(GuildId::from(guild_id));
        builder
    }

    /// A direct message to the bot.
    pub fn direct(channel_id: &str, author_id: &str) -> Self {
        Self {
            message: InboundMessage {
                id: MessageId::from("1000"),
                channel_id: ChannelId::from(channel_id),
                guild_id: None,
                author: Author {
                    id: UserId::from(author_id),
                    name: author_id.to_string(),
                    is_bot: false,
                },
                content: String::new(),
                timestamp_millis: 0,
                has_attachments: false,
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.message.id = MessageId::from(id);
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.message.content = content.to_string();
        self
    }

    pub fn timestamp(mut self, millis: i64) -> Self {
        self.message.timestamp_millis = millis;
        self
    }

    pub fn with_attachments(mut self) -> Self {
        self.message.has_attachments = true;
        self
    }

    pub fn from_bot(mut self) -> Self {
        self.message.author.is_bot = true;
        self
    }

    pub fn build(self) -> InboundMessage {
        self.message
    }
}
