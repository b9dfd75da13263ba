//! The command table.
//!
//! Every command the bot understands is one [`CommandSpec`] in [`COMMANDS`]:
//! a name, two permission flags, and plain function pointers for running it
//! and rendering its help. [`CommandRegistry`] indexes the table by name and
//! answers unknown names with the `noop` command, so lookups never fail.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::BoxFuture;
use crate::guild::GuildConfig;
use crate::id::{ChannelId, GuildId};
use crate::platform::{InboundMessage, OutboundMessage, Platform, PlatformError, notify};
use crate::state::BotState;
use crate::tokenizer::{TokenizeError, Tokenizer};

mod admin;
mod bot_prefix;
mod help;
mod noop;
mod reply;
mod say;
mod suggestion_channel;

/// Name of the fallback command returned for unknown names.
pub const NOOP: &str = "noop";

/// Runs a command. Boxed so the table can hold plain `fn` pointers.
pub type Handler = for<'a> fn(Invocation<'a>) -> BoxFuture<'a, Result<(), CommandError>>;

/// Renders usage text for a command given the prefix in effect.
pub type HelpRenderer = fn(&str) -> String;

/// One entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    /// Only guild owners, admin-role holders and administrators may run it.
    pub requires_elevated: bool,
    pub allowed_in_dm: bool,
    pub run: Handler,
    pub help: HelpRenderer,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("requires_elevated", &self.requires_elevated)
            .field("allowed_in_dm", &self.allowed_in_dm)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CommandSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Every known command, in help-listing order. `noop` is first.
pub static COMMANDS: [CommandSpec; 7] = [
    noop::SPEC,
    say::SPEC,
    reply::SPEC,
    admin::SPEC,
    suggestion_channel::SPEC,
    bot_prefix::SPEC,
    help::SPEC,
];

/// Errors a command can fail with. User mistakes are not errors; handlers
/// answer those with a notice.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("no config recorded for guild {0}")]
    UnknownGuild(GuildId),

    #[error("command requires a guild context")]
    NotInGuild,

    #[error("tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Everything a handler gets to work with.
pub struct Invocation<'a> {
    pub state: &'a mut BotState,
    pub platform: &'a dyn Platform,
    /// The message that invoked the command.
    pub message: &'a InboundMessage,
    /// Positioned just after the command token.
    pub tokenizer: &'a mut Tokenizer,
    /// Whether the caller passed the elevated-permission check. Only
    /// evaluated for commands that require it; `false` otherwise.
    pub elevated: bool,
}

impl Invocation<'_> {
    pub fn channel_id(&self) -> &ChannelId {
        &self.message.channel_id
    }

    pub fn guild_id(&self) -> Result<&GuildId, CommandError> {
        self.message.guild_id.as_ref().ok_or(CommandError::NotInGuild)
    }

    pub fn guild_config(&self) -> Result<&GuildConfig, CommandError> {
        let guild_id = self.guild_id()?;
        self.state
            .guilds
            .get(guild_id)
            .ok_or_else(|| CommandError::UnknownGuild(guild_id.clone()))
    }

    pub fn guild_config_mut(&mut self) -> Result<&mut GuildConfig, CommandError> {
        let guild_id = self
            .message
            .guild_id
            .as_ref()
            .ok_or(CommandError::NotInGuild)?;
        self.state
            .guilds
            .get_mut(guild_id)
            .ok_or_else(|| CommandError::UnknownGuild(guild_id.clone()))
    }

    /// Send a notice to the invoking channel; failures are only logged.
    pub async fn reply(&self, text: impl Into<String>) {
        notify(self.platform, &self.message.channel_id, text).await;
    }

    /// Send to the invoking channel and report the outcome.
    pub async fn send(&self, message: OutboundMessage) -> Result<(), PlatformError> {
        self.platform
            .send_message(&self.message.channel_id, message)
            .await
            .map(|_| ())
    }
}

/// Name → command index over [`COMMANDS`].
pub struct CommandRegistry {
    commands: HashMap<&'static str, &'static CommandSpec>,
    fallback: &'static CommandSpec,
}

impl CommandRegistry {
    /// Index the command table, setting `noop` aside as the fallback.
    pub fn new() -> Self {
        let mut commands: HashMap<_, _> = COMMANDS.iter().map(|spec| (spec.name, spec)).collect();
        let fallback = match commands.remove(NOOP) {
            Some(noop) => noop,
            None => {
                warn!("Command table has no noop entry");
                &COMMANDS[0]
            }
        };
        Self { commands, fallback }
    }

    /// The command registered under `name`, or the noop command.
    pub fn lookup(&self, name: &str) -> &'static CommandSpec {
        self.get(name).unwrap_or(self.fallback)
    }

    /// The command registered under `name`, if any. Never returns noop.
    pub fn get(&self, name: &str) -> Option<&'static CommandSpec> {
        self.commands.get(name).copied()
    }

    /// Registered commands in table order, noop excluded.
    pub fn iter(&self) -> impl Iterator<Item = &'static CommandSpec> + '_ {
        COMMANDS
            .iter()
            .filter(move |spec| self.commands.contains_key(spec.name))
    }

    pub fn help_text(&self, spec: &CommandSpec, prefix: &str) -> String {
        (spec.help)(prefix)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.iter().map(|c| c.name).collect::<Vec<_>>())
            .field("fallback", &self.fallback.name)
            .finish()
    }
}
