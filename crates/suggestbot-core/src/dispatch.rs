//! Deciding whether an invoked command runs.
//!
//! In a direct message only DM-safe commands run, and they never run
//! elevated. In a guild, commands that require elevation are checked against
//! the caller's membership first; a failed check is answered with a single
//! denial notice.

use tracing::{debug, info};

use crate::command::{CommandError, Invocation};
use crate::permissions::is_server_admin;
use crate::platform::{InboundMessage, Platform, notify};
use crate::state::BotState;
use crate::tokenizer::Tokenizer;

/// What happened to an invoked command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran.
    Ran,
    /// The caller lacked permission and was told so.
    Denied,
    /// The command is not available in this context. Nothing was sent.
    Ignored,
}

/// Run command `name` for `message`, with `tokenizer` positioned just after
/// the command token.
pub async fn dispatch(
    name: &str,
    tokenizer: &mut Tokenizer,
    state: &mut BotState,
    platform: &dyn Platform,
    message: &InboundMessage,
) -> Result<Outcome, CommandError> {
    let spec = state.registry.lookup(name);

    let elevated = match &message.guild_id {
        None => {
            if !spec.allowed_in_dm {
                debug!(command = spec.name, "Command not available in direct messages");
                return Ok(Outcome::Ignored);
            }
            false
        }
        Some(guild_id) if spec.requires_elevated => {
            let config = state
                .guild(guild_id)
                .ok_or_else(|| CommandError::UnknownGuild(guild_id.clone()))?;
            let member = platform.member(guild_id, &message.author.id).await?;
            let elevated = member.is_some_and(|m| is_server_admin(&m, config));
            if !elevated {
                info!(
                    command = spec.name,
                    guild = %guild_id,
                    user = %message.author.id,
                    "Denied elevated command"
                );
                notify(
                    platform,
                    &message.channel_id,
                    format!(
                        "{} You don't have permission to run this command.",
                        message.author.id.mention()
                    ),
                )
                .await;
                return Ok(Outcome::Denied);
            }
            true
        }
        Some(_) => false,
    };

    debug!(command = spec.name, elevated, "Running command");
    (spec.run)(Invocation {
        state,
        platform,
        message,
        tokenizer,
        elevated,
    })
    .await?;
    Ok(Outcome::Ran)
}
