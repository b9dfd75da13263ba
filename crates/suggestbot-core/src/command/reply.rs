use tracing::{info, warn};

use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;
use crate::platform::OutboundMessage;
use crate::suggestion::SuggestionRecord;
use crate::token::TokenKind;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "reply",
    requires_elevated: true,
    allowed_in_dm: false,
    run,
    help,
};

const UNDELIVERABLE: &str = "Unable to reply to the suggestion because it's either been purged from cache, the user does not exist, or I cannot send a DM to them";

fn run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async move {
        let Ok(id_token) = inv.tokenizer.advance() else {
            inv.reply("You must specify a suggestion id").await;
            return Ok(());
        };
        // A non-numeric id is reported but still looked up; it simply never matches.
        if id_token.kind() != TokenKind::Number {
            inv.reply("You must specify a valid suggestion id").await;
        }

        let body = inv.tokenizer.remaining_as_token().raw_value().to_string();
        let record = inv.state.suggestions.find_by_id(id_token.value()).cloned();
        let guild_id = inv.guild_id()?;
        let guild_name = inv
            .platform
            .guild_name(guild_id)
            .unwrap_or_else(|| guild_id.to_string());

        let delivered = match record {
            Some(record) => deliver(&inv, &record, &guild_name, &body).await,
            None => {
                info!(suggestion = %id_token.value(), "Reply target not found");
                false
            }
        };

        if delivered {
            inv.reply("Your reply was successfully sent").await;
        } else {
            inv.reply(UNDELIVERABLE).await;
        }
        Ok(())
    })
}

/// DM the reply to the suggestion's author. `true` once the platform confirms.
async fn deliver(inv: &Invocation<'_>, record: &SuggestionRecord, guild_name: &str, body: &str) -> bool {
    let channel = match inv.platform.open_dm_channel(&record.origin_channel_id).await {
        Ok(channel) => channel,
        Err(e) => {
            warn!(channel = %record.origin_channel_id, error = %e, "Cannot open DM for reply");
            return false;
        }
    };

    let content = format!("The mods from {guild_name} have replied to your suggestion: {body}");
    match inv.platform.send_message(&channel, OutboundMessage::text(content)).await {
        Ok(_) => {
            info!(suggestion = %record.suggestion_message_id, "Delivered reply to suggestion");
            true
        }
        Err(e) => {
            warn!(channel = %channel, error = %e, "Failed to deliver reply");
            false
        }
    }
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}reply` __Replies to a suggestion__\n\
         \n\
         **Usage:** {prefix}reply [suggestion_id] [message]\n\
         \n\
         **Examples:**\n\
         `{prefix}reply 1234567890 Your suggestion is bad and you should feel bad.` makes the bot reply to the suggestion with id 1234567890 with 'Your suggestion is bad and you should feel bad.'"
    )
}
