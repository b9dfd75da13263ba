use tracing::{info, warn};

use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;
use crate::platform::OutboundMessage;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "say",
    requires_elevated: true,
    allowed_in_dm: false,
    run,
    help,
};

const TTS_SUFFIX: &str = "!tts";

fn run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async move {
        let token = inv.tokenizer.remaining_as_token();
        let (content, tts) = match token.value().strip_suffix(TTS_SUFFIX) {
            Some(stripped) => (stripped.trim_end(), true),
            None => (token.value(), false),
        };

        if content.is_empty() {
            inv.reply("I can't say blank messages").await;
            return Ok(());
        }

        if let Err(e) = inv.send(OutboundMessage::text(content).with_tts(tts)).await {
            warn!(channel = %inv.channel_id(), error = %e, "Failed to say message");
            return Ok(());
        }
        if let Err(e) = inv
            .platform
            .delete_message(&inv.message.channel_id, &inv.message.id)
            .await
        {
            warn!(message = %inv.message.id, error = %e, "Failed to delete say command");
        }
        info!(tts, "{} made me say {content:?}", inv.message.author.name);
        Ok(())
    })
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}say` __Makes the bot say something__\n\
         \n\
         **Usage:** {prefix}say [text]\n\
         \x20             {prefix}say [text] !tts\n\
         \n\
         **Examples:**\n\
         `{prefix}say hello world` makes the bot say 'hello world'\n\
         `{prefix}say hello world !tts` makes the bot say 'hello world' with tts"
    )
}
