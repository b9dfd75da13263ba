use tracing::info;

use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;
use crate::id::ChannelId;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "suggestionChannel",
    requires_elevated: true,
    allowed_in_dm: false,
    run,
    help,
};

fn run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async move {
        if !inv.elevated {
            return Ok(());
        }

        if !inv.tokenizer.has_more() {
            let text = match &inv.guild_config()?.suggestion_channel_id {
                Some(channel) => format!("The current suggestion channel is {}", channel.mention()),
                None => "No suggestion channel is configured".to_string(),
            };
            inv.reply(text).await;
            return Ok(());
        }

        let token = inv.tokenizer.remaining_as_token();
        let channel = (!token.value().is_empty()).then(|| ChannelId::new(token.value()));
        let config = inv.guild_config_mut()?;
        info!(guild = %config.guild_id, channel = ?channel, "Suggestion channel changed");
        config.suggestion_channel_id = channel;
        inv.state.persist().await;
        inv.reply("The suggestion channel has been updated").await;
        Ok(())
    })
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}suggestionChannel` __Gets or sets the suggestion channel for the server__\n\
         \n\
         **Usage:** {prefix}suggestionChannel\n\
         \x20             {prefix}suggestionChannel [channel]\n\
         \n\
         **Examples:**\n\
         `{prefix}suggestionChannel` gets the suggestion channel for the server\n\
         `{prefix}suggestionChannel #channel` sets the suggestion channel for the server to #channel"
    )
}
