use tracing::info;

use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "botPrefix",
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
            let text = format!("The current bot prefix is {}", inv.guild_config()?.bot_prefix);
            inv.reply(text).await;
            return Ok(());
        }

        let prefix = inv.tokenizer.remaining_as_token().value().to_string();
        let config = inv.guild_config_mut()?;
        info!(guild = %config.guild_id, prefix = %prefix, "Bot prefix changed");
        config.bot_prefix = prefix;
        inv.state.persist().await;
        inv.reply("The bot prefix has been updated").await;
        Ok(())
    })
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}botPrefix` __Gets or sets the bot prefix for the server__\n\
         \n\
         **Usage:** {prefix}botPrefix\n\
         \x20             {prefix}botPrefix [new bot prefix]\n\
         \n\
         **Examples:**\n\
         `{prefix}botPrefix` gets the bot prefix for the server\n\
         `{prefix}botPrefix !` sets the bot prefix for the server to !"
    )
}
