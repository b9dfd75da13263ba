use tracing::debug;

use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;
use crate::id::RoleId;
use crate::token::TokenKind;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "admin",
    requires_elevated: true,
    allowed_in_dm: false,
    run,
    help,
};

const UPDATED: &str = "The admin roles have been updated";

fn run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async move {
        if !inv.elevated {
            return Ok(());
        }
        let Ok(subcommand) = inv.tokenizer.advance() else {
            return Ok(());
        };

        match subcommand.value() {
            "list" => {
                let roles = &inv.guild_config()?.admin_role_ids;
                let text = if roles.is_empty() {
                    "No roles are registered as a bot admin".to_string()
                } else {
                    roles.iter().map(RoleId::mention).collect::<Vec<_>>().join(" ")
                };
                inv.reply(text).await;
            }
            "add" => {
                if !inv.tokenizer.has_more() {
                    return Ok(());
                }
                let roles = role_arguments(&mut inv);
                inv.guild_config_mut()?.admin_role_ids.extend(roles);
                inv.state.persist().await;
                inv.reply(UPDATED).await;
            }
            "remove" => {
                let roles = role_arguments(&mut inv);
                let config = inv.guild_config_mut()?;
                let before = config.admin_role_ids.len();
                for role in &roles {
                    config.admin_role_ids.remove(role);
                }
                if config.admin_role_ids.len() != before {
                    inv.state.persist().await;
                    inv.reply(UPDATED).await;
                }
            }
            other => debug!(subcommand = other, "Ignoring unknown admin subcommand"),
        }
        Ok(())
    })
}

/// Every remaining role mention; other tokens are skipped.
fn role_arguments(inv: &mut Invocation<'_>) -> Vec<RoleId> {
    inv.tokenizer
        .by_ref()
        .filter(|token| token.kind() == TokenKind::Role)
        .map(|token| RoleId::new(token.value()))
        .collect()
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}admin` __Used for managing the roles that can manage the bot__\n\
         \n\
         **Usage:** {prefix}admin list\n\
         \x20             {prefix}admin add [role] ...\n\
         \x20             {prefix}admin remove [role] ...\n\
         \n\
         The server owner can always administrate the bot\n\
         \n\
         **Examples:**\n\
         `{prefix}admin list` lists the roles that can currently manage the bot\n\
         `{prefix}admin add @Admin @Moderator` adds the @Admin and @Moderator role to the list of roles that can administrate the bot"
    )
}
