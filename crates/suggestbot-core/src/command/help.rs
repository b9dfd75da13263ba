use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;

pub(super) const SPEC: CommandSpec = CommandSpec {
    name: "help",
    requires_elevated: false,
    allowed_in_dm: true,
    run,
    help,
};

fn run(mut inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async move {
        let prefix = inv.tokenizer.prefix().to_string();
        let registry = &inv.state.registry;

        let text = match inv.tokenizer.advance() {
            Err(_) => command_list(registry.iter(), &prefix),
            Ok(token) => match registry.get(token.value()) {
                Some(spec) => registry.help_text(spec, &prefix),
                None => format!("Command '{}' was not found.", token.value()),
            },
        };
        inv.reply(text).await;
        Ok(())
    })
}

/// Overview listing standard and admin commands separately.
fn command_list<'s>(commands: impl Iterator<Item = &'s CommandSpec>, prefix: &str) -> String {
    let (admin, standard): (Vec<_>, Vec<_>) = commands.partition(|spec| spec.requires_elevated);

    format!(
        "```bash\n'command List'```\n\
         \n\
         Use `{prefix}help [command]` to get more info on a specific command, for example: `{prefix}help say`\n\
         \n\
         **Standard Commands**\n\
         {}\n\
         \n\
         **Admin Commands**\n\
         {}",
        names(&standard),
        names(&admin),
    )
}

fn names(specs: &[&CommandSpec]) -> String {
    specs
        .iter()
        .map(|spec| format!("`{}`", spec.name))
        .collect::<Vec<_>>()
        .join(" ")
}

fn help(prefix: &str) -> String {
    format!(
        "`{prefix}help` __Displays a list of commands. Provide a command to get its info__\n\
         \n\
         **Usage:** {prefix}help\n\
         \x20             {prefix}help [command]\n\
         \n\
         **Examples:**\n\
         `{prefix}help` displays a list of all commands\n\
         `{prefix}help say` displays the help info for the say command"
    )
}
