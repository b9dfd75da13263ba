use super::{CommandError, CommandSpec, Invocation};
use crate::BoxFuture;

/// Answers every unknown command name.
pub(super) const SPEC: CommandSpec = CommandSpec {
    name: super::NOOP,
    requires_elevated: false,
    allowed_in_dm: true,
    run,
    help,
};

fn run(_inv: Invocation<'_>) -> BoxFuture<'_, Result<(), CommandError>> {
    Box::pin(async { Ok(()) })
}

fn help(_prefix: &str) -> String {
    String::new()
}
