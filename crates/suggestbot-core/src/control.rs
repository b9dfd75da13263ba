//! Operator commands read from the console.

use std::fmt;

use crate::token::DEFAULT_PREFIX;
use crate::tokenizer::Tokenizer;

/// An operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Persist and stop for good.
    Shutdown,
    /// Persist and stop, asking the supervisor to start the bot again.
    Reload,
    Ping,
    /// Restore the configured presence text.
    ResetPresence,
}

impl ControlCommand {
    /// Parse a console line. Only the first word matters; unknown words
    /// yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let token = Tokenizer::new(line, DEFAULT_PREFIX).advance().ok()?;
        match token.value() {
            "shutdown" => Some(Self::Shutdown),
            "reload" => Some(Self::Reload),
            "ping" => Some(Self::Ping),
            "resetPresence" => Some(Self::ResetPresence),
            _ => None,
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shutdown => "shutdown",
            Self::Reload => "reload",
            Self::Ping => "ping",
            Self::ResetPresence => "resetPresence",
        })
    }
}

/// How the service loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMode {
    Shutdown,
    Reload,
}

impl ExitMode {
    /// Process exit code; a supervisor restarts the bot on `1`.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Shutdown => 0,
            Self::Reload => 1,
        }
    }
}
