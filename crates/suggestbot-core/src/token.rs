//! Token types and the token classifier.
//!
//! A *text unit* is one whitespace- or quote-delimited piece of input. The
//! classifier looks at a single unit and decides what it is: a prefixed
//! command, a user/role/channel mention, a numeric range, a number, or plain
//! text. Classification is pure; it never talks to the platform.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::warn;

use crate::command::{CommandRegistry, CommandSpec};
use crate::id::{ChannelId, RoleId, UserId};

/// The bot's built-in command prefix. Always checked before any guild prefix.
pub const DEFAULT_PREFIX: &str = "sb!";

/// What a token was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Command,
    User,
    Role,
    TextChannel,
    Text,
    Number,
    Range,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Command => "COMMAND",
            TokenKind::User => "USER",
            TokenKind::Role => "ROLE",
            TokenKind::TextChannel => "TEXT_CHANNEL",
            TokenKind::Text => "TEXT",
            TokenKind::Number => "NUMBER",
            TokenKind::Range => "RANGE",
        };
        f.write_str(name)
    }
}

/// A classified text unit.
///
/// `value` is the normalized payload (a mention's id, a command name without
/// its prefix); `raw_value` is the text unit exactly as it appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    value: String,
    raw_value: String,
}

impl Token {
    fn new(kind: TokenKind, value: &str, raw_value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            raw_value: raw_value.to_string(),
        }
    }

    fn unwrapped(kind: TokenKind, text: &str) -> Self {
        Self::new(kind, text, text)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Interpret the token's payload.
    ///
    /// Evaluated on every call; callers that need the value twice should keep
    /// the result. Returns `None` (and logs) when the payload cannot be
    /// interpreted, e.g. a range bound that overflows.
    pub fn resolve<'r>(&self, registry: &'r CommandRegistry) -> Option<TokenValue<'r>> {
        let resolved = match self.kind {
            TokenKind::Command => Some(TokenValue::Command(registry.lookup(&self.value))),
            TokenKind::User => Some(TokenValue::User(UserId::new(self.value.as_str()))),
            TokenKind::Role => Some(TokenValue::Role(RoleId::new(self.value.as_str()))),
            TokenKind::TextChannel => {
                Some(TokenValue::TextChannel(ChannelId::new(self.value.as_str())))
            }
            TokenKind::Text => Some(TokenValue::Text(self.value.clone())),
            TokenKind::Number => match self.value.parse::<i64>() {
                Ok(n) => Some(TokenValue::Integer(n)),
                Err(_) => self.value.parse::<f64>().ok().map(TokenValue::Float),
            },
            TokenKind::Range => self.value.split_once('-').and_then(|(lo, hi)| {
                let lo = lo.parse::<i64>().ok()?;
                let hi = hi.parse::<i64>().ok()?;
                Some(TokenValue::Range(lo..=hi))
            }),
        };

        if resolved.is_none() {
            warn!(
                kind = %self.kind,
                value = %self.value,
                raw = %self.raw_value,
                "Token value could not be interpreted"
            );
        }
        resolved
    }
}

/// The interpreted payload of a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue<'r> {
    Command(&'r CommandSpec),
    User(UserId),
    Role(RoleId),
    TextChannel(ChannelId),
    Text(String),
    Integer(i64),
    Float(f64),
    Range(RangeInclusive<i64>),
}

impl fmt::Display for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Command(spec) => write!(f, "command {}", spec.name),
            TokenValue::User(id) => write!(f, "user {id}"),
            TokenValue::Role(id) => write!(f, "role {id}"),
            TokenValue::TextChannel(id) => write!(f, "channel {id}"),
            TokenValue::Text(text) => write!(f, "text {text:?}"),
            TokenValue::Integer(n) => write!(f, "integer {n}"),
            TokenValue::Float(n) => write!(f, "float {n}"),
            TokenValue::Range(r) => write!(f, "range {}..={}", r.start(), r.end()),
        }
    }
}

/// Classify a single text unit.
///
/// `prefix` is the guild's configured prefix, `default_prefix` the bot's
/// built-in one; the default prefix wins when both match.
pub fn classify(prefix: &str, default_prefix: &str, text: &str) -> Token {
    if let Some(name) = text.strip_prefix(default_prefix) {
        return Token::new(TokenKind::Command, name, text);
    }
    if let Some(name) = text.strip_prefix(prefix) {
        return Token::new(TokenKind::Command, name, text);
    }
    if let Some(id) = mention_id(text, "<@").or_else(|| mention_id(text, "<@!")) {
        return Token::new(TokenKind::User, id, text);
    }
    if let Some(id) = mention_id(text, "<@&") {
        return Token::new(TokenKind::Role, id, text);
    }
    if let Some(id) = mention_id(text, "<#") {
        return Token::new(TokenKind::TextChannel, id, text);
    }
    if is_range(text) {
        return Token::unwrapped(TokenKind::Range, text);
    }
    if is_number(text) {
        return Token::unwrapped(TokenKind::Number, text);
    }
    Token::unwrapped(TokenKind::Text, text)
}

/// `open` + digits + `>`, returning the digits.
fn mention_id<'t>(text: &'t str, open: &str) -> Option<&'t str> {
    let digits = text.strip_prefix(open)?.strip_suffix('>')?;
    is_digits(digits).then_some(digits)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Length of the leading ASCII digit run.
fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn is_range(text: &str) -> bool {
    text.split_once('-')
        .is_some_and(|(lo, hi)| is_digits(lo) && is_digits(hi))
}

/// `-?digits(.digits)?([eE]digits)?`
fn is_number(text: &str) -> bool {
    let rest = text.strip_prefix('-').unwrap_or(text);

    let int = digit_run(rest);
    if int == 0 {
        return false;
    }
    let mut rest = &rest[int..];

    if let Some(frac) = rest.strip_prefix('.') {
        let n = digit_run(frac);
        if n == 0 {
            return false;
        }
        rest = &frac[n..];
    }

    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let n = digit_run(exp);
        if n == 0 {
            return false;
        }
        rest = &exp[n..];
    }

    rest.is_empty()
}
