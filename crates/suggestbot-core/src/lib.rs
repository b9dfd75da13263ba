#![deny(unsafe_code)]

//! SuggestBot core.
//!
//! Turns raw chat text into typed tokens, dispatches prefixed commands to a
//! fixed command table, and tracks forwarded suggestions so moderators can
//! reply to them anonymously. The chat platform itself is reached only through
//! the [`Platform`] trait.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future. The return type for trait
/// methods and command handlers that are called through `dyn` or `fn` pointers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Command table, handlers, and the name registry.
pub mod command;
/// Operational commands issued from the control surface.
pub mod control;
/// Run / deny / ignore decision for an invoked command.
pub mod dispatch;
/// Per-guild settings.
pub mod guild;
/// Platform identifier newtypes.
pub mod id;
/// Elevated-permission checks.
pub mod permissions;
/// The chat platform boundary.
pub mod platform;
/// Event loop owning the bot state.
pub mod service;
/// Process-level bot state.
pub mod state;
/// JSON save file.
pub mod store;
/// Suggestion metadata and expiry.
pub mod suggestion;
/// Token types and the classifier.
pub mod token;
/// Cursor over command text.
pub mod tokenizer;

pub use command::{CommandRegistry, CommandSpec};
pub use control::{ControlCommand, ExitMode};
pub use guild::GuildConfig;
pub use platform::{InboundMessage, Platform, PlatformError};
pub use service::{BotEvent, BotHandle, BotService, ServiceError};
pub use state::BotState;
pub use suggestion::{SuggestionQueue, SuggestionRecord};
pub use token::{DEFAULT_PREFIX, Token, TokenKind};
pub use tokenizer::Tokenizer;
