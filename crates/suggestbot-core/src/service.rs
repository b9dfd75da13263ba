//! The bot event loop.
//!
//! [`BotService`] owns the [`BotState`] and processes platform and operator
//! events one at a time from a bounded queue. Producers (the platform
//! gateway, the console reader) talk to it through a cloneable [`BotHandle`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use suggestbot_config::{AppConfig, BotConfig};

use crate::control::{ControlCommand, ExitMode};
use crate::dispatch::{Outcome, dispatch};
use crate::id::{GuildId, MessageId};
use crate::platform::{InboundMessage, OutboundMessage, Platform, notify};
use crate::state::BotState;
use crate::store::{Store, StoreError};
use crate::token::{DEFAULT_PREFIX, TokenKind};
use crate::tokenizer::Tokenizer;

const THANKS: &str = "Thank you for making a suggestion or complaint. It has been anonymously forwarded to the moderation team";
const ATTACHMENTS_DROPPED: &str = "1 or more attachments were found in your message. Attachments are not sent as part of a suggestion. Use links instead.";
const FORWARD_FAILED: &str = "Your suggestion or complaint was unable to be forwarded. Try a shorter message. If the problem persists contact the moderation team";

/// Errors from starting or talking to the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("bot service is not running")]
    Closed,

    #[error("failed to load state: {0}")]
    Store(#[from] StoreError),
}

/// Events consumed by the service loop.
#[derive(Debug)]
pub enum BotEvent {
    MessageReceived(InboundMessage),
    GuildJoined(GuildId),
    Control(ControlCommand),
    /// The platform connection is gone; persist and stop.
    Shutdown,
}

/// Handle for feeding events to a running [`BotService`].
#[derive(Debug, Clone)]
pub struct BotHandle {
    events_tx: mpsc::Sender<BotEvent>,
}

impl BotHandle {
    async fn send(&self, event: BotEvent) -> Result<(), ServiceError> {
        self.events_tx
            .send(event)
            .await
            .map_err(|_| ServiceError::Closed)
    }

    pub async fn message_received(&self, message: InboundMessage) -> Result<(), ServiceError> {
        self.send(BotEvent::MessageReceived(message)).await
    }

    pub async fn guild_joined(&self, guild_id: GuildId) -> Result<(), ServiceError> {
        self.send(BotEvent::GuildJoined(guild_id)).await
    }

    pub async fn control(&self, command: ControlCommand) -> Result<(), ServiceError> {
        self.send(BotEvent::Control(command)).await
    }

    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(BotEvent::Shutdown).await
    }
}

/// Single consumer of [`BotEvent`]s; the only owner of the bot state.
pub struct BotService {
    events_rx: mpsc::Receiver<BotEvent>,
    state: BotState,
    platform: Arc<dyn Platform>,
    presence: String,
}

impl BotService {
    /// Create a service around existing state and return it with its handle.
    pub fn new(state: BotState, platform: Arc<dyn Platform>, config: &BotConfig) -> (Self, BotHandle) {
        let (events_tx, events_rx) = mpsc::channel(config.event_queue_capacity.max(1));

        let service = Self {
            events_rx,
            state,
            platform,
            presence: config.presence.clone(),
        };

        (service, BotHandle { events_tx })
    }

    /// Load the save file, register defaults for joined guilds that have no
    /// settings yet, and set the presence.
    pub async fn start(
        config: &AppConfig,
        platform: Arc<dyn Platform>,
    ) -> Result<(Self, BotHandle), ServiceError> {
        let joined = platform.guilds();
        let store = Store::new(config.save_path());
        let state = BotState::load(store, &joined).await?;

        let (mut service, handle) = Self::new(state, platform, &config.bot);
        let mut registered = 0;
        for guild_id in joined {
            if service.register_guild(guild_id) {
                registered += 1;
            }
        }
        if registered > 0 {
            service.state.persist().await;
        }
        service.platform.set_presence(&service.presence);

        info!(
            guilds = service.state.guilds.len(),
            suggestions = service.state.suggestions.len(),
            registered,
            "Bot service ready"
        );
        Ok((service, handle))
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Run the event loop until a shutdown or reload, then persist.
    ///
    /// A closed queue counts as a shutdown.
    pub async fn run(mut self) -> ExitMode {
        info!("Bot service started");

        let mode = loop {
            let Some(event) = self.events_rx.recv().await else {
                break ExitMode::Shutdown;
            };
            if let Some(mode) = self.handle_event(event).await {
                break mode;
            }
        };

        self.state.persist().await;
        info!(?mode, "Bot service stopped");
        mode
    }

    /// Process one event. Returns the exit mode when the event stops the loop.
    pub async fn handle_event(&mut self, event: BotEvent) -> Option<ExitMode> {
        match event {
            BotEvent::MessageReceived(message) => {
                self.handle_message(&message).await;
                None
            }
            BotEvent::GuildJoined(guild_id) => {
                if self.register_guild(guild_id) {
                    self.state.persist().await;
                }
                None
            }
            BotEvent::Control(command) => self.handle_control(command),
            BotEvent::Shutdown => Some(ExitMode::Shutdown),
        }
    }

    fn handle_control(&mut self, command: ControlCommand) -> Option<ExitMode> {
        match command {
            ControlCommand::Shutdown => Some(ExitMode::Shutdown),
            ControlCommand::Reload => Some(ExitMode::Reload),
            ControlCommand::Ping => {
                info!("pong");
                None
            }
            ControlCommand::ResetPresence => {
                self.platform.set_presence(&self.presence);
                info!("Presence has been reset");
                None
            }
        }
    }

    /// Register default settings for a guild unless it already has some.
    fn register_guild(&mut self, guild_id: GuildId) -> bool {
        let default_channel = self.platform.default_channel(&guild_id);
        let created = self.state.guilds.ensure(guild_id.clone(), default_channel);
        if created {
            info!(guild = %guild_id, "Registered new guild");
        }
        created
    }

    /// Dispatch a command, or forward a direct message as a suggestion.
    pub async fn handle_message(&mut self, message: &InboundMessage) {
        if message.author.is_bot {
            return;
        }

        let prefix = match &message.guild_id {
            None => DEFAULT_PREFIX.to_string(),
            Some(guild_id) => match self.state.guild(guild_id) {
                Some(config) => config.bot_prefix.clone(),
                None => {
                    error!(guild = %guild_id, message = %message.id, "No settings for guild, dropping message");
                    return;
                }
            },
        };

        let mut tokenizer = Tokenizer::new(&message.content, &prefix);
        match tokenizer.advance() {
            Ok(first) if first.kind() == TokenKind::Command => {
                let platform = Arc::clone(&self.platform);
                match dispatch(first.value(), &mut tokenizer, &mut self.state, platform.as_ref(), message).await {
                    Ok(Outcome::Ran) => {}
                    Ok(outcome) => debug!(command = first.value(), ?outcome, "Command did not run"),
                    Err(e) => error!(command = first.value(), error = %e, "Command failed"),
                }
            }
            Ok(_) if message.is_direct() => self.forward_suggestion(message).await,
            // Plain guild chatter, or blank content such as an attachment-only DM.
            Ok(_) | Err(_) => {}
        }

        if message.is_direct() {
            let expired = self.state.suggestions.expire(message.timestamp_millis);
            if expired > 0 {
                debug!(expired, "Expired old suggestions");
            }
        }
    }

    /// Post a direct message to the suggestion channel of every guild the
    /// author shares with the bot.
    async fn forward_suggestion(&mut self, message: &InboundMessage) {
        let content = suggestion_text(&message.id, &message.content);
        let mut forwarded = 0usize;

        for guild_id in self.platform.guilds() {
            if !self.platform.is_guild_member(&guild_id, &message.author.id) {
                continue;
            }
            let Some(channel_id) = self
                .state
                .guild(&guild_id)
                .and_then(|config| config.suggestion_channel_id.clone())
            else {
                warn!(guild = %guild_id, "Guild has no suggestion channel, skipping");
                continue;
            };

            match self
                .platform
                .send_message(&channel_id, OutboundMessage::text(content.clone()))
                .await
            {
                Ok(_) => {
                    forwarded += 1;
                    if forwarded == 1 {
                        self.acknowledge(message).await;
                    }
                }
                Err(e) => {
                    warn!(guild = %guild_id, channel = %channel_id, error = %e, "Failed to forward suggestion");
                    notify(self.platform.as_ref(), &message.channel_id, FORWARD_FAILED).await;
                    break;
                }
            }
        }

        if forwarded > 0 {
            self.state.suggestions.record(
                message.timestamp_millis,
                message.id.clone(),
                message.channel_id.clone(),
            );
            self.state.persist().await;
            info!(suggestion = %message.id, guilds = forwarded, "Forwarded suggestion");
        }
    }

    async fn acknowledge(&self, message: &InboundMessage) {
        notify(self.platform.as_ref(), &message.channel_id, THANKS).await;
        if message.has_attachments {
            notify(self.platform.as_ref(), &message.channel_id, ATTACHMENTS_DROPPED).await;
        }
    }
}

/// The text posted to a suggestion channel, with `@everyone` defused.
fn suggestion_text(id: &MessageId, content: &str) -> String {
    let content = content.replace("@everyone", "@\u{200B}everyone");
    format!("**A suggestion/complaint has been submitted with id {id}.**\n{content}")
}
