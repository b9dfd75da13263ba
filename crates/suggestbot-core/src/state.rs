//! Process-level bot state.
//!
//! [`BotState`] owns everything the bot mutates: guild settings, suggestion
//! records and the command registry. It is handed to the dispatcher by
//! reference; there are no process-wide statics.

use tracing::{error, info};

use crate::command::CommandRegistry;
use crate::guild::{GuildConfig, GuildDirectory};
use crate::id::GuildId;
use crate::store::{SaveData, Store, StoreError};
use crate::suggestion::SuggestionQueue;

#[derive(Debug)]
pub struct BotState {
    pub guilds: GuildDirectory,
    pub suggestions: SuggestionQueue,
    pub registry: CommandRegistry,
    store: Store,
}

impl BotState {
    /// Empty state persisting to `store`.
    pub fn new(store: Store) -> Self {
        Self {
            guilds: GuildDirectory::new(),
            suggestions: SuggestionQueue::new(),
            registry: CommandRegistry::new(),
            store,
        }
    }

    /// Rebuild state from a save file, dropping configs for guilds the bot is
    /// no longer a member of.
    pub fn from_save(data: SaveData, store: Store, joined: &[GuildId]) -> Self {
        let mut state = Self::new(store);
        for config in data.guild_data {
            if joined.contains(&config.guild_id) {
                state.guilds.insert(config);
            } else {
                info!(guild = %config.guild_id, "Dropping config for departed guild");
            }
        }
        state.suggestions = data.suggestions.into_iter().collect();
        state
    }

    /// Load from the store's save file.
    pub async fn load(store: Store, joined: &[GuildId]) -> Result<Self, StoreError> {
        let data = store.load().await?;
        Ok(Self::from_save(data, store, joined))
    }

    /// Snapshot of everything that is persisted.
    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            guild_data: self.guilds.sorted().into_iter().cloned().collect(),
            suggestions: self.suggestions.iter().cloned().collect(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.to_save_data()).await
    }

    /// Save, logging instead of failing. The in-memory state stays
    /// authoritative when the write does not go through.
    pub async fn persist(&self) {
        if let Err(e) = self.save().await {
            error!(path = %self.store.path().display(), error = %e, "Failed to save state");
        }
    }

    pub fn guild(&self, guild_id: &GuildId) -> Option<&GuildConfig> {
        self.guilds.get(guild_id)
    }
}
