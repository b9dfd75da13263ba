//! JSON save file holding guild settings and suggestion records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::guild::GuildConfig;
use crate::suggestion::SuggestionRecord;

/// Errors from reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub guild_data: Vec<GuildConfig>,
    #[serde(default)]
    pub suggestions: Vec<SuggestionRecord>,
}

impl SaveData {
    /// Encode with four-space indentation.
    pub fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// Location of the save file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the save file. A missing file is an empty state.
    pub async fn load(&self) -> Result<SaveData, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No save file found, starting empty");
                return Ok(SaveData::default());
            }
            Err(e) => return Err(e.into()),
        };
        let data: SaveData = serde_json::from_slice(&bytes)?;
        info!(
            path = %self.path.display(),
            guilds = data.guild_data.len(),
            suggestions = data.suggestions.len(),
            "Loaded save file"
        );
        Ok(data)
    }

    /// Write the save file, replacing it atomically.
    pub async fn save(&self, data: &SaveData) -> Result<(), StoreError> {
        let json = data.to_json()?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "Saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ChannelId, GuildId, MessageId, RoleId};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> SaveData {
        let mut guild = GuildConfig::new(GuildId::from("1"), Some(ChannelId::from("10")));
        guild.admin_role_ids.insert(RoleId::from("5"));
        SaveData {
            guild_data: vec![guild],
            suggestions: vec![SuggestionRecord {
                submitted_at_millis: 1_700_000_000_000,
                suggestion_message_id: MessageId::from("900"),
                origin_channel_id: ChannelId::from("800"),
            }],
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("saveData.json"));
        assert_eq!(store.load().await.unwrap(), SaveData::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("saveData.json"));
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("saveData.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let result = Store::new(path).load().await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn test_four_space_indent() {
        let json = String::from_utf8(sample().to_json().unwrap()).unwrap();
        assert!(json.starts_with("{\n    \"guildData\": ["));
    }

    #[test]
    fn test_missing_sections_default() {
        let data: SaveData = serde_json::from_str("{}").unwrap();
        assert!(data.guild_data.is_empty());
        assert!(data.suggestions.is_empty());
    }
}
