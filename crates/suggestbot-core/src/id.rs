//! Identifier newtypes.
//!
//! Ids are kept as the platform's decimal strings rather than parsed integers:
//! token values, mentions, and the save file all carry them as text, and a
//! lookup with a malformed id must simply miss instead of failing to parse.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// A guild (server).
    GuildId
);
string_id!(
    /// A text or direct-message channel.
    ChannelId
);
string_id!(
    /// A user account.
    UserId
);
string_id!(
    /// A guild role.
    RoleId
);
string_id!(
    /// A single message.
    MessageId
);

impl UserId {
    /// `<@id>` mention markup.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl RoleId {
    /// `<@&id>` mention markup.
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.0)
    }
}

impl ChannelId {
    /// `<#id>` mention markup.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        assert_eq!(UserId::from("42").mention(), "<@42>");
        assert_eq!(RoleId::from("7").mention(), "<@&7>");
        assert_eq!(ChannelId::from("9").mention(), "<#9>");
    }

    #[test]
    fn test_transparent_serde() {
        let json = serde_json::to_string(&GuildId::new("123")).unwrap();
        assert_eq!(json, "\"123\"");
        let id: RoleId = serde_json::from_str("\"55\"").unwrap();
        assert_eq!(id.as_str(), "55");
    }
}
