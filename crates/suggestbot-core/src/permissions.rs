//! Elevated-permission checks for guild members.

use crate::guild::GuildConfig;
use crate::id::{RoleId, UserId};

/// Platform-level permissions relevant to the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub administrator: bool,
    pub manage_guild: bool,
}

impl Permissions {
    pub const NONE: Self = Self {
        administrator: false,
        manage_guild: false,
    };

    pub const ADMINISTRATOR: Self = Self {
        administrator: true,
        manage_guild: false,
    };

    pub const MANAGE_GUILD: Self = Self {
        administrator: false,
        manage_guild: true,
    };
}

/// A guild member as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: UserId,
    pub is_owner: bool,
    pub role_ids: Vec<RoleId>,
    pub permissions: Permissions,
}

/// Whether `member` may run elevated commands in the guild described by `config`.
///
/// The guild owner always can; otherwise the member needs one of the configured
/// admin roles, or administrator / manage-server permission.
pub fn is_server_admin(member: &Member, config: &GuildConfig) -> bool {
    member.is_owner
        || member
            .role_ids
            .iter()
            .any(|role| config.admin_role_ids.contains(role))
        || member.permissions.administrator
        || member.permissions.manage_guild
}
