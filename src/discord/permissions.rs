use serenity::{
    all::{GuildId, RoleId, UserId},
    async_trait,
};

use crate::error::discord::DiscordApiError;

/// Answers permission questions about a guild member when the inbound event did not
/// carry enough information.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<RoleId>, DiscordApiError>;

    /// Whether the member is the guild owner or holds a role with Administrator.
    async fn is_administrator(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, DiscordApiError>;
}
