//! Outbound Discord API surface used by the framework.
//!
//! Everything the dispatcher, platters, guild setup and the synchronizer send to
//! Discord goes through `DiscordApi`, so tests can substitute a recording mock for the
//! serenity backed client.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod permissions;

use serenity::{
    all::{ChannelId, CommandId, GuildId, InteractionId, MessageId},
    async_trait,
};

use crate::{
    error::discord::DiscordApiError,
    model::{
        command::{CommandPayload, RemoteCommand},
        message::{MessageBody, SentMessage},
    },
};

pub use http::SerenityDiscord;
pub use permissions::PermissionOracle;

/// Where application commands are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    Global,
    /// Guild commands update instantly, which is what `TEST_GUILD_ID` is for.
    Guild(GuildId),
}

#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Responds to an interaction with a channel message (callback type 4).
    async fn create_interaction_response(
        &self,
        interaction_id: InteractionId,
        token: &str,
        body: &MessageBody,
    ) -> Result<(), DiscordApiError>;

    /// Fetches the message created by the interaction callback.
    async fn get_original_interaction_response(
        &self,
        token: &str,
    ) -> Result<SentMessage, DiscordApiError>;

    async fn create_followup_message(
        &self,
        token: &str,
        body: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError>;

    async fn send_message(
        &self,
        channel_id: ChannelId,
        body: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reason: Option<&str>,
    ) -> Result<(), DiscordApiError>;

    /// Fetches a guild's name, failing with `NotFound` if the bot cannot see it.
    async fn fetch_guild(&self, guild_id: GuildId) -> Result<String, DiscordApiError>;

    async fn get_commands(&self, scope: CommandScope)
        -> Result<Vec<RemoteCommand>, DiscordApiError>;

    async fn create_command(
        &self,
        scope: CommandScope,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError>;

    async fn edit_command(
        &self,
        scope: CommandScope,
        command_id: CommandId,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError>;

    async fn delete_command(
        &self,
        scope: CommandScope,
        command_id: CommandId,
    ) -> Result<(), DiscordApiError>;
}
