use std::sync::Arc;

use serde::Serialize;
use serenity::{
    all::{ChannelId, Command, CommandId, GuildId, InteractionId, Message, MessageId, RoleId, UserId},
    async_trait,
    http::Http,
};

use crate::{
    discord::{CommandScope, DiscordApi, PermissionOracle},
    error::discord::DiscordApiError,
    model::{
        command::{CommandPayload, RemoteCommand},
        message::{MessageBody, SentMessage},
    },
};

/// Interaction callback type for responding with a channel message.
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

#[derive(Serialize)]
struct InteractionCallback<'a> {
    #[serde(rename = "type")]
    kind: u8,
    data: &'a MessageBody,
}

/// `DiscordApi` backed by serenity's HTTP client.
#[derive(Clone)]
pub struct SerenityDiscord {
    http: Arc<Http>,
}

impl SerenityDiscord {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }
}

fn sent(message: Message) -> SentMessage {
    SentMessage {
        id: message.id,
        channel_id: message.channel_id,
    }
}

fn remote(command: Command) -> Result<RemoteCommand, DiscordApiError> {
    Ok(serde_json::from_value(serde_json::to_value(command)?)?)
}

#[async_trait]
impl DiscordApi for SerenityDiscord {
    async fn create_interaction_response(
        &self,
        interaction_id: InteractionId,
        token: &str,
        body: &MessageBody,
    ) -> Result<(), DiscordApiError> {
        let callback = InteractionCallback {
            kind: CHANNEL_MESSAGE_WITH_SOURCE,
            data: body,
        };
        self.http
            .create_interaction_response(interaction_id, token, &callback, Vec::new())
            .await?;
        Ok(())
    }

    async fn get_original_interaction_response(
        &self,
        token: &str,
    ) -> Result<SentMessage, DiscordApiError> {
        Ok(sent(self.http.get_original_interaction_response(token).await?))
    }

    async fn create_followup_message(
        &self,
        token: &str,
        body: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError> {
        Ok(sent(
            self.http
                .create_followup_message(token, body, Vec::new())
                .await?,
        ))
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        body: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError> {
        Ok(sent(
            self.http.send_message(channel_id, Vec::new(), body).await?,
        ))
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reason: Option<&str>,
    ) -> Result<(), DiscordApiError> {
        self.http
            .delete_message(channel_id, message_id, reason)
            .await?;
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: GuildId) -> Result<String, DiscordApiError> {
        Ok(self.http.get_guild(guild_id).await?.name)
    }

    async fn get_commands(
        &self,
        scope: CommandScope,
    ) -> Result<Vec<RemoteCommand>, DiscordApiError> {
        let commands = match scope {
            CommandScope::Global => self.http.get_global_commands().await?,
            CommandScope::Guild(guild_id) => self.http.get_guild_commands(guild_id).await?,
        };
        commands.into_iter().map(remote).collect()
    }

    async fn create_command(
        &self,
        scope: CommandScope,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError> {
        let command = match scope {
            CommandScope::Global => self.http.create_global_command(payload).await?,
            CommandScope::Guild(guild_id) => {
                self.http.create_guild_command(guild_id, payload).await?
            }
        };
        remote(command)
    }

    async fn edit_command(
        &self,
        scope: CommandScope,
        command_id: CommandId,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError> {
        let command = match scope {
            CommandScope::Global => self.http.edit_global_command(command_id, payload).await?,
            CommandScope::Guild(guild_id) => {
                self.http
                    .edit_guild_command(guild_id, command_id, payload)
                    .await?
            }
        };
        remote(command)
    }

    async fn delete_command(
        &self,
        scope: CommandScope,
        command_id: CommandId,
    ) -> Result<(), DiscordApiError> {
        match scope {
            CommandScope::Global => self.http.delete_global_command(command_id).await?,
            CommandScope::Guild(guild_id) => {
                self.http.delete_guild_command(guild_id, command_id).await?
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionOracle for SerenityDiscord {
    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<RoleId>, DiscordApiError> {
        Ok(self.http.get_member(guild_id, user_id).await?.roles)
    }

    async fn is_administrator(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, DiscordApiError> {
        let guild = self.http.get_guild(guild_id).await?;
        if guild.owner_id == user_id {
            return Ok(true);
        }

        let member = self.http.get_member(guild_id, user_id).await?;
        let everyone = RoleId::new(guild_id.get());

        Ok(guild
            .roles
            .iter()
            .filter(|(role_id, _)| **role_id == everyone || member.roles.contains(role_id))
            .any(|(_, role)| role.permissions.administrator()))
    }
}
