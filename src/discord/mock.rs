use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use serde_json::Value;
use serenity::{
    all::{ChannelId, CommandId, GuildId, InteractionId, MessageId, RoleId, UserId},
    async_trait,
};

use crate::{
    discord::{CommandScope, DiscordApi, PermissionOracle},
    error::discord::DiscordApiError,
    model::{
        command::{CommandPayload, RemoteCommand},
        message::{MessageBody, SentMessage},
    },
};

/// A call received by `MockDiscord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InteractionResponse { token: String, body: Value },
    OriginalResponse { token: String },
    Followup { token: String, body: Value },
    ChannelMessage { channel_id: ChannelId, body: Value },
    DeleteMessage { channel_id: ChannelId, message_id: MessageId },
    FetchGuild(GuildId),
    GetCommands(CommandScope),
    CreateCommand(String),
    EditCommand(String),
    DeleteCommand(CommandId),
    MemberRoles(UserId),
    IsAdministrator(UserId),
}

impl Call {
    /// Body of a call that delivers a message.
    pub fn message_body(&self) -> Option<&Value> {
        match self {
            Call::InteractionResponse { body, .. }
            | Call::Followup { body, .. }
            | Call::ChannelMessage { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Records every outbound call and answers from in-memory state.
#[derive(Default)]
pub struct MockDiscord {
    calls: Mutex<Vec<Call>>,
    guilds: Mutex<HashMap<GuildId, String>>,
    remote: Mutex<Vec<RemoteCommand>>,
    failing: Mutex<HashSet<String>>,
    admins: Mutex<HashSet<UserId>>,
    roles: Mutex<HashMap<UserId, Vec<RoleId>>>,
    next_id: AtomicU64,
}

impl MockDiscord {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        }
    }

    pub fn with_guild(self, guild_id: u64, name: &str) -> Self {
        self.guilds
            .lock()
            .unwrap()
            .insert(GuildId::new(guild_id), name.to_string());
        self
    }

    pub fn with_remote(self, id: u64, payload: CommandPayload) -> Self {
        self.remote.lock().unwrap().push(RemoteCommand {
            id: CommandId::new(id),
            payload,
        });
        self
    }

    /// Create and edit calls for the named command fail.
    pub fn with_failing_command(self, name: &str) -> Self {
        self.failing.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn with_admin(self, user_id: u64) -> Self {
        self.admins.lock().unwrap().insert(UserId::new(user_id));
        self
    }

    pub fn with_member_roles(self, user_id: u64, roles: &[u64]) -> Self {
        self.roles.lock().unwrap().insert(
            UserId::new(user_id),
            roles.iter().copied().map(RoleId::new).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of all delivered messages, in order.
    pub fn messages(&self) -> Vec<Value> {
        self.calls()
            .iter()
            .filter_map(|call| call.message_body().cloned())
            .collect()
    }

    pub fn remote_commands(&self) -> Vec<RemoteCommand> {
        self.remote.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn sent(&self) -> SentMessage {
        SentMessage {
            id: MessageId::new(self.next_id()),
            channel_id: ChannelId::new(700000000000000001),
        }
    }

    fn check_failing(&self, name: &str) -> Result<(), DiscordApiError> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(DiscordApiError::Rejected {
                status: 400,
                message: format!("Invalid Form Body for '{}'", name),
            });
        }
        Ok(())
    }
}

fn body(body: &MessageBody) -> Value {
    serde_json::to_value(body).unwrap()
}

#[async_trait]
impl DiscordApi for MockDiscord {
    async fn create_interaction_response(
        &self,
        _interaction_id: InteractionId,
        token: &str,
        message: &MessageBody,
    ) -> Result<(), DiscordApiError> {
        self.record(Call::InteractionResponse {
            token: token.to_string(),
            body: body(message),
        });
        Ok(())
    }

    async fn get_original_interaction_response(
        &self,
        token: &str,
    ) -> Result<SentMessage, DiscordApiError> {
        self.record(Call::OriginalResponse {
            token: token.to_string(),
        });
        Ok(self.sent())
    }

    async fn create_followup_message(
        &self,
        token: &str,
        message: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError> {
        self.record(Call::Followup {
            token: token.to_string(),
            body: body(message),
        });
        Ok(self.sent())
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: &MessageBody,
    ) -> Result<SentMessage, DiscordApiError> {
        self.record(Call::ChannelMessage {
            channel_id,
            body: body(message),
        });
        Ok(self.sent())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        _reason: Option<&str>,
    ) -> Result<(), DiscordApiError> {
        self.record(Call::DeleteMessage {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: GuildId) -> Result<String, DiscordApiError> {
        self.record(Call::FetchGuild(guild_id));
        self.guilds
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| DiscordApiError::NotFound(format!("guild {}", guild_id)))
    }

    async fn get_commands(
        &self,
        scope: CommandScope,
    ) -> Result<Vec<RemoteCommand>, DiscordApiError> {
        self.record(Call::GetCommands(scope));
        Ok(self.remote_commands())
    }

    async fn create_command(
        &self,
        _scope: CommandScope,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError> {
        self.record(Call::CreateCommand(payload.name.clone()));
        self.check_failing(&payload.name)?;
        let command = RemoteCommand {
            id: CommandId::new(self.next_id()),
            payload: payload.clone(),
        };
        self.remote.lock().unwrap().push(command.clone());
        Ok(command)
    }

    async fn edit_command(
        &self,
        _scope: CommandScope,
        command_id: CommandId,
        payload: &CommandPayload,
    ) -> Result<RemoteCommand, DiscordApiError> {
        self.record(Call::EditCommand(payload.name.clone()));
        self.check_failing(&payload.name)?;
        let mut remote = self.remote.lock().unwrap();
        let command = remote
            .iter_mut()
            .find(|command| command.id == command_id)
            .ok_or_else(|| DiscordApiError::NotFound(format!("command {}", command_id)))?;
        command.payload = payload.clone();
        Ok(command.clone())
    }

    async fn delete_command(
        &self,
        _scope: CommandScope,
        command_id: CommandId,
    ) -> Result<(), DiscordApiError> {
        self.record(Call::DeleteCommand(command_id));
        self.remote
            .lock()
            .unwrap()
            .retain(|command| command.id != command_id);
        Ok(())
    }
}

#[async_trait]
impl PermissionOracle for MockDiscord {
    async fn member_roles(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<RoleId>, DiscordApiError> {
        self.record(Call::MemberRoles(user_id));
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn is_administrator(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, DiscordApiError> {
        self.record(Call::IsAdministrator(user_id));
        Ok(self.admins.lock().unwrap().contains(&user_id))
    }
}
