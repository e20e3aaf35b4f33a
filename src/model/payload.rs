//! Raw inbound gateway events.
//!
//! Only the fields the dispatcher reads are modelled. Everything else in the gateway
//! JSON is ignored on deserialization.

use serde::Deserialize;
use serde_json::Value;
use serenity::all::{
    ApplicationId, ChannelId, GuildId, InteractionId, MessageId, Permissions, RoleId, UserId,
};

/// Gateway dispatch name for interactions.
pub const INTERACTION_CREATE: &str = "INTERACTION_CREATE";
/// Gateway dispatch name for messages.
pub const MESSAGE_CREATE: &str = "MESSAGE_CREATE";

#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Interaction(InteractionPayload),
    Message(MessagePayload),
    /// Any other dispatch, carrying its name.
    Unknown(String),
}

impl GatewayEvent {
    /// Parses a gateway dispatch from its name and JSON body.
    pub fn from_raw(name: &str, data: Value) -> Result<Self, serde_json::Error> {
        match name {
            INTERACTION_CREATE => Ok(Self::Interaction(serde_json::from_value(data)?)),
            MESSAGE_CREATE => Ok(Self::Message(serde_json::from_value(data)?)),
            other => Ok(Self::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
    Unknown(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            5 => Self::ModalSubmit,
            other => Self::Unknown(other),
        }
    }
}

impl<'de> Deserialize<'de> for InteractionKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// Computed permissions of the member in the channel, as a decimal string.
    ///
    /// Only present on interactions.
    #[serde(default)]
    pub permissions: Option<String>,
}

impl MemberPayload {
    /// Parsed member permissions, if Discord sent them.
    pub fn permissions(&self) -> Option<Permissions> {
        self.permissions
            .as_deref()
            .and_then(|bits| bits.parse::<u64>().ok())
            .map(Permissions::from_bits_truncate)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    pub id: InteractionId,
    pub application_id: ApplicationId,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    #[serde(default)]
    pub member: Option<MemberPayload>,
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

impl InteractionPayload {
    /// The invoking user, taken from the member in guilds and from `user` in DMs.
    pub fn invoker(&self) -> Option<&UserPayload> {
        self.member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .or(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name for application command interactions.
    #[serde(default)]
    pub name: Option<String>,
    /// Component custom id for component interactions.
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

/// An option value sent with a slash command.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionValue {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub author: UserPayload,
    #[serde(default)]
    pub member: Option<MemberPayload>,
    #[serde(default)]
    pub content: String,
}
