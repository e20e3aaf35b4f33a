//! Per-invocation context handed to command and component handlers.

use std::sync::Arc;

use serenity::all::{ChannelId, GuildId, Permissions, RoleId, UserId};
use tokio::sync::Mutex;

use crate::{
    command::registry::ComponentRegistry,
    discord::DiscordApi,
    error::discord::DiscordApiError,
    model::{
        command::CommandRecord,
        component::BoundRecipe,
        guild::GuildConfig,
        message::{MessageReference, Reply, SentMessage},
        payload::{InteractionPayload, MessagePayload},
    },
};

/// Reason attached to the audit log when a reply deletes itself.
const DELETE_AFTER_REASON: &str = "Message scheduled for deletion after a delay.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatterKind {
    SlashCommand,
    PrefixCommand,
    Component,
}

/// The inbound event an invocation came from.
#[derive(Debug, Clone)]
pub enum PlatterSource {
    Interaction(InteractionPayload),
    Message(MessagePayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    pub bot: bool,
}

pub struct Platter {
    kind: PlatterKind,
    source: PlatterSource,
    author: Author,
    command: Option<Arc<CommandRecord>>,
    guild: Option<Arc<GuildConfig>>,
    responded: Mutex<bool>,
    discord: Arc<dyn DiscordApi>,
    components: ComponentRegistry,
}

impl Platter {
    /// Creates a platter for an inbound event.
    ///
    /// Returns `None` if the event does not identify its author.
    pub fn new(
        kind: PlatterKind,
        source: PlatterSource,
        command: Option<Arc<CommandRecord>>,
        guild: Option<Arc<GuildConfig>>,
        discord: Arc<dyn DiscordApi>,
        components: ComponentRegistry,
    ) -> Option<Self> {
        let author = match &source {
            PlatterSource::Interaction(interaction) => {
                let user = interaction.invoker()?;
                Author {
                    id: user.id,
                    username: user.username.clone(),
                    bot: user.bot,
                }
            }
            PlatterSource::Message(message) => Author {
                id: message.author.id,
                username: message.author.username.clone(),
                bot: message.author.bot,
            },
        };

        Some(Self {
            kind,
            source,
            author,
            command,
            guild,
            responded: Mutex::new(false),
            discord,
            components,
        })
    }

    pub fn kind(&self) -> PlatterKind {
        self.kind
    }

    pub fn source(&self) -> &PlatterSource {
        &self.source
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn command(&self) -> Option<&Arc<CommandRecord>> {
        self.command.as_ref()
    }

    pub fn guild(&self) -> Option<&Arc<GuildConfig>> {
        self.guild.as_ref()
    }

    pub fn guild_id(&self) -> Option<GuildId> {
        match &self.source {
            PlatterSource::Interaction(interaction) => interaction.guild_id,
            PlatterSource::Message(message) => message.guild_id,
        }
    }

    pub fn channel_id(&self) -> Option<ChannelId> {
        match &self.source {
            PlatterSource::Interaction(interaction) => interaction.channel_id,
            PlatterSource::Message(message) => Some(message.channel_id),
        }
    }

    /// Member roles carried by the inbound event, if any.
    pub fn member_roles(&self) -> Option<&[RoleId]> {
        let member = match &self.source {
            PlatterSource::Interaction(interaction) => interaction.member.as_ref(),
            PlatterSource::Message(message) => message.member.as_ref(),
        };
        member.map(|member| member.roles.as_slice())
    }

    /// Member permissions carried by the inbound event. Only interactions carry them.
    pub fn member_permissions(&self) -> Option<Permissions> {
        match &self.source {
            PlatterSource::Interaction(interaction) => interaction
                .member
                .as_ref()
                .and_then(|member| member.permissions()),
            PlatterSource::Message(_) => None,
        }
    }

    /// Prefix shown in usage lines for this invocation.
    pub fn usage_prefix(&self) -> &str {
        match self.kind {
            PlatterKind::PrefixCommand => self
                .guild
                .as_ref()
                .map(|guild| guild.prefix.as_str())
                .unwrap_or(super::guild::DEFAULT_PREFIX),
            PlatterKind::SlashCommand | PlatterKind::Component => "/",
        }
    }

    pub async fn has_responded(&self) -> bool {
        *self.responded.lock().await
    }

    /// Sends a reply to wherever this invocation came from.
    ///
    /// The first reply to an interaction is sent as the interaction callback, later ones
    /// as follow-ups. Prefix invocations reply in the message's channel. Component
    /// recipes carried by the reply are registered against this platter before sending.
    pub async fn send_message(self: &Arc<Self>, reply: Reply) -> Result<SentMessage, DiscordApiError> {
        let reference = reply.references_origin();
        let delete_after = reply.deletion_delay();
        let (mut body, recipes) = reply.into_parts();

        for recipe in recipes {
            let custom_id = recipe.custom_id().to_string();
            self.components
                .register(
                    custom_id,
                    Arc::new(BoundRecipe {
                        recipe,
                        origin: Arc::clone(self),
                    }),
                )
                .await;
        }

        let sent = match &self.source {
            PlatterSource::Interaction(interaction) => {
                let mut responded = self.responded.lock().await;
                if *responded {
                    self.discord
                        .create_followup_message(&interaction.token, &body)
                        .await?
                } else {
                    self.discord
                        .create_interaction_response(interaction.id, &interaction.token, &body)
                        .await?;
                    *responded = true;
                    tracing::debug!("Interaction callback message sent, fetching original response.");
                    self.discord
                        .get_original_interaction_response(&interaction.token)
                        .await?
                }
            }
            PlatterSource::Message(message) => {
                if reference {
                    body.message_reference = Some(MessageReference {
                        message_id: message.id,
                        channel_id: message.channel_id,
                        guild_id: message.guild_id,
                    });
                }
                let sent = self.discord.send_message(message.channel_id, &body).await?;
                *self.responded.lock().await = true;
                sent
            }
        };

        if let Some(delay) = delete_after {
            let discord = Arc::clone(&self.discord);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = discord
                    .delete_message(sent.channel_id, sent.id, Some(DELETE_AFTER_REASON))
                    .await
                {
                    tracing::warn!("Failed to delete message {} after delay: {}", sent.id, e);
                }
            });
        }

        Ok(sent)
    }
}

impl std::fmt::Debug for Platter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platter")
            .field("kind", &self.kind)
            .field("author", &self.author)
            .field("command", &self.command.as_ref().map(|c| c.full_name()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use test_utils::gateway;

    use super::*;
    use crate::{
        discord::mock::{Call, MockDiscord},
        model::payload::GatewayEvent,
    };

    fn interaction_platter(discord: Arc<MockDiscord>) -> Arc<Platter> {
        let raw = gateway::command_interaction(1, 42, "hello", json!([]));
        let Ok(GatewayEvent::Interaction(interaction)) =
            GatewayEvent::from_raw("INTERACTION_CREATE", raw)
        else {
            panic!("expected an interaction");
        };
        Arc::new(
            Platter::new(
                PlatterKind::SlashCommand,
                PlatterSource::Interaction(interaction),
                None,
                None,
                discord,
                ComponentRegistry::new(),
            )
            .unwrap(),
        )
    }

    fn message_platter(discord: Arc<MockDiscord>) -> Arc<Platter> {
        let raw = gateway::message(1, 42, "!hello", false);
        let Ok(GatewayEvent::Message(message)) = GatewayEvent::from_raw("MESSAGE_CREATE", raw)
        else {
            panic!("expected a message");
        };
        Arc::new(
            Platter::new(
                PlatterKind::PrefixCommand,
                PlatterSource::Message(message),
                None,
                None,
                discord,
                ComponentRegistry::new(),
            )
            .unwrap(),
        )
    }

    /// Tests the reply path for interactions.
    ///
    /// Verifies that the first reply uses the interaction callback and fetches the
    /// original response, and that later replies are follow-ups.
    ///
    /// Expected: callback, original-response fetch, then one follow-up
    #[tokio::test]
    async fn interaction_replies_use_callback_then_followups() {
        let discord = Arc::new(MockDiscord::new());
        let platter = interaction_platter(discord.clone());

        assert!(!platter.has_responded().await);
        platter.send_message(Reply::text("first")).await.unwrap();
        platter.send_message(Reply::text("second")).await.unwrap();

        let calls = discord.calls();
        assert!(matches!(&calls[0], Call::InteractionResponse { token, body }
            if token == "interaction-token" && body["content"] == "first"));
        assert!(matches!(&calls[1], Call::OriginalResponse { .. }));
        assert!(matches!(&calls[2], Call::Followup { body, .. } if body["content"] == "second"));
        assert_eq!(calls.len(), 3);
        assert!(platter.has_responded().await);
    }

    #[tokio::test]
    async fn message_replies_reference_origin_when_asked() {
        let discord = Arc::new(MockDiscord::new());
        let platter = message_platter(discord.clone());

        platter
            .send_message(Reply::text("pong").reference(true))
            .await
            .unwrap();

        let calls = discord.calls();
        assert_eq!(calls.len(), 1);
        let Call::ChannelMessage { body, .. } = &calls[0] else {
            panic!("expected a channel message");
        };
        assert!(body["message_reference"]["message_id"]
            .to_string()
            .contains("500000000000000001"));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_after_removes_sent_message() {
        let discord = Arc::new(MockDiscord::new());
        let platter = message_platter(discord.clone());

        platter
            .send_message(Reply::text("brb").delete_after(Duration::from_secs(5)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert!(discord
            .calls()
            .iter()
            .any(|call| matches!(call, Call::DeleteMessage { .. })));
    }
}
