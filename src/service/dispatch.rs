//! Routes inbound gateway events to commands and component recipes.

use std::sync::Arc;

use serenity::all::GuildId;

use crate::{
    command::registry::{CommandRegistry, ComponentRegistry, GuildCache},
    discord::{DiscordApi, PermissionOracle},
    error::command::InvocationError,
    model::{
        command::{CommandKind, CommandRecord},
        guild::GuildConfig,
        payload::{GatewayEvent, InteractionKind, InteractionPayload, MessagePayload, OptionValue},
        platter::{Platter, PlatterKind, PlatterSource},
    },
    service::invocation::{ArgumentInput, InvocationPipeline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event was not meant for the framework or could not be routed.
    Ignored,
    /// A command or component recipe ran.
    Invoked,
}

#[derive(Clone)]
pub struct Dispatcher {
    commands: CommandRegistry,
    components: ComponentRegistry,
    guilds: GuildCache,
    discord: Arc<dyn DiscordApi>,
    permissions: Arc<dyn PermissionOracle>,
}

impl Dispatcher {
    pub fn new(
        commands: CommandRegistry,
        components: ComponentRegistry,
        guilds: GuildCache,
        discord: Arc<dyn DiscordApi>,
        permissions: Arc<dyn PermissionOracle>,
    ) -> Self {
        Self {
            commands,
            components,
            guilds,
            discord,
            permissions,
        }
    }

    /// Dispatches one gateway event.
    ///
    /// Events from unknown guilds, from bots, without the guild prefix or naming an
    /// unknown command are ignored without replying.
    pub async fn dispatch(&self, event: GatewayEvent) -> Result<DispatchOutcome, InvocationError> {
        match event {
            GatewayEvent::Interaction(interaction) => self.on_interaction(interaction).await,
            GatewayEvent::Message(message) => self.on_message(message).await,
            GatewayEvent::Unknown(name) => {
                tracing::trace!("Ignoring gateway event '{}'", name);
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    async fn guild(&self, guild_id: Option<GuildId>) -> Option<Arc<GuildConfig>> {
        let guild_id = guild_id?;
        let guild = self.guilds.lookup(&guild_id).await;
        if guild.is_none() {
            tracing::debug!("Ignoring event from guild {} which is not set up", guild_id);
        }
        guild
    }

    async fn on_interaction(
        &self,
        interaction: InteractionPayload,
    ) -> Result<DispatchOutcome, InvocationError> {
        let Some(guild) = self.guild(interaction.guild_id).await else {
            return Ok(DispatchOutcome::Ignored);
        };

        match interaction.kind {
            InteractionKind::ApplicationCommand => self.on_slash_command(interaction, guild).await,
            InteractionKind::MessageComponent => self.on_component(interaction, guild).await,
            other => {
                tracing::trace!("Ignoring interaction of kind {:?}", other);
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    async fn on_slash_command(
        &self,
        interaction: InteractionPayload,
        guild: Arc<GuildConfig>,
    ) -> Result<DispatchOutcome, InvocationError> {
        let Some(data) = interaction.data.as_ref() else {
            return Ok(DispatchOutcome::Ignored);
        };
        let Some(name) = data.name.as_deref() else {
            return Ok(DispatchOutcome::Ignored);
        };

        let Some(command) = self.commands.lookup(name).await else {
            tracing::debug!("Slash command '{}' is not registered", name);
            return Ok(DispatchOutcome::Ignored);
        };
        if command.kind() == CommandKind::Prefix {
            return Ok(DispatchOutcome::Ignored);
        }

        let Some((target, options)) = resolve_sub_command(command, &data.options) else {
            tracing::debug!("Slash command '{}' named an unknown sub command", name);
            return Ok(DispatchOutcome::Ignored);
        };
        let options = options.to_vec();

        let Some(platter) = Platter::new(
            PlatterKind::SlashCommand,
            PlatterSource::Interaction(interaction),
            Some(Arc::clone(&target)),
            Some(guild),
            Arc::clone(&self.discord),
            self.components.clone(),
        ) else {
            return Ok(DispatchOutcome::Ignored);
        };

        InvocationPipeline::new(self.permissions.as_ref())
            .invoke(Arc::new(platter), target, ArgumentInput::Slash(&options))
            .await?;
        Ok(DispatchOutcome::Invoked)
    }

    async fn on_component(
        &self,
        interaction: InteractionPayload,
        guild: Arc<GuildConfig>,
    ) -> Result<DispatchOutcome, InvocationError> {
        let Some(custom_id) = interaction
            .data
            .as_ref()
            .and_then(|data| data.custom_id.clone())
        else {
            return Ok(DispatchOutcome::Ignored);
        };

        let Some(bound) = self.components.lookup(custom_id.as_str()).await else {
            tracing::debug!("No recipe registered for component '{}'", custom_id);
            return Ok(DispatchOutcome::Ignored);
        };

        let Some(platter) = Platter::new(
            PlatterKind::Component,
            PlatterSource::Interaction(interaction),
            bound.origin.command().cloned(),
            Some(guild),
            Arc::clone(&self.discord),
            self.components.clone(),
        ) else {
            return Ok(DispatchOutcome::Ignored);
        };

        let invoked = InvocationPipeline::new(self.permissions.as_ref())
            .invoke_recipe(Arc::new(platter), bound)
            .await?;

        Ok(if invoked {
            DispatchOutcome::Invoked
        } else {
            DispatchOutcome::Ignored
        })
    }

    async fn on_message(&self, message: MessagePayload) -> Result<DispatchOutcome, InvocationError> {
        if message.author.bot {
            return Ok(DispatchOutcome::Ignored);
        }

        let Some(guild) = self.guild(message.guild_id).await else {
            return Ok(DispatchOutcome::Ignored);
        };

        let Some(rest) = message.content.strip_prefix(guild.prefix.as_str()) else {
            return Ok(DispatchOutcome::Ignored);
        };
        let (name, remainder) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if name.is_empty() {
            return Ok(DispatchOutcome::Ignored);
        }

        let Some(command) = self.commands.lookup(name).await else {
            tracing::debug!("Prefix command '{}' is not registered", name);
            return Ok(DispatchOutcome::Ignored);
        };
        if !command.allows_prefix() {
            tracing::debug!("Command '{}' cannot be invoked by prefix", name);
            return Ok(DispatchOutcome::Ignored);
        }

        let remainder = remainder.to_string();
        let Some(platter) = Platter::new(
            PlatterKind::PrefixCommand,
            PlatterSource::Message(message),
            Some(Arc::clone(&command)),
            Some(guild),
            Arc::clone(&self.discord),
            self.components.clone(),
        ) else {
            return Ok(DispatchOutcome::Ignored);
        };

        InvocationPipeline::new(self.permissions.as_ref())
            .invoke(Arc::new(platter), command, ArgumentInput::Prefix(&remainder))
            .await?;
        Ok(DispatchOutcome::Invoked)
    }
}

/// Walks sub-command options down to the command that should run.
fn resolve_sub_command(
    command: Arc<CommandRecord>,
    options: &[OptionValue],
) -> Option<(Arc<CommandRecord>, &[OptionValue])> {
    match options.first() {
        Some(option) if option.kind == 1 || option.kind == 2 => {
            let child = command.child(&option.name)?;
            resolve_sub_command(child, &option.options)
        }
        _ => Some((command, options)),
    }
}
