//! Runs a resolved command: permission checks, argument binding, handler execution and
//! error reporting.
//!
//! An invocation moves through `Resolved -> PermissionChecked -> ArgumentsResolved ->
//! Executing` and ends in `Succeeded` or `Failed`. A front-end error is always replied
//! to the invoker before the invocation reports failure.

use std::sync::Arc;

use serde_json::Value;
use serenity::all::{CreateEmbed, RoleId};

use crate::{
    discord::PermissionOracle,
    error::{
        command::{CommandError, InvocationError},
        front_end::FrontEndError,
    },
    model::{
        arguments::Arguments,
        command::CommandRecord,
        component::BoundRecipe,
        message::{colour, Reply},
        payload::OptionValue,
        platter::Platter,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Resolved,
    PermissionChecked,
    ArgumentsResolved,
    Executing,
    Succeeded,
    Failed,
}

/// Raw arguments as they arrived, before binding to parameters.
#[derive(Debug, Clone, Copy)]
pub enum ArgumentInput<'a> {
    /// Message text following the command name.
    Prefix(&'a str),
    /// Option values of the resolved (sub-)command.
    Slash(&'a [OptionValue]),
}

pub struct InvocationPipeline<'a> {
    permissions: &'a dyn PermissionOracle,
}

impl<'a> InvocationPipeline<'a> {
    pub fn new(permissions: &'a dyn PermissionOracle) -> Self {
        Self { permissions }
    }

    /// Invokes `command` for the event held by `platter`.
    ///
    /// # Returns
    /// - `Ok(())`: Handler ran to completion
    /// - `Err(InvocationError::FrontEnd)`: Invocation was rejected and the invoker was told why
    /// - `Err(InvocationError::Handler)`: Handler failed, a generic error was shown to the invoker
    pub async fn invoke(
        &self,
        platter: Arc<Platter>,
        command: Arc<CommandRecord>,
        input: ArgumentInput<'_>,
    ) -> Result<(), InvocationError> {
        let full_name = command.full_name();
        let mut state = InvocationState::Resolved;
        tracing::debug!("Attempting to invoke '{}' ({:?})...", full_name, state);

        if let Err(error) = self.check_permissions(&platter, &command).await {
            return self.reject(&platter, &full_name, error).await;
        }
        state = advance(&full_name, state, InvocationState::PermissionChecked);

        let arguments = match bind_arguments(&command, input, platter.usage_prefix()) {
            Ok(arguments) => arguments,
            Err(error) => return self.reject(&platter, &full_name, error).await,
        };
        state = advance(&full_name, state, InvocationState::ArgumentsResolved);

        tracing::info!(
            "Command '{}' was invoked by '{}' with {} argument(s).",
            full_name,
            platter.author().username,
            arguments.len()
        );

        let Some(handler) = command.handler() else {
            advance(&full_name, state, InvocationState::Succeeded);
            return Ok(());
        };
        state = advance(&full_name, state, InvocationState::Executing);

        match handler(Arc::clone(&platter), arguments).await {
            Ok(()) => {
                advance(&full_name, state, InvocationState::Succeeded);
                Ok(())
            }
            Err(error) => self.fail(&platter, &full_name, error).await,
        }
    }

    /// Runs a component recipe for the platter of the component interaction.
    ///
    /// Presses by anyone other than the origin's author are ignored for author-only
    /// recipes. Returns whether the recipe ran.
    pub async fn invoke_recipe(
        &self,
        platter: Arc<Platter>,
        bound: Arc<BoundRecipe>,
    ) -> Result<bool, InvocationError> {
        let custom_id = bound.recipe.custom_id().to_string();

        if bound.recipe.is_author_only() && platter.author().id != bound.origin.author().id {
            tracing::debug!(
                "Ignoring press of '{}' by '{}', only the original author may use it.",
                custom_id,
                platter.author().username
            );
            return Ok(false);
        }

        tracing::debug!("Invoking component recipe '{}'...", custom_id);
        let handler = bound.recipe.handler();
        match handler(Arc::clone(&platter), Arc::clone(&bound.origin)).await {
            Ok(()) => Ok(true),
            Err(error) => self.fail(&platter, &custom_id, error).await.map(|_| true),
        }
    }

    /// Checks, in order, that the extension is allowed in the guild, the command is
    /// enabled and the invoker holds a required role. Hidden commands and commands of
    /// hidden extensions also require administrator rights.
    async fn check_permissions(
        &self,
        platter: &Platter,
        command: &CommandRecord,
    ) -> Result<(), FrontEndError> {
        let guild = platter.guild();

        if let Some(guild) = guild {
            if !guild.is_extension_allowed(command.extension()) {
                return Err(FrontEndError::ExtensionNotAllowedInGuild);
            }
        }

        if !command.is_enabled() {
            return Err(FrontEndError::CommandDisabled);
        }

        let elevated = command.is_hidden()
            || guild.is_some_and(|guild| guild.is_extension_hidden(command.extension()));
        let required_roles = command.required_roles();

        if elevated && !self.is_administrator(platter).await {
            return Err(FrontEndError::MissingPermissions);
        }

        if required_roles.is_empty() {
            return Ok(());
        }

        let required: Vec<_> = required_roles
            .iter()
            .filter_map(|role| guild.and_then(|guild| guild.resolve_role(role)))
            .collect();
        let held = match platter.member_roles() {
            Some(roles) => roles.to_vec(),
            None => self.fetch_member_roles(platter).await,
        };

        if required.iter().any(|role| held.contains(role)) {
            return Ok(());
        }

        Err(FrontEndError::MissingPermissions)
    }

    async fn is_administrator(&self, platter: &Platter) -> bool {
        if let Some(permissions) = platter.member_permissions() {
            return permissions.administrator();
        }

        let Some(guild_id) = platter.guild_id() else {
            return false;
        };
        match self
            .permissions
            .is_administrator(guild_id, platter.author().id)
            .await
        {
            Ok(is_admin) => is_admin,
            Err(e) => {
                tracing::warn!(
                    "Failed to check administrator rights of '{}': {}",
                    platter.author().username,
                    e
                );
                false
            }
        }
    }

    async fn fetch_member_roles(&self, platter: &Platter) -> Vec<RoleId> {
        let Some(guild_id) = platter.guild_id() else {
            return Vec::new();
        };
        self.permissions
            .member_roles(guild_id, platter.author().id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to fetch roles of '{}': {}",
                    platter.author().username,
                    e
                );
                Vec::new()
            })
    }

    /// Replies with the front-end error's embed, then reports the rejection.
    async fn reject(
        &self,
        platter: &Arc<Platter>,
        name: &str,
        error: FrontEndError,
    ) -> Result<(), InvocationError> {
        tracing::warn!("Invocation of '{}' rejected: {}", name, error);

        let reply = Reply::new().embed(error.embed()).reference(true);
        if let Err(e) = platter.send_message(reply).await {
            tracing::error!("Failed to report error for '{}' to the invoker: {}", name, e);
        }

        Err(InvocationError::FrontEnd {
            command: name.to_string(),
            error,
        })
    }

    /// Routes a handler failure to `reject` or reports it as an internal error.
    async fn fail(
        &self,
        platter: &Arc<Platter>,
        name: &str,
        error: CommandError,
    ) -> Result<(), InvocationError> {
        if let CommandError::FrontEnd(error) = error {
            return self.reject(platter, name, error).await;
        }

        tracing::error!("Command '{}' failed: {}", name, error);

        let reply = Reply::new().embed(internal_error_embed()).reference(true);
        if let Err(e) = platter.send_message(reply).await {
            tracing::error!("Failed to report error for '{}' to the invoker: {}", name, e);
        }

        Err(InvocationError::Handler {
            command: name.to_string(),
            source: error,
        })
    }
}

fn advance(name: &str, from: InvocationState, to: InvocationState) -> InvocationState {
    tracing::debug!("Invocation of '{}': {:?} -> {:?}", name, from, to);
    to
}

fn internal_error_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("💥 Something went wrong.")
        .description("*An unexpected error occurred while running this command.*")
        .color(colour::RED)
}

/// Binds raw input to the command's parameters.
///
/// Prefix tokens bind positionally. Slash options bind by option name and unknown
/// options are ignored.
pub fn bind_arguments(
    command: &CommandRecord,
    input: ArgumentInput<'_>,
    usage_prefix: &str,
) -> Result<Arguments, FrontEndError> {
    let mut arguments = Arguments::new();

    match input {
        ArgumentInput::Prefix(text) => {
            let tokens: Vec<&str> = text.split_whitespace().collect();

            let missing: Vec<String> = command
                .params()
                .iter()
                .zip(command.schema())
                .skip(tokens.len())
                .filter(|(_, descriptor)| descriptor.required)
                .map(|(param, _)| param.clone())
                .collect();
            if !missing.is_empty() {
                return Err(FrontEndError::MissingArgument {
                    missing,
                    usage: command.usage(usage_prefix),
                });
            }

            if tokens.len() > command.params().len() {
                return Err(FrontEndError::TooManyArguments {
                    usage: command.usage(usage_prefix),
                });
            }

            for (param, token) in command.params().iter().zip(tokens) {
                arguments.insert(param.clone(), Value::String(token.to_string()));
            }
        }
        ArgumentInput::Slash(options) => {
            for (param, descriptor) in command.params().iter().zip(command.schema()) {
                let value = options
                    .iter()
                    .filter(|option| !is_sub_command(option.kind))
                    .find(|option| option.name == descriptor.name)
                    .and_then(|option| option.value.clone());
                if let Some(value) = value {
                    arguments.insert(param.clone(), value);
                }
            }
        }
    }

    Ok(arguments)
}

fn is_sub_command(kind: u8) -> bool {
    kind == 1 || kind == 2
}
