//! Reconciles locally registered slash commands with Discord.

use std::{collections::HashMap, sync::Arc};

use serenity::all::CommandId;

use crate::{
    command::registry::CommandRegistry,
    discord::{CommandScope, DiscordApi},
    error::discord::DiscordApiError,
    model::command::{CommandKind, CommandPayload, RemoteCommand},
};

/// Calls needed to make Discord's commands match the local ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandDiff {
    pub to_create: Vec<CommandPayload>,
    pub to_update: Vec<(CommandId, CommandPayload)>,
    pub to_delete: Vec<RemoteCommand>,
}

impl CommandDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: usize,
    pub failed: usize,
}

/// Compares local and remote commands by name.
///
/// Local-only commands are created, remote-only commands are deleted and commands
/// whose payload differs are updated. Output is ordered by command name.
pub fn reconcile(local: &[CommandPayload], remote: &[RemoteCommand]) -> CommandDiff {
    let remote_by_name: HashMap<&str, &RemoteCommand> = remote
        .iter()
        .map(|command| (command.payload.name.as_str(), command))
        .collect();
    let local_by_name: HashMap<&str, &CommandPayload> = local
        .iter()
        .map(|payload| (payload.name.as_str(), payload))
        .collect();

    let mut diff = CommandDiff::default();

    for payload in local {
        match remote_by_name.get(payload.name.as_str()) {
            None => diff.to_create.push(payload.clone()),
            Some(existing) if existing.payload != *payload => {
                diff.to_update.push((existing.id, payload.clone()))
            }
            Some(_) => {}
        }
    }

    for command in remote {
        if !local_by_name.contains_key(command.payload.name.as_str()) {
            diff.to_delete.push(command.clone());
        }
    }

    diff.to_create.sort_by(|a, b| a.name.cmp(&b.name));
    diff.to_update.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));
    diff.to_delete
        .sort_by(|a, b| a.payload.name.cmp(&b.payload.name));

    diff
}

#[derive(Clone)]
pub struct CommandSynchronizer {
    discord: Arc<dyn DiscordApi>,
    scope: CommandScope,
}

impl CommandSynchronizer {
    pub fn new(discord: Arc<dyn DiscordApi>, scope: CommandScope) -> Self {
        Self { discord, scope }
    }

    /// Payloads of every loaded top-level slash command.
    pub async fn local_commands(registry: &CommandRegistry) -> Vec<CommandPayload> {
        let mut payloads: Vec<CommandPayload> = registry
            .values()
            .await
            .into_iter()
            .filter(|command| command.kind() == CommandKind::Slash && command.is_loaded())
            .map(|command| command.payload())
            .collect();
        payloads.sort_by(|a, b| a.name.cmp(&b.name));
        payloads
    }

    /// Fetches remote commands, reconciles them with the registry and applies the diff.
    ///
    /// # Returns
    /// - `Ok(SyncReport)`: Counts of applied and failed calls
    /// - `Err(DiscordApiError)`: Remote commands could not be fetched
    pub async fn sync(&self, registry: &CommandRegistry) -> Result<SyncReport, DiscordApiError> {
        let local = Self::local_commands(registry).await;
        let remote = self.discord.get_commands(self.scope).await?;

        let diff = reconcile(&local, &remote);
        if diff.is_empty() {
            tracing::info!("Slash commands are already in sync ({} command(s))", local.len());
            return Ok(SyncReport::default());
        }

        tracing::info!(
            "Syncing slash commands: {} to create, {} to update, {} to delete",
            diff.to_create.len(),
            diff.to_update.len(),
            diff.to_delete.len()
        );
        Ok(self.apply(diff).await)
    }

    /// Applies each call in turn. A failed call is logged and does not stop the rest.
    pub async fn apply(&self, diff: CommandDiff) -> SyncReport {
        let mut report = SyncReport::default();

        for payload in &diff.to_create {
            match self.discord.create_command(self.scope, payload).await {
                Ok(_) => {
                    tracing::debug!("Created slash command '{}'", payload.name);
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to create slash command '{}': {}", payload.name, e);
                    report.failed += 1;
                }
            }
        }

        for (command_id, payload) in &diff.to_update {
            match self
                .discord
                .edit_command(self.scope, *command_id, payload)
                .await
            {
                Ok(_) => {
                    tracing::debug!("Updated slash command '{}'", payload.name);
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to update slash command '{}': {}", payload.name, e);
                    report.failed += 1;
                }
            }
        }

        for command in &diff.to_delete {
            match self.discord.delete_command(self.scope, command.id).await {
                Ok(()) => {
                    tracing::debug!("Deleted slash command '{}'", command.payload.name);
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to delete slash command '{}': {}",
                        command.payload.name,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
