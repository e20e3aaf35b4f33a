//! Shared framework state.
//!
//! `Framework` holds every process-wide service: configuration, the database pool, the
//! Discord API handles and the registries. It is built once at startup and cloned into
//! the gateway event handler. Clones share the same registries.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    command::registry::{CommandRegistry, ComponentRegistry, GuildCache},
    config::Config,
    discord::{DiscordApi, PermissionOracle},
    extensions,
    service::{
        dispatch::Dispatcher,
        extension::ExtensionService,
        guild::{GuildService, GuildSetupReport},
        sync::CommandSynchronizer,
    },
};

#[derive(Clone)]
pub struct Framework {
    pub config: Arc<Config>,

    /// Database connection pool holding guild configuration.
    pub db: DatabaseConnection,

    pub discord: Arc<dyn DiscordApi>,
    pub permissions: Arc<dyn PermissionOracle>,

    pub commands: CommandRegistry,
    pub components: ComponentRegistry,
    pub guilds: GuildCache,

    pub extensions: ExtensionService,
    pub synchronizer: CommandSynchronizer,
}

impl Framework {
    pub fn new(
        config: Arc<Config>,
        db: DatabaseConnection,
        discord: Arc<dyn DiscordApi>,
        permissions: Arc<dyn PermissionOracle>,
    ) -> Self {
        let commands = CommandRegistry::new();
        let components = ComponentRegistry::new();
        let extensions = ExtensionService::new(
            commands.clone(),
            components.clone(),
            config.ignored_extensions.clone(),
        );
        let synchronizer = CommandSynchronizer::new(Arc::clone(&discord), config.command_scope());

        Self {
            config,
            db,
            discord,
            permissions,
            commands,
            components,
            guilds: GuildCache::new(),
            extensions,
            synchronizer,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.commands.clone(),
            self.components.clone(),
            self.guilds.clone(),
            Arc::clone(&self.discord),
            Arc::clone(&self.permissions),
        )
    }

    /// Sets up every allowed guild and fills the guild cache.
    pub async fn setup_guilds(&self) -> GuildSetupReport {
        GuildService::new(&self.db, self.discord.as_ref())
            .setup(&self.config.allowed_guilds, &self.guilds)
            .await
    }

    /// Loads the built-in extensions. An extension that fails to load is logged and skipped.
    pub async fn load_builtin_extensions(&self) {
        for extension in extensions::builtin(self.extensions.clone(), self.synchronizer.clone()) {
            let name = extension.name().to_string();
            if let Err(e) = self.extensions.load(extension).await {
                tracing::error!("Failed to load extension '{}': {}", name, e);
            }
        }
    }
}
