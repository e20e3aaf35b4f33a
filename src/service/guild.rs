//! Guild setup: verifies allowed guilds exist and loads their configuration.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    command::registry::GuildCache,
    config::AllowedGuild,
    data::guild_config::GuildConfigRepository,
    discord::DiscordApi,
    error::{discord::DiscordApiError, AppError},
    model::guild::GuildConfig,
};

/// Outcome of setting up every allowed guild.
#[derive(Debug, Default)]
pub struct GuildSetupReport {
    pub ready: Vec<GuildConfig>,
    pub failed: Vec<(AllowedGuild, AppError)>,
}

pub struct GuildService<'a> {
    db: &'a DatabaseConnection,
    discord: &'a dyn DiscordApi,
}

impl<'a> GuildService<'a> {
    pub fn new(db: &'a DatabaseConnection, discord: &'a dyn DiscordApi) -> Self {
        Self { db, discord }
    }

    /// Sets up each allowed guild and caches the ones that succeed.
    ///
    /// A guild that fails setup is logged and skipped. The remaining guilds are still
    /// set up.
    pub async fn setup(&self, allowed: &[AllowedGuild], cache: &GuildCache) -> GuildSetupReport {
        let mut report = GuildSetupReport::default();

        for guild in allowed {
            match self.setup_guild(guild).await {
                Ok(config) => {
                    cache
                        .register(config.guild_id, Arc::new(config.clone()))
                        .await;
                    report.ready.push(config);
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to set up guild '{}' ({}): {}",
                        guild.code_name,
                        guild.guild_id,
                        e
                    );
                    report.failed.push((guild.clone(), e));
                }
            }
        }

        tracing::info!(
            "Guild setup finished: {} ready, {} failed",
            report.ready.len(),
            report.failed.len()
        );
        report
    }

    /// Verifies the guild exists and returns its stored configuration.
    ///
    /// A guild seen for the first time gets the default template written to the
    /// database. A changed code name is written back.
    ///
    /// # Returns
    /// - `Ok(GuildConfig)`: Configuration for the guild
    /// - `Err(AppError::GuildNotFound)`: Guild does not exist or the bot is not in it
    /// - `Err(AppError)`: Discord or database failure
    pub async fn setup_guild(&self, guild: &AllowedGuild) -> Result<GuildConfig, AppError> {
        let name = match self.discord.fetch_guild(guild.guild_id).await {
            Ok(name) => name,
            Err(DiscordApiError::NotFound(_)) => return Err(AppError::GuildNotFound(guild.guild_id)),
            Err(e) => return Err(e.into()),
        };

        let repo = GuildConfigRepository::new(self.db);
        let config = match repo.find_by_guild_id(guild.guild_id.get()).await? {
            Some(config) if config.code_name == guild.code_name => config,
            Some(mut config) => {
                config.code_name = guild.code_name.clone();
                repo.update(&config).await?
            }
            None => {
                tracing::info!(
                    "Creating config for new guild '{}' ({})",
                    guild.code_name,
                    guild.guild_id
                );
                repo.create(&GuildConfig::template(guild.guild_id, guild.code_name.clone()))
                    .await?
            }
        };

        tracing::info!("Guild '{}' ({}) is ready", name, config.code_name);
        Ok(config)
    }
}
