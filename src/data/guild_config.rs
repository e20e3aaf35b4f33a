use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};
use serde_json::{Map, Value};

use crate::model::guild::GuildConfig;

pub struct GuildConfigRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildConfigRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the stored configuration for a guild.
    ///
    /// # Arguments
    /// - `guild_id`: Discord's unique identifier for the guild (u64)
    ///
    /// # Returns
    /// - `Ok(Some(GuildConfig))`: Configuration found
    /// - `Ok(None)`: Guild has never been set up
    /// - `Err(DbErr)`: Database error or a stored column failed to parse
    pub async fn find_by_guild_id(&self, guild_id: u64) -> Result<Option<GuildConfig>, DbErr> {
        entity::prelude::GuildConfig::find()
            .filter(entity::guild_config::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?
            .map(GuildConfig::from_entity)
            .transpose()
    }

    /// Inserts a configuration for a guild that has none yet.
    pub async fn create(&self, config: &GuildConfig) -> Result<GuildConfig, DbErr> {
        let model = entity::guild_config::ActiveModel {
            guild_id: ActiveValue::Set(config.guild_id.get().to_string()),
            ..active_model(config)
        }
        .insert(self.db)
        .await?;

        GuildConfig::from_entity(model)
    }

    /// Overwrites the stored configuration of an existing guild.
    ///
    /// # Returns
    /// - `Ok(GuildConfig)`: Updated configuration
    /// - `Err(DbErr::RecordNotFound)`: Guild has no stored configuration
    pub async fn update(&self, config: &GuildConfig) -> Result<GuildConfig, DbErr> {
        let existing = entity::prelude::GuildConfig::find()
            .filter(entity::guild_config::Column::GuildId.eq(config.guild_id.get().to_string()))
            .one(self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Guild config for {} not found", config.guild_id))
            })?;

        let model = entity::guild_config::ActiveModel {
            id: ActiveValue::Unchanged(existing.id),
            ..active_model(config)
        }
        .update(self.db)
        .await?;

        GuildConfig::from_entity(model)
    }

    pub async fn get_all(&self) -> Result<Vec<GuildConfig>, DbErr> {
        entity::prelude::GuildConfig::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(GuildConfig::from_entity)
            .collect()
    }
}

/// Active model carrying every mutable column of `config`.
fn active_model(config: &GuildConfig) -> entity::guild_config::ActiveModel {
    let roles: Map<String, Value> = config
        .roles
        .iter()
        .map(|(code_name, role_id)| (code_name.clone(), Value::from(role_id.get().to_string())))
        .collect();

    entity::guild_config::ActiveModel {
        code_name: ActiveValue::Set(config.code_name.clone()),
        prefix: ActiveValue::Set(config.prefix.clone()),
        roles: ActiveValue::Set(Value::Object(roles).to_string()),
        allowed_extensions: ActiveValue::Set(Value::from(config.allowed_extensions.clone()).to_string()),
        disallowed_extensions: ActiveValue::Set(
            Value::from(config.disallowed_extensions.clone()).to_string(),
        ),
        hidden_extensions: ActiveValue::Set(Value::from(config.hidden_extensions.clone()).to_string()),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
}
