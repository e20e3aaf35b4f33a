//! Guild config factory for creating persisted per-guild settings.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild configs with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild_config::GuildConfigFactory;
///
/// let config = GuildConfigFactory::new(&db)
///     .guild_id("987654321")
///     .role("admin", "555")
///     .build()
///     .await?;
/// ```
pub struct GuildConfigFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    code_name: String,
    prefix: String,
    roles: Vec<(String, String)>,
    allowed_extensions: Vec<String>,
    disallowed_extensions: Vec<String>,
    hidden_extensions: Vec<String>,
}

impl<'a> GuildConfigFactory<'a> {
    /// Creates a new GuildConfigFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented id
    /// - code_name: `"guild_{id}"`
    /// - prefix: `"!"`
    /// - no roles and empty extension lists
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            guild_id: id.to_string(),
            code_name: format!("guild_{}", id),
            prefix: "!".to_string(),
            roles: Vec::new(),
            allowed_extensions: Vec::new(),
            disallowed_extensions: Vec::new(),
            hidden_extensions: Vec::new(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn code_name(mut self, code_name: impl Into<String>) -> Self {
        self.code_name = code_name.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Maps a role code name to a role id.
    pub fn role(mut self, code_name: impl Into<String>, role_id: impl Into<String>) -> Self {
        self.roles.push((code_name.into(), role_id.into()));
        self
    }

    pub fn allowed_extension(mut self, name: impl Into<String>) -> Self {
        self.allowed_extensions.push(name.into());
        self
    }

    pub fn disallowed_extension(mut self, name: impl Into<String>) -> Self {
        self.disallowed_extensions.push(name.into());
        self
    }

    pub fn hidden_extension(mut self, name: impl Into<String>) -> Self {
        self.hidden_extensions.push(name.into());
        self
    }

    /// Builds and inserts the guild config entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_config::Model)` - Created guild config entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_config::Model, DbErr> {
        let roles: serde_json::Map<String, serde_json::Value> = self
            .roles
            .into_iter()
            .map(|(name, id)| (name, serde_json::Value::String(id)))
            .collect();

        entity::guild_config::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            code_name: ActiveValue::Set(self.code_name),
            prefix: ActiveValue::Set(self.prefix),
            roles: ActiveValue::Set(serde_json::Value::Object(roles).to_string()),
            allowed_extensions: ActiveValue::Set(encode_list(self.allowed_extensions)),
            disallowed_extensions: ActiveValue::Set(encode_list(self.disallowed_extensions)),
            hidden_extensions: ActiveValue::Set(encode_list(self.hidden_extensions)),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

fn encode_list(list: Vec<String>) -> String {
    serde_json::Value::from(list).to_string()
}

/// Creates a guild config with default values.
///
/// Shorthand for `GuildConfigFactory::new(db).build().await`.
pub async fn create_guild_config(
    db: &DatabaseConnection,
) -> Result<entity::guild_config::Model, DbErr> {
    GuildConfigFactory::new(db).build().await
}
