use std::collections::HashMap;

use sea_orm::DbErr;
use serde_json::Value;
use serenity::all::{GuildId, RoleId};

/// Default command prefix for a newly set up guild.
pub const DEFAULT_PREFIX: &str = "!";

/// Per-guild bot configuration.
///
/// Stored in the `guild_config` table and cached in memory after guild setup. Role
/// code names map to Discord role ids so commands can require roles by name.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildConfig {
    /// Discord guild ID.
    pub guild_id: GuildId,
    /// Short name for the guild, taken from `ALLOWED_GUILDS`.
    pub code_name: String,
    /// Prefix for message commands.
    pub prefix: String,
    /// Role code name to role id.
    pub roles: HashMap<String, RoleId>,
    /// Extensions allowed in this guild. Empty means all extensions are allowed.
    pub allowed_extensions: Vec<String>,
    /// Extensions never allowed in this guild.
    pub disallowed_extensions: Vec<String>,
    /// Extensions whose commands require administrator rights in this guild.
    pub hidden_extensions: Vec<String>,
}

impl GuildConfig {
    /// Fresh configuration written for a guild seen for the first time.
    pub fn template(guild_id: GuildId, code_name: impl Into<String>) -> Self {
        Self {
            guild_id,
            code_name: code_name.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            roles: HashMap::new(),
            allowed_extensions: Vec::new(),
            disallowed_extensions: Vec::new(),
            hidden_extensions: Vec::new(),
        }
    }

    /// Converts an entity model to a guild config at the repository boundary.
    ///
    /// Parses the string guild_id and the JSON encoded role map and extension lists.
    ///
    /// # Arguments
    /// - `entity` - The database entity model to convert
    ///
    /// # Returns
    /// - `Ok(GuildConfig)` - Successfully converted config
    /// - `Err(DbErr::Custom)` - guild_id or one of the JSON columns failed to parse
    pub fn from_entity(entity: entity::guild_config::Model) -> Result<Self, DbErr> {
        let guild_id = entity
            .guild_id
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse guild_id: {}", e)))?;

        let roles: HashMap<String, Value> = serde_json::from_str(&entity.roles)
            .map_err(|e| DbErr::Custom(format!("Failed to parse roles: {}", e)))?;
        let roles = roles
            .into_iter()
            .map(|(code_name, id)| {
                let id = match &id {
                    Value::String(id) => id.parse::<u64>().ok(),
                    other => other.as_u64(),
                }
                .filter(|id| *id != 0)
                .ok_or_else(|| {
                    DbErr::Custom(format!("Failed to parse role id for '{}'", code_name))
                })?;
                Ok((code_name, RoleId::new(id)))
            })
            .collect::<Result<HashMap<_, _>, DbErr>>()?;

        Ok(Self {
            guild_id: GuildId::new(guild_id),
            code_name: entity.code_name,
            prefix: entity.prefix,
            roles,
            allowed_extensions: parse_list("allowed_extensions", &entity.allowed_extensions)?,
            disallowed_extensions: parse_list(
                "disallowed_extensions",
                &entity.disallowed_extensions,
            )?,
            hidden_extensions: parse_list("hidden_extensions", &entity.hidden_extensions)?,
        })
    }

    /// Whether commands of the named extension may run in this guild.
    ///
    /// Disallowed extensions always lose. Otherwise an empty allow list permits everything.
    pub fn is_extension_allowed(&self, extension: &str) -> bool {
        if contains_ignore_case(&self.disallowed_extensions, extension) {
            return false;
        }
        self.allowed_extensions.is_empty()
            || contains_ignore_case(&self.allowed_extensions, extension)
    }

    pub fn is_extension_hidden(&self, extension: &str) -> bool {
        contains_ignore_case(&self.hidden_extensions, extension)
    }

    /// Resolves a role code name to a role id.
    ///
    /// Falls back to parsing the code name itself as a role snowflake.
    pub fn resolve_role(&self, code_name: &str) -> Option<RoleId> {
        self.roles.get(code_name).copied().or_else(|| {
            code_name
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .map(RoleId::new)
        })
    }
}

fn parse_list(column: &str, raw: &str) -> Result<Vec<String>, DbErr> {
    serde_json::from_str(raw).map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", column, e)))
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}
