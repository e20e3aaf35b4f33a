use serenity::all::GuildId;

use crate::{
    discord::CommandScope,
    error::{config::ConfigError, AppError},
};

/// A guild the bot is allowed to operate in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedGuild {
    pub guild_id: GuildId,
    pub code_name: String,
}

pub struct Config {
    pub discord_bot_token: String,
    pub database_url: String,

    pub allowed_guilds: Vec<AllowedGuild>,
    /// Extensions that are never loaded, compared case-insensitively.
    pub ignored_extensions: Vec<String>,
    /// Register slash commands in this guild instead of globally.
    pub test_guild_id: Option<GuildId>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let allowed_guilds = parse_allowed_guilds(&lookup("ALLOWED_GUILDS").unwrap_or_default())?;
        if allowed_guilds.is_empty() {
            return Err(ConfigError::AllowedGuildsNotSpecified.into());
        }

        let ignored_extensions = lookup("IGNORED_EXTENSIONS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let test_guild_id = match lookup("TEST_GUILD_ID").filter(|value| !value.trim().is_empty()) {
            Some(value) => Some(parse_guild_id("TEST_GUILD_ID", value.trim())?),
            None => None,
        };

        Ok(Self {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            allowed_guilds,
            ignored_extensions,
            test_guild_id,
        })
    }

    pub fn command_scope(&self) -> CommandScope {
        match self.test_guild_id {
            Some(guild_id) => CommandScope::Guild(guild_id),
            None => CommandScope::Global,
        }
    }
}

/// Parses `id:code_name` pairs separated by commas. A bare id uses itself as code name.
fn parse_allowed_guilds(raw: &str) -> Result<Vec<AllowedGuild>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, code_name) = entry.split_once(':').unwrap_or((entry, entry));
            Ok(AllowedGuild {
                guild_id: parse_guild_id("ALLOWED_GUILDS", id.trim())?,
                code_name: code_name.trim().to_string(),
            })
        })
        .collect()
}

fn parse_guild_id(name: &str, value: &str) -> Result<GuildId, ConfigError> {
    value
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(GuildId::new)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: "expected a non-zero guild id".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const BASE: [(&str, &str); 2] = [("DISCORD_BOT_TOKEN", "token"), ("DATABASE_URL", "sqlite::memory:")];

    #[test]
    fn parses_full_configuration() {
        let mut vars = BASE.to_vec();
        vars.push(("ALLOWED_GUILDS", "123:home, 456:test"));
        vars.push(("IGNORED_EXTENSIONS", "Fun, music"));
        vars.push(("TEST_GUILD_ID", "456"));

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(
            config.allowed_guilds,
            vec![
                AllowedGuild {
                    guild_id: GuildId::new(123),
                    code_name: "home".to_string()
                },
                AllowedGuild {
                    guild_id: GuildId::new(456),
                    code_name: "test".to_string()
                },
            ]
        );
        assert_eq!(config.ignored_extensions, vec!["Fun".to_string(), "music".to_string()]);
        assert_eq!(config.command_scope(), CommandScope::Guild(GuildId::new(456)));
    }

    #[test]
    fn empty_allowed_guilds_is_fatal() {
        let mut vars = BASE.to_vec();
        vars.push(("ALLOWED_GUILDS", " "));

        let result = Config::from_lookup(lookup(&vars));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::AllowedGuildsNotSpecified))
        ));
    }

    #[test]
    fn missing_token_names_variable() {
        let vars = [("DATABASE_URL", "sqlite::memory:"), ("ALLOWED_GUILDS", "123")];

        let result = Config::from_lookup(lookup(&vars));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "DISCORD_BOT_TOKEN"
        ));
    }

    #[test]
    fn invalid_guild_id_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("ALLOWED_GUILDS", "home:123"));

        let result = Config::from_lookup(lookup(&vars));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    #[test]
    fn defaults_to_global_scope() {
        let mut vars = BASE.to_vec();
        vars.push(("ALLOWED_GUILDS", "123"));

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.allowed_guilds[0].code_name, "123");
        assert_eq!(config.command_scope(), CommandScope::Global);
    }
}
