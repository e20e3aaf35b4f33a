//! Error types for the bot framework.
//!
//! `AppError` is the top-level error type that wraps the domain-specific errors raised
//! during startup, guild setup, extension loading and command invocation. User-facing
//! failures live in `front_end` and know how to render themselves as a reply embed.

pub mod command;
pub mod config;
pub mod discord;
pub mod front_end;

use serenity::all::GuildId;
use thiserror::Error;

use crate::error::{command::InvocationError, config::ConfigError, discord::DiscordApiError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup, extension load or command registration.
    ///
    /// Fatal to the process when raised while reading the environment, fatal to the
    /// affected extension when raised while compiling its commands.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord gateway/client error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Outbound Discord API call failed.
    #[error(transparent)]
    DiscordApiErr(#[from] DiscordApiError),

    /// A guild listed in `ALLOWED_GUILDS` does not exist or the bot is not in it.
    ///
    /// Fatal to that guild's setup step only.
    #[error("Guild {0} could not be found, is the bot a member of it?")]
    GuildNotFound(GuildId),

    /// An extension name was not known to the extension loader.
    #[error("No extension named '{0}' has been loaded")]
    UnknownExtension(String),

    /// Command invocation failed.
    #[error(transparent)]
    InvocationErr(#[from] InvocationError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
