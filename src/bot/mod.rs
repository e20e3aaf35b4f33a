//! Discord gateway integration.
//!
//! The serenity client delivers gateway events to `handler::Handler`, which converts
//! them into the framework's payload types and hands them to the dispatcher. Commands
//! are synchronized with Discord once the gateway reports ready.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild availability events
//! - `GUILD_MESSAGES` - Receive messages for prefix commands
//! - `MESSAGE_CONTENT` - Read message text for prefix commands (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
