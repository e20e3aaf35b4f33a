//! Errors caused by the person invoking a command.
//!
//! These are reported back to the invoker as an embed before the invocation is
//! considered failed. They are never logged above `warn`.

use serenity::all::CreateEmbed;
use thiserror::Error;

use crate::model::message::colour;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontEndError {
    /// Fewer arguments were given than the command requires.
    #[error("Missing argument(s): {}", missing.join(", "))]
    MissingArgument { missing: Vec<String>, usage: String },

    /// More arguments were given than the command accepts.
    #[error("Too many arguments were given")]
    TooManyArguments { usage: String },

    /// The invoker lacks a required role or administrator rights.
    #[error("The invoker does not have permission to use this command")]
    MissingPermissions,

    /// The command, or its parent, is disabled.
    #[error("This command is disabled")]
    CommandDisabled,

    /// The command's extension is not allowed in the guild it was invoked from.
    #[error("This command's extension is not allowed in this guild")]
    ExtensionNotAllowedInGuild,
}

impl FrontEndError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "🧡 Oops, you're missing an argument.",
            Self::TooManyArguments { .. } => "❤ You gave me too many arguments.",
            Self::MissingPermissions => "💔 You can't use this command.",
            Self::CommandDisabled => "🖤 This command is disabled.",
            Self::ExtensionNotAllowedInGuild => "🤍 This command is not available here.",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::MissingArgument { missing, usage } => format!(
                "*You're missing the argument(s) {}.*\n\n**Command Usage -> ``{}``**",
                missing
                    .iter()
                    .map(|name| format!("``{}``", name))
                    .collect::<Vec<_>>()
                    .join(", "),
                usage
            ),
            Self::TooManyArguments { usage } => format!(
                "*You gave me more arguments than this command takes.*\n\n**Command Usage -> ``{}``**",
                usage
            ),
            Self::MissingPermissions => {
                "*You don't have the role or permission needed to run this command.*".to_string()
            }
            Self::CommandDisabled => {
                "*This command has been disabled by the bot's administrators.*".to_string()
            }
            Self::ExtensionNotAllowedInGuild => {
                "*The extension this command belongs to is not enabled in this guild.*".to_string()
            }
        }
    }

    pub fn colour(&self) -> u32 {
        match self {
            Self::MissingArgument { .. } => colour::AKI_ORANGE,
            Self::TooManyArguments { .. } => colour::RED,
            Self::MissingPermissions => colour::AKI_RED,
            Self::CommandDisabled | Self::ExtensionNotAllowedInGuild => colour::GREY,
        }
    }

    /// Renders the error as the embed sent back to the invoker.
    pub fn embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(self.title())
            .description(self.description())
            .color(self.colour())
    }
}
