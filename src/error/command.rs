use thiserror::Error;

use crate::error::{discord::DiscordApiError, front_end::FrontEndError, AppError};

/// Error returned by a command or component handler.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Reported back to the invoker as an embed.
    #[error(transparent)]
    FrontEnd(#[from] FrontEndError),

    /// A Discord API call made by the handler failed.
    #[error(transparent)]
    Discord(#[from] DiscordApiError),

    /// Any other failure inside the handler.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl CommandError {
    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(message.into().into())
    }
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        CommandError::Internal(Box::new(err))
    }
}

/// Error surfaced by the invocation pipeline once the invoker has been told about it.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// Invoker-caused failure, already reported with an error embed.
    #[error("Command '{command}' was rejected: {error}")]
    FrontEnd {
        command: String,
        #[source]
        error: FrontEndError,
    },

    /// Handler failed for a reason outside the invoker's control.
    #[error("Command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: CommandError,
    },
}
