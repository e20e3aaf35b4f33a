use std::fmt::Display;

use serenity::all::{Context, EventHandler, Interaction, Message, Ready};
use serenity::async_trait;
use tracing::Level;

use crate::{error::command::InvocationError, service::dispatch::Dispatcher, state::Framework};

pub mod interaction;
pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub framework: Framework,
    pub dispatcher: Dispatcher,
}

impl Handler {
    pub fn new(framework: Framework) -> Self {
        let dispatcher = framework.dispatcher();
        Self {
            framework,
            dispatcher,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.framework, ctx, ready).await;
    }

    /// Called when a slash command or component interaction is received
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.dispatcher, ctx, interaction).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.dispatcher, ctx, message).await;
    }
}

/// Level a failed dispatch is logged at. Rejections were already reported to the invoker.
fn dispatch_error_level(error: &InvocationError) -> Level {
    match error {
        InvocationError::FrontEnd { .. } => Level::WARN,
        InvocationError::Handler { .. } => Level::ERROR,
    }
}

pub(crate) fn log_dispatch_error(event: impl Display, error: &InvocationError) {
    if dispatch_error_level(error) == Level::WARN {
        tracing::warn!("Rejected {}: {}", event, error);
    } else {
        tracing::error!("Failed to handle {}: {}", event, error);
    }
}
