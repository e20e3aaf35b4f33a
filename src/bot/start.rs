use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, error::AppError, state::Framework};

/// Starts the Discord bot and runs until the gateway connection ends.
///
/// # Arguments
/// - `framework` - Shared framework state with guilds set up and extensions loaded
///
/// # Returns
/// - `Ok(())` if the bot runs and shuts down cleanly
/// - `Err(AppError)` if client initialization or the gateway connection fails
pub async fn start_bot(framework: Framework) -> Result<(), AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let token = framework.config.discord_bot_token.clone();
    let handler = Handler::new(framework);

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
