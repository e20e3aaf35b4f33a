//! Ready event handler.
//!
//! Fired once the bot has connected to the gateway. Slash commands are synchronized
//! here so Discord matches the loaded extensions.

use serenity::all::{Context, Ready};

use crate::state::Framework;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `framework` - Shared framework state holding the command registry and synchronizer
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(framework: &Framework, _ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    match framework.synchronizer.sync(&framework.commands).await {
        Ok(report) if report.failed > 0 => tracing::warn!(
            "Slash command sync applied {} change(s), {} failed",
            report.applied,
            report.failed
        ),
        Ok(report) => tracing::info!("Slash command sync applied {} change(s)", report.applied),
        Err(e) => tracing::error!("Failed to sync slash commands: {}", e),
    }
}
