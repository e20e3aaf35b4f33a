//! The `extensions` command group for enabling and disabling extensions at runtime.

use std::{sync::Arc, time::Duration};

use serenity::all::CreateEmbed;

use crate::{
    command::builder::CommandBuilder,
    error::{command::CommandError, AppError},
    model::{
        arguments::Arguments,
        command::{Param, SlashOption},
        message::{colour, Reply},
        platter::Platter,
    },
    service::{
        extension::{Extension, ExtensionService},
        sync::CommandSynchronizer,
    },
};

pub const NAME: &str = "extensions";

/// How long "already enabled/disabled" replies stay visible.
const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

pub struct ExtensionManager {
    service: ExtensionService,
    synchronizer: CommandSynchronizer,
}

impl ExtensionManager {
    pub fn new(service: ExtensionService, synchronizer: CommandSynchronizer) -> Self {
        Self {
            service,
            synchronizer,
        }
    }

    async fn enable(self: Arc<Self>, platter: Arc<Platter>, args: Arguments) -> Result<(), CommandError> {
        let name = args.get_str("extension").unwrap_or_default();

        let reply = match self.service.reload(name).await {
            Ok(true) => {
                self.resync().await;
                Reply::new().embed(enabled())
            }
            Ok(false) => Reply::new()
                .embed(already_enabled())
                .delete_after(NOTICE_LIFETIME),
            Err(AppError::UnknownExtension(name)) => Reply::new().embed(unknown(&name)),
            Err(e) => return Err(e.into()),
        };

        platter.send_message(reply.reference(true)).await?;
        Ok(())
    }

    async fn disable(self: Arc<Self>, platter: Arc<Platter>, args: Arguments) -> Result<(), CommandError> {
        let name = args.get_str("extension").unwrap_or_default();

        if name.eq_ignore_ascii_case(NAME) {
            platter
                .send_message(Reply::new().embed(cannot_disable_self()).reference(true))
                .await?;
            return Ok(());
        }

        let reply = match self.service.unload(name).await {
            Ok(true) => {
                self.resync().await;
                Reply::new().embed(disabled())
            }
            Ok(false) => Reply::new()
                .embed(already_disabled())
                .delete_after(NOTICE_LIFETIME),
            Err(AppError::UnknownExtension(name)) => Reply::new().embed(unknown(&name)),
            Err(e) => return Err(e.into()),
        };

        platter.send_message(reply.reference(true)).await?;
        Ok(())
    }

    async fn resync(&self) {
        match self.synchronizer.sync(self.service.registry()).await {
            Ok(report) if report.failed > 0 => tracing::warn!(
                "Slash command sync applied {} change(s), {} failed",
                report.applied,
                report.failed
            ),
            Ok(report) => tracing::info!("Slash command sync applied {} change(s)", report.applied),
            Err(e) => tracing::error!("Failed to sync slash commands: {}", e),
        }
    }
}

impl Extension for ExtensionManager {
    fn name(&self) -> &str {
        NAME
    }

    fn commands(self: Arc<Self>) -> Vec<CommandBuilder> {
        let enable = Arc::clone(&self);
        let disable = self;

        let extension_param = || {
            Param::new("extension").option(SlashOption::new().description("Name of the extension."))
        };

        vec![CommandBuilder::slash(NAME)
            .description("Manage Goldy Bot extensions.")
            .hidden(true)
            .sub_command(
                CommandBuilder::slash("enable")
                    .description("A command for enabling a Goldy Bot extension that is disabled.")
                    .param(extension_param())
                    .handler(move |platter, args| Arc::clone(&enable).enable(platter, args)),
            )
            .sub_command(
                CommandBuilder::slash("disable")
                    .description("A command for disabling a Goldy Bot extension that is enabled.")
                    .param(extension_param())
                    .handler(move |platter, args| Arc::clone(&disable).disable(platter, args)),
            )]
    }
}

fn enabled() -> CreateEmbed {
    CreateEmbed::new()
        .title("💚 Enabled!")
        .description("Extension has been enabled. 👍")
        .color(colour::LIME_GREEN)
}

fn already_enabled() -> CreateEmbed {
    CreateEmbed::new()
        .title("🧡 Already Enabled!")
        .description("That extension is already enabled.")
        .color(colour::AKI_ORANGE)
}

fn disabled() -> CreateEmbed {
    CreateEmbed::new()
        .title("🖤 Disabled!")
        .description("Extension has been disabled. 👍")
        .color(colour::INVISIBLE)
}

fn already_disabled() -> CreateEmbed {
    CreateEmbed::new()
        .title("🤎 Already Disabled!")
        .description("That extension is already disabled.")
        .color(colour::GREY)
}

fn unknown(name: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❓ Unknown Extension!")
        .description(format!("There is no extension called ``{}``.", name))
        .color(colour::AKI_ORANGE)
}

fn cannot_disable_self() -> CreateEmbed {
    CreateEmbed::new()
        .title("💔 Not Allowed!")
        .description("The extensions extension cannot disable itself.")
        .color(colour::AKI_RED)
}
