use std::sync::Arc;

use goldy_bot::{
    bot,
    config::Config,
    discord::SerenityDiscord,
    error::AppError,
    startup,
    state::Framework,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Arc::new(Config::from_env()?);

    let db = startup::connect_to_database(&config).await?;
    let http = startup::connect_to_discord(&config).await?;
    let discord = Arc::new(SerenityDiscord::new(http));

    let framework = Framework::new(config, db, discord.clone(), discord);

    let report = framework.setup_guilds().await;
    tracing::info!(
        "{} guild(s) ready, {} failed",
        report.ready.len(),
        report.failed.len()
    );

    framework.load_builtin_extensions().await;

    bot::start::start_bot(framework).await
}
