use std::sync::Arc;

use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::AppError};

/// Installs the tracing subscriber.
///
/// Log levels come from `RUST_LOG`, defaulting to `info` for this crate and `warn` for
/// everything else.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,goldy_bot=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then runs all pending SeaORM migrations so the `guild_config` table
/// exists before guild setup reads it.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the Discord HTTP client used for all outbound calls.
///
/// Looks up the application id so command endpoints work before the gateway connects.
pub async fn connect_to_discord(config: &Config) -> Result<Arc<Http>, AppError> {
    let http = Arc::new(Http::new(&config.discord_bot_token));

    let application = http.get_current_application_info().await?;
    http.set_application_id(application.id);
    tracing::info!("Authenticated as application '{}' ({})", application.name, application.id);

    Ok(http)
}
