use dotenvy::dotenv;
use leave_desk::{
    bot::{self, BotData},
    config::{self, database, roster},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load policy and roster from config.toml
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(
        min_attendance = app_config.policy.min_attendance,
        roster_entries = app_config.users.len(),
        "Loaded application configuration."
    );

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the roster on first run
    roster::seed_roster(&db, &app_config.users)
        .await
        .inspect_err(|e| error!("Failed to seed roster: {}", e))?;

    // 6. Run the bot; the token is read directly before use, never stored in config
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, app_config.policy)).await
}
