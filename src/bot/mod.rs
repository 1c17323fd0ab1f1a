//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `LeaveDesk`: slash commands for
//! students and approvers, autocomplete handlers, and the shared bot context.
//! Every command resolves its author to an [`crate::core::actor::Actor`] before
//! calling into the core.

/// Discord command implementations (student, approver, dashboard, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::policy::LeavePolicy,
    core::actor::{self, Actor},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the leave policy.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Workflow rules from config.toml
    pub policy: LeavePolicy,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and policy.
    #[must_use]
    pub const fn new(database: DatabaseConnection, policy: LeavePolicy) -> Self {
        Self { database, policy }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Resolves the command author to a roster member.
pub async fn current_actor(ctx: Context<'_>) -> Result<Actor> {
    let discord_id = ctx.author().id.to_string();
    actor::resolve(&ctx.data().database, &discord_id).await
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::whoami(),
        commands::apply(),
        commands::history(),
        commands::status(),
        commands::dashboard(),
        commands::pending(),
        commands::approve(),
        commands::reject(),
        commands::students(),
        commands::all_requests(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                warn!("Command `{}` refused: {}", ctx.command().name, error);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong while handling that command.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
