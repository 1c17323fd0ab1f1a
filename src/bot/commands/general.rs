//! General Discord commands - ping, help, and whoami.
//! These commands provide basic bot functionality and tell users which roster
//! account their Discord login maps to.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_actor},
        core::{report, user},
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = format!(
            "**LeaveDesk Help**\n\
            Leave requests pass through three approvals in order: TG, then CC, then HOD.\n\
            Students need at least {:.0}% attendance to apply.\n\n\
            **Student Commands**\n\
            • `/apply <reason> <from> <to>` - Applies for leave (dates as YYYY-MM-DD).\n\
            • `/history` - Lists all of your leave requests.\n\
            • `/status <request>` - Shows one request with every gate decision.\n\n\
            **Approver Commands**\n\
            • `/pending` - Shows the requests waiting for your decision.\n\
            • `/approve <request>` - Approves a request at your gate.\n\
            • `/reject <request>` - Rejects a request at your gate.\n\
            • `/students` - Lists the students you oversee with their attendance.\n\
            • `/all_requests` - Lists every request (HOD only).\n\n\
            **Everyone**\n\
            • `/dashboard` - Shows the dashboard for your role.\n\
            • `/whoami` - Shows which roster account you are linked to.\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
            ctx.data().policy.min_attendance
        );

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the roster account linked to your Discord login.
    #[poise::command(slash_command, prefix_command)]
    pub async fn whoami(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let db = &ctx.data().database;

        let profile = user::find_by_id(db, actor.user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                reference: format!("user #{}", actor.user_id),
            })?;

        let reply = report::format_profile(&profile)?;
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
