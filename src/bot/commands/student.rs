//! Student Discord commands - `apply` and `history`.
//!
//! These commands call into the leave core on behalf of the student who ran them.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_actor},
        core::{leave, report, user},
        entities::Role,
        errors::Result,
    };
    use chrono::NaiveDate;

    const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Applies for leave.
    ///
    /// The request starts pending at all three gates. Students whose attendance
    /// is under the threshold are refused and nothing is stored.
    #[poise::command(slash_command, prefix_command)]
    pub async fn apply(
        ctx: Context<'_>,
        #[description = "Why you need leave"] reason: String,
        #[description = "First day of leave (YYYY-MM-DD)"] from_date: String,
        #[description = "Last day of leave (YYYY-MM-DD)"] to_date: String,
    ) -> Result<()> {
        let Ok(from) = NaiveDate::parse_from_str(from_date.trim(), DATE_FORMAT) else {
            ctx.say(format!("❌ Invalid start date '{from_date}': use YYYY-MM-DD"))
                .await?;
            return Ok(());
        };
        let Ok(to) = NaiveDate::parse_from_str(to_date.trim(), DATE_FORMAT) else {
            ctx.say(format!("❌ Invalid end date '{to_date}': use YYYY-MM-DD"))
                .await?;
            return Ok(());
        };

        let actor = current_actor(ctx).await?;
        let data = ctx.data();
        let request = leave::submit(&data.database, &data.policy, &actor, &reason, from, to).await?;

        ctx.say(format!(
            "✅ Leave request #{} submitted for {}.\nIt now waits for your Teacher Guardian.\n{}",
            request.id,
            report::format_date_range(request.from_date, request.to_date),
            report::format_gate_progress(&request)
        ))
        .await?;
        Ok(())
    }

    /// Lists all of your leave requests, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        actor.require_role(Role::Student, "view a leave history")?;

        let requests = leave::history_for_student(&ctx.data().database, actor.user_id).await?;
        if requests.is_empty() {
            ctx.say("You have not applied for leave yet. Use `/apply` to start.")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = requests
            .iter()
            .map(|request| {
                format!(
                    "{}\n   {}",
                    report::format_history_entry(request),
                    report::format_gate_progress(request)
                )
            })
            .collect();

        ctx.say(report::format_list(
            "**Your leave requests**",
            &lines,
            report::MESSAGE_LIMIT,
        ))
        .await?;
        Ok(())
    }

    /// Shows one leave request in detail.
    ///
    /// Students can look up their own requests; approvers can look up the
    /// requests they oversee.
    #[poise::command(slash_command, prefix_command)]
    pub async fn status(
        ctx: Context<'_>,
        #[description = "Leave request id"] request_id: i64,
    ) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let db = &ctx.data().database;

        let request = leave::view_request(db, &actor, request_id).await?;
        let student_name = user::find_by_id(db, request.student_id)
            .await?
            .map_or_else(|| "Unknown student".to_string(), |s| s.name);

        ctx.say(report::format_request_detail(&request, &student_name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
