//! Approver Discord commands - queues, decisions, and roster views.
//!
//! The gate an approver decides is derived from their role, so `/approve` and
//! `/reject` take only the request id.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_actor, handlers::autocomplete},
        core::{
            approval::{self, Decision, Gate},
            leave, report, user,
        },
        entities::Role,
        errors::{Error, Result},
    };

    /// Shows the leave requests waiting for your decision, oldest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pending(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let db = &ctx.data().database;

        let queue = approval::pending_queue(db, &actor).await?;
        if queue.is_empty() {
            ctx.say("✅ Nothing is waiting for you.").await?;
            return Ok(());
        }

        let names = leave::student_names(db, &queue).await?;
        let lines: Vec<String> = queue
            .iter()
            .map(|request| {
                let name = names
                    .get(&request.student_id)
                    .map_or("Unknown student", String::as_str);
                report::format_queue_entry(request, name)
            })
            .collect();

        ctx.say(report::format_list(
            &format!("**Pending leave requests ({})**", queue.len()),
            &lines,
            report::MESSAGE_LIMIT,
        ))
        .await?;
        Ok(())
    }

    /// Approves a leave request at your gate.
    #[poise::command(slash_command, prefix_command)]
    pub async fn approve(
        ctx: Context<'_>,
        #[description = "Leave request to approve"]
        #[autocomplete = "autocomplete::autocomplete_pending_request"]
        request_id: i64,
    ) -> Result<()> {
        record_decision(ctx, request_id, Decision::Approve).await
    }

    /// Rejects a leave request at your gate.
    #[poise::command(slash_command, prefix_command)]
    pub async fn reject(
        ctx: Context<'_>,
        #[description = "Leave request to reject"]
        #[autocomplete = "autocomplete::autocomplete_pending_request"]
        request_id: i64,
    ) -> Result<()> {
        record_decision(ctx, request_id, Decision::Reject).await
    }

    async fn record_decision(ctx: Context<'_>, request_id: i64, decision: Decision) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let Some(gate) = Gate::for_role(actor.role) else {
            return Err(Error::RoleNotPermitted {
                role: actor.role,
                action: "review leave requests",
            });
        };

        let request =
            approval::decide(&ctx.data().database, &actor, gate, request_id, decision).await?;

        ctx.say(format!(
            "{}\n{}",
            report::format_decision(&request, gate),
            report::format_gate_progress(&request)
        ))
        .await?;
        Ok(())
    }

    /// Lists the students you oversee with their attendance.
    ///
    /// Teacher Guardians see their own students; the CC and HOD see the whole roster.
    #[poise::command(slash_command, prefix_command)]
    pub async fn students(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let db = &ctx.data().database;

        let students = match actor.role {
            Role::Student => {
                return Err(Error::RoleNotPermitted {
                    role: actor.role,
                    action: "list students",
                });
            }
            Role::Tg => user::students_for_tg(db, actor.user_id).await?,
            Role::Cc | Role::Hod => user::all_students(db).await?,
        };

        if students.is_empty() {
            ctx.say(report::empty_roster_message(actor.role)).await?;
            return Ok(());
        }

        let lines: Vec<String> = students
            .iter()
            .map(|student| {
                let roll_no = student
                    .roll_no
                    .map_or_else(|| "-".to_string(), |roll| roll.to_string());
                format!(
                    "{roll_no}. {} {}",
                    student.name,
                    report::format_attendance_bar(student.attendance_or_zero(), None)
                )
            })
            .collect();

        ctx.say(report::format_list(
            &format!("**Students ({})**", students.len()),
            &lines,
            report::MESSAGE_LIMIT,
        ))
        .await?;
        Ok(())
    }

    /// Lists every leave request in the system, newest first (HOD only).
    #[poise::command(slash_command, prefix_command)]
    pub async fn all_requests(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        actor.require_role(Role::Hod, "list every leave request")?;
        let db = &ctx.data().database;

        let requests = leave::all_requests(db).await?;
        if requests.is_empty() {
            ctx.say("No leave requests have been filed yet.").await?;
            return Ok(());
        }

        let names = leave::student_names(db, &requests).await?;
        let lines: Vec<String> = requests
            .iter()
            .map(|request| {
                let name = names
                    .get(&request.student_id)
                    .map_or("Unknown student", String::as_str);
                format!(
                    "{}\n   {}",
                    report::format_queue_entry(request, name),
                    report::format_gate_progress(request)
                )
            })
            .collect();

        ctx.say(report::format_list(
            &format!("**All leave requests ({})**", requests.len()),
            &lines,
            report::MESSAGE_LIMIT,
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
