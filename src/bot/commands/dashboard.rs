//! Dashboard Discord command - one view per role.
//!
//! Rendering lives here; the numbers come from [`crate::core::dashboard`].

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, current_actor},
        core::{
            dashboard::{
                AttendanceBuckets, CcDashboard, Dashboard, HodDashboard, StudentDashboard,
                TgDashboard, dashboard_for,
            },
            report,
        },
        errors::Result,
    };
    use std::fmt::Write;

    /// Shows the dashboard for your role.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: Context<'_>) -> Result<()> {
        let actor = current_actor(ctx).await?;
        let data = ctx.data();

        let view = dashboard_for(&data.database, &data.policy, &actor).await?;
        let text = match &view {
            Dashboard::Student(d) => render_student(d, data.policy.min_attendance)?,
            Dashboard::Tg(d) => render_tg(d)?,
            Dashboard::Cc(d) => render_cc(d)?,
            Dashboard::Hod(d) => render_hod(d)?,
        };

        ctx.say(text).await?;
        Ok(())
    }

    fn render_student(d: &StudentDashboard, min_attendance: f64) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "**Student dashboard - {}**", d.student.name)?;
        writeln!(
            out,
            "Attendance: {}",
            report::format_attendance_bar(d.student.attendance_or_zero(), None)
        )?;
        if d.below_threshold {
            writeln!(
                out,
                "⚠️ Your attendance is below {min_attendance:.0}%. You cannot apply for leave."
            )?;
        }
        writeln!(out)?;
        if d.recent_requests.is_empty() {
            write!(out, "No leave requests yet.")?;
        } else {
            writeln!(out, "**Recent requests**")?;
            for request in &d.recent_requests {
                writeln!(
                    out,
                    "{}\n   {}",
                    report::format_history_entry(request),
                    report::format_gate_progress(request)
                )?;
            }
        }
        Ok(out)
    }

    fn render_tg(d: &TgDashboard) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "**Teacher Guardian dashboard**")?;
        writeln!(out, "Students: {}", d.total_students)?;
        writeln!(out, "Average attendance: {:.1}%", d.average_attendance)?;
        writeln!(out, "Pending at your gate: {}", d.pending_count)?;
        write_buckets(&mut out, &d.buckets)?;
        Ok(out)
    }

    fn render_cc(d: &CcDashboard) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "**Class Coordinator dashboard**")?;
        writeln!(out, "Students: {}", d.total_students)?;
        writeln!(out, "Pending at your gate: {}", d.pending_count)?;
        writeln!(out, "Approved by CC: {}", d.approved_count)?;
        write_buckets(&mut out, &d.buckets)?;
        Ok(out)
    }

    fn render_hod(d: &HodDashboard) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "**Head of Department dashboard**")?;
        writeln!(out, "Students: {}", d.total_students)?;
        writeln!(
            out,
            "HOD decisions: ⏳ {} pending · ✅ {} approved · ❌ {} rejected",
            d.pending, d.approved, d.rejected
        )?;
        write_buckets(&mut out, &d.buckets)?;
        Ok(out)
    }

    fn write_buckets(out: &mut String, buckets: &AttendanceBuckets) -> Result<()> {
        writeln!(out, "\n**Attendance**")?;
        for (label, count) in buckets.rows() {
            writeln!(out, "{label}: {count}")?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
