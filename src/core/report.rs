//! Text formatting for leave requests and attendance.
//!
//! Pure functions that turn models into the short lines the bot layer sends.
//! Nothing here touches the database.

use crate::{
    core::{approval::Gate, status::OverallStatus},
    entities::{GateStatus, Role, leave_request, user},
    errors::Result,
};
use chrono::NaiveDate;
use std::fmt::Write;

/// Emoji for a gate state.
#[must_use]
pub const fn gate_badge(status: GateStatus) -> &'static str {
    match status {
        GateStatus::Pending => "⏳",
        GateStatus::Approved => "✅",
        GateStatus::Rejected => "❌",
    }
}

/// Emoji for an overall state.
#[must_use]
pub const fn overall_badge(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Pending => "⏳",
        OverallStatus::Approved => "✅",
        OverallStatus::Rejected => "❌",
    }
}

/// Formats a leave period like `2026-10-20 → 2026-10-21 (2 days)`.
#[must_use]
pub fn format_date_range(from: NaiveDate, to: NaiveDate) -> String {
    let days = (to - from).num_days() + 1;
    let unit = if days == 1 { "day" } else { "days" };
    format!("{from} → {to} ({days} {unit})")
}

/// One line per gate state, e.g. `TG ✅ · CC ⏳ · HOD ⏳`.
#[must_use]
pub fn format_gate_progress(request: &leave_request::Model) -> String {
    Gate::ALL
        .iter()
        .map(|gate| format!("{gate} {}", gate_badge(gate.status_of(request))))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Generates an attendance bar string for visual representation.
///
/// Creates a text-based bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_attendance_bar(attendance: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = attendance.clamp(0.0, 100.0);

    // clamped ∈ [0, 100] and length is small, so the result fits in [0, length]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {attendance:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// Summary line used in a student's history.
///
/// `#3 ✅ Approved | 2026-10-20 → 2026-10-21 (2 days) | Family function`
#[must_use]
pub fn format_history_entry(request: &leave_request::Model) -> String {
    let overall = request.overall_status();
    format!(
        "#{} {} {} | {} | {}",
        request.id,
        overall_badge(overall),
        overall,
        format_date_range(request.from_date, request.to_date),
        request.reason
    )
}

/// Summary line used in an approver's queue, built from the submission snapshot.
#[must_use]
pub fn format_queue_entry(request: &leave_request::Model, student_name: &str) -> String {
    let batch = request.batch.as_deref().unwrap_or("no batch");
    format!(
        "#{} {student_name} ({batch}, {:.1}% attendance) | {} | {}",
        request.id,
        request.attendance,
        format_date_range(request.from_date, request.to_date),
        request.reason
    )
}

/// Decision confirmation, e.g. `✅ Leave request #3 Approved at the CC gate.`
#[must_use]
pub fn format_decision(request: &leave_request::Model, gate: Gate) -> String {
    let status = gate.status_of(request);
    let when = gate
        .action_at(request)
        .map(|at| format!(" on {}", at.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "{} Leave request #{} {status} at the {gate} gate{when}.",
        gate_badge(status),
        request.id
    )
}

/// Full view of one request, including when each gate was decided.
#[must_use]
pub fn format_request_detail(request: &leave_request::Model, student_name: &str) -> String {
    let overall = request.overall_status();
    let days = request.duration_days();
    let unit = if days == 1 { "day" } else { "days" };
    let batch = request.batch.as_deref().unwrap_or("no batch");

    let mut lines = vec![
        format!(
            "**Leave request #{}** {} {overall}",
            request.id,
            overall_badge(overall)
        ),
        format!(
            "Student: {student_name} ({batch}, {:.1}% attendance at submission)",
            request.attendance
        ),
        format!(
            "Dates: {} → {} ({days} {unit})",
            request.from_date, request.to_date
        ),
        format!("Reason: {}", request.reason),
        format!(
            "Submitted: {}",
            request.created_at.format("%Y-%m-%d %H:%M UTC")
        ),
    ];
    for gate in Gate::ALL {
        let status = gate.status_of(request);
        let when = gate
            .action_at(request)
            .map(|at| format!(" on {}", at.format("%Y-%m-%d %H:%M UTC")))
            .unwrap_or_default();
        lines.push(format!("{gate}: {} {status}{when}", gate_badge(status)));
    }
    lines.join("\n")
}

/// Profile shown by `/whoami`.
pub fn format_profile(profile: &user::Model) -> Result<String> {
    let mut out = String::new();
    write!(out, "**{}** ({})", profile.name, profile.role.title())?;
    if let Some(batch) = &profile.batch {
        write!(out, "\nBatch: {batch}")?;
    }
    match profile.role {
        Role::Student => {
            if let Some(roll_no) = profile.roll_no {
                write!(out, "\nRoll no: {roll_no}")?;
            }
            write!(out, "\nAttendance: {:.1}%", profile.attendance_or_zero())?;
        }
        Role::Tg | Role::Cc | Role::Hod => {
            if let Some(gate) = Gate::for_role(profile.role) {
                write!(out, "\nYou decide the {gate} gate.")?;
            }
        }
    }
    Ok(out)
}

/// Reply for `/students` when the list comes back empty.
#[must_use]
pub const fn empty_roster_message(role: Role) -> &'static str {
    match role {
        Role::Tg => "No students are assigned to you.",
        Role::Student | Role::Cc | Role::Hod => "No students are on the roster yet.",
    }
}

/// Discord rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Joins lines under `header`, dropping trailing lines that would push the
/// message past `limit` characters and noting how many were left out.
#[must_use]
pub fn format_list(header: &str, lines: &[String], limit: usize) -> String {
    let mut out = header.to_string();
    let mut used = header.chars().count();
    for (shown, line) in lines.iter().enumerate() {
        let remaining = lines.len() - shown;
        let footer = format!("\n… and {remaining} more");
        let reserve = if remaining == 1 {
            0
        } else {
            footer.chars().count()
        };
        let line_len = line.chars().count();
        if used + 1 + line_len + reserve > limit {
            out.push_str(&footer);
            return out;
        }
        out.push('\n');
        out.push_str(line);
        used += 1 + line_len;
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::policy::MAX_REASON_LEN_LIMIT;
    use crate::test_utils::*;
    use chrono::{TimeZone, Utc};

    fn sample_request() -> leave_request::Model {
        leave_request::Model {
            id: 3,
            student_id: 4,
            reason: "Family function".to_string(),
            from_date: date("2026-10-20"),
            to_date: date("2026-10-21"),
            created_at: Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap(),
            status_tg: GateStatus::Approved,
            status_cc: GateStatus::Pending,
            status_hod: GateStatus::Pending,
            tg_action_at: Some(Utc.with_ymd_and_hms(2026, 10, 17, 11, 30, 0).unwrap()),
            cc_action_at: None,
            hod_action_at: None,
            batch: Some("Batch 2".to_string()),
            attendance: 89.0,
        }
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range(date("2026-10-20"), date("2026-10-21")),
            "2026-10-20 → 2026-10-21 (2 days)"
        );
        assert_eq!(
            format_date_range(date("2026-10-20"), date("2026-10-20")),
            "2026-10-20 → 2026-10-20 (1 day)"
        );
    }

    #[test]
    fn test_format_gate_progress() {
        assert_eq!(format_gate_progress(&sample_request()), "TG ✅ · CC ⏳ · HOD ⏳");
    }

    #[test]
    fn test_format_attendance_bar() {
        assert_eq!(format_attendance_bar(80.0, Some(10)), "[████████░░] 80.0%");
        assert_eq!(format_attendance_bar(0.0, Some(10)), "[░░░░░░░░░░] 0.0%");
        assert_eq!(format_attendance_bar(100.0, Some(4)), "[████] 100.0%");
    }

    #[test]
    fn test_format_history_entry() {
        assert_eq!(
            format_history_entry(&sample_request()),
            "#3 ⏳ Pending | 2026-10-20 → 2026-10-21 (2 days) | Family function"
        );
    }

    #[test]
    fn test_format_queue_entry_uses_snapshot() {
        assert_eq!(
            format_queue_entry(&sample_request(), "Pradnya Jadhav"),
            "#3 Pradnya Jadhav (Batch 2, 89.0% attendance) | 2026-10-20 → 2026-10-21 (2 days) | Family function"
        );
    }

    #[test]
    fn test_format_decision() {
        assert_eq!(
            format_decision(&sample_request(), Gate::Tg),
            "✅ Leave request #3 Approved at the TG gate on 2026-10-17 11:30 UTC."
        );
    }

    #[test]
    fn test_format_list_truncates_with_footer() {
        let lines: Vec<String> = (1..=5).map(|i| format!("line {i}")).collect();

        assert_eq!(
            format_list("**Queue**", &lines, MESSAGE_LIMIT),
            "**Queue**\nline 1\nline 2\nline 3\nline 4\nline 5"
        );

        let short = format_list("**Queue**", &lines, 40);
        assert!(short.chars().count() <= 40);
        assert!(short.starts_with("**Queue**\nline 1"));
        assert!(short.ends_with("more"));
    }

    #[test]
    fn test_format_request_detail() {
        assert_eq!(
            format_request_detail(&sample_request(), "Pradnya Jadhav"),
            "**Leave request #3** ⏳ Pending\n\
             Student: Pradnya Jadhav (Batch 2, 89.0% attendance at submission)\n\
             Dates: 2026-10-20 → 2026-10-21 (2 days)\n\
             Reason: Family function\n\
             Submitted: 2026-10-17 09:00 UTC\n\
             TG: ✅ Approved on 2026-10-17 11:30 UTC\n\
             CC: ⏳ Pending\n\
             HOD: ⏳ Pending"
        );
    }

    #[test]
    fn test_longest_allowed_reason_fits_one_message() {
        let mut request = sample_request();
        request.reason = "é".repeat(MAX_REASON_LEN_LIMIT);

        let detail = format_request_detail(&request, "Pradnya Jadhav");
        assert!(detail.chars().count() <= MESSAGE_LIMIT);

        let queue = format_list(
            "**Pending leave requests (1)**",
            &[format_queue_entry(&request, "Pradnya Jadhav")],
            MESSAGE_LIMIT,
        );
        assert!(queue.contains("#3 Pradnya Jadhav"));
        assert!(!queue.contains("more"));

        let history = format_list(
            "**Your leave requests**",
            &[format_history_entry(&request)],
            MESSAGE_LIMIT,
        );
        assert!(history.contains("#3 ⏳ Pending"));
    }

    fn profile(role: Role) -> user::Model {
        user::Model {
            id: 4,
            name: "Pradnya Jadhav".to_string(),
            role,
            discord_id: None,
            roll_no: None,
            batch: Some("Batch 2".to_string()),
            attendance: None,
            tg_id: None,
            cc_id: None,
        }
    }

    #[test]
    fn test_format_profile_per_role() {
        let mut student = profile(Role::Student);
        student.roll_no = Some(19);
        student.attendance = Some(89.0);
        assert_eq!(
            format_profile(&student).unwrap(),
            "**Pradnya Jadhav** (Student)\nBatch: Batch 2\nRoll no: 19\nAttendance: 89.0%"
        );

        let mut hod = profile(Role::Hod);
        hod.name = "Dr. P. R. Sonawane".to_string();
        hod.batch = None;
        assert_eq!(
            format_profile(&hod).unwrap(),
            "**Dr. P. R. Sonawane** (Head of Department)\nYou decide the HOD gate."
        );
    }

    #[test]
    fn test_empty_roster_message_matches_scope() {
        assert_eq!(empty_roster_message(Role::Tg), "No students are assigned to you.");
        assert_eq!(empty_roster_message(Role::Cc), "No students are on the roster yet.");
        assert_eq!(empty_roster_message(Role::Hod), "No students are on the roster yet.");
    }
}
