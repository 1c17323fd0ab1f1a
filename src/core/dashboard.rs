//! Role dashboards - attendance statistics and per-gate counters.
//!
//! Students see their recent requests and whether they may apply. Approvers
//! see attendance buckets for the students they oversee and how many requests
//! sit at their gate.

use crate::{
    config::policy::LeavePolicy,
    core::{actor::Actor, approval, eligibility, leave, user},
    entities::{GateStatus, LeaveRequest, Role, leave_request, user as user_entity},
    errors::{Error, Result},
};
use sea_orm::prelude::*;

/// Count of students per attendance band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceBuckets {
    /// Below 65%
    pub below_65: usize,
    /// 65% up to but excluding 75%
    pub from_65_to_74: usize,
    /// 75% up to but excluding 85%
    pub from_75_to_84: usize,
    /// 85% up to but excluding 95%
    pub from_85_to_94: usize,
    /// 95% and above
    pub from_95_to_100: usize,
}

impl AttendanceBuckets {
    /// Sorts attendance percentages into bands.
    pub fn from_attendance(values: impl IntoIterator<Item = f64>) -> Self {
        let mut buckets = Self::default();
        for value in values {
            if value < 65.0 {
                buckets.below_65 += 1;
            } else if value < 75.0 {
                buckets.from_65_to_74 += 1;
            } else if value < 85.0 {
                buckets.from_75_to_84 += 1;
            } else if value < 95.0 {
                buckets.from_85_to_94 += 1;
            } else {
                buckets.from_95_to_100 += 1;
            }
        }
        buckets
    }

    /// Labelled bands in ascending order, for display.
    #[must_use]
    pub const fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("< 65%", self.below_65),
            ("65-74%", self.from_65_to_74),
            ("75-84%", self.from_75_to_84),
            ("85-94%", self.from_85_to_94),
            ("95-100%", self.from_95_to_100),
        ]
    }

    /// Number of students counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.below_65
            + self.from_65_to_74
            + self.from_75_to_84
            + self.from_85_to_94
            + self.from_95_to_100
    }
}

/// Mean attendance rounded to one decimal; zero when there are no students.
#[must_use]
pub fn average_attendance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // roster sizes are tiny
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// What a student sees on their dashboard.
#[derive(Debug, Clone)]
pub struct StudentDashboard {
    /// The student's roster row
    pub student: user_entity::Model,
    /// Most recent requests, newest first
    pub recent_requests: Vec<leave_request::Model>,
    /// Whether attendance currently blocks new applications
    pub below_threshold: bool,
}

/// What a Teacher Guardian sees on their dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TgDashboard {
    /// Students assigned to this TG
    pub total_students: usize,
    /// Average attendance of those students
    pub average_attendance: f64,
    /// Attendance bands of those students
    pub buckets: AttendanceBuckets,
    /// Requests waiting in this TG's queue
    pub pending_count: usize,
}

/// What the Class Coordinator sees on their dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcDashboard {
    /// Students on the roster
    pub total_students: usize,
    /// Attendance bands across the roster
    pub buckets: AttendanceBuckets,
    /// Requests waiting at the CC gate
    pub pending_count: usize,
    /// Requests the CC gate approved
    pub approved_count: u64,
}

/// What the Head of Department sees on their dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HodDashboard {
    /// Students on the roster
    pub total_students: usize,
    /// Attendance bands across the roster
    pub buckets: AttendanceBuckets,
    /// Requests whose HOD gate is still pending, wherever they are in the pipeline
    pub pending: u64,
    /// Requests the HOD approved
    pub approved: u64,
    /// Requests the HOD rejected
    pub rejected: u64,
}

/// Dashboard for whichever role is acting.
#[derive(Debug, Clone)]
pub enum Dashboard {
    /// Student view
    Student(StudentDashboard),
    /// Teacher Guardian view
    Tg(TgDashboard),
    /// Class Coordinator view
    Cc(CcDashboard),
    /// Head of Department view
    Hod(HodDashboard),
}

/// Builds the dashboard matching the actor's role.
pub async fn dashboard_for(
    db: &DatabaseConnection,
    policy: &LeavePolicy,
    actor: &Actor,
) -> Result<Dashboard> {
    Ok(match actor.role {
        Role::Student => Dashboard::Student(student_dashboard(db, policy, actor.user_id).await?),
        Role::Tg => Dashboard::Tg(tg_dashboard(db, actor.user_id).await?),
        Role::Cc => Dashboard::Cc(cc_dashboard(db).await?),
        Role::Hod => Dashboard::Hod(hod_dashboard(db).await?),
    })
}

/// Student dashboard: recent requests and eligibility.
pub async fn student_dashboard(
    db: &DatabaseConnection,
    policy: &LeavePolicy,
    student_id: i64,
) -> Result<StudentDashboard> {
    let student = user::find_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            reference: format!("student #{student_id}"),
        })?;
    let recent_requests = leave::recent_for_student(db, student_id, policy.recent_requests).await?;
    let below_threshold = eligibility::is_below_threshold(student.attendance, policy.min_attendance);

    Ok(StudentDashboard {
        student,
        recent_requests,
        below_threshold,
    })
}

/// Teacher Guardian dashboard over the TG's own students.
pub async fn tg_dashboard(db: &DatabaseConnection, tg_id: i64) -> Result<TgDashboard> {
    let students = user::students_for_tg(db, tg_id).await?;
    let attendance = attendance_of(&students);
    let pending_count = approval::list_pending_for_tg(db, tg_id).await?.len();

    Ok(TgDashboard {
        total_students: students.len(),
        average_attendance: average_attendance(&attendance),
        buckets: AttendanceBuckets::from_attendance(attendance),
        pending_count,
    })
}

/// Class Coordinator dashboard over the whole roster.
pub async fn cc_dashboard(db: &DatabaseConnection) -> Result<CcDashboard> {
    let students = user::all_students(db).await?;
    let pending_count = approval::list_pending_for_cc(db).await?.len();
    let approved_count = LeaveRequest::find()
        .filter(leave_request::Column::StatusCc.eq(GateStatus::Approved))
        .count(db)
        .await?;

    Ok(CcDashboard {
        total_students: students.len(),
        buckets: AttendanceBuckets::from_attendance(attendance_of(&students)),
        pending_count,
        approved_count,
    })
}

/// Head of Department dashboard over the whole roster.
pub async fn hod_dashboard(db: &DatabaseConnection) -> Result<HodDashboard> {
    let students = user::all_students(db).await?;

    Ok(HodDashboard {
        total_students: students.len(),
        buckets: AttendanceBuckets::from_attendance(attendance_of(&students)),
        pending: count_hod_status(db, GateStatus::Pending).await?,
        approved: count_hod_status(db, GateStatus::Approved).await?,
        rejected: count_hod_status(db, GateStatus::Rejected).await?,
    })
}

async fn count_hod_status(db: &DatabaseConnection, status: GateStatus) -> Result<u64> {
    LeaveRequest::find()
        .filter(leave_request::Column::StatusHod.eq(status))
        .count(db)
        .await
        .map_err(Into::into)
}

fn attendance_of(students: &[user_entity::Model]) -> Vec<f64> {
    students
        .iter()
        .map(user_entity::Model::attendance_or_zero)
        .collect()
}
