//! Leave request entity - One student's request and its three approval gates.
//!
//! The `status_tg`, `status_cc` and `status_hod` columns move from `Pending` to
//! `Approved` or `Rejected` exactly once, each stamping its own `*_action_at`.
//! `batch` and `attendance` are copied from the student at submission time and
//! never refreshed, so history shows what the approvers saw.

use crate::core::status::{self, OverallStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single approval gate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GateStatus {
    /// Waiting for the approver
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Approved, terminal
    #[sea_orm(string_value = "Approved")]
    Approved,
    /// Rejected, terminal
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl GateStatus {
    /// Whether the gate already holds a decision.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// Leave request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student who applied
    pub student_id: i64,
    /// Free-text reason given by the student
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    /// First day of leave
    pub from_date: Date,
    /// Last day of leave
    pub to_date: Date,
    /// When the student submitted the request
    pub created_at: DateTimeUtc,
    /// Teacher Guardian gate
    pub status_tg: GateStatus,
    /// Class Coordinator gate
    pub status_cc: GateStatus,
    /// Head of Department gate
    pub status_hod: GateStatus,
    /// When the Teacher Guardian decided
    pub tg_action_at: Option<DateTimeUtc>,
    /// When the Class Coordinator decided
    pub cc_action_at: Option<DateTimeUtc>,
    /// When the Head of Department decided
    pub hod_action_at: Option<DateTimeUtc>,
    /// Student's batch at submission time
    pub batch: Option<String>,
    /// Student's attendance at submission time
    pub attendance: f64,
}

impl Model {
    /// Aggregate status shown in the student's history.
    #[must_use]
    pub const fn overall_status(&self) -> OverallStatus {
        status::overall_status(self.status_tg, self.status_cc, self.status_hod)
    }

    /// Number of days covered, both ends inclusive.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.to_date - self.from_date).num_days() + 1
    }
}

/// Defines relationships between `LeaveRequest` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request belongs to one student
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
