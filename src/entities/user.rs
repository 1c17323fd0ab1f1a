//! User entity - Everyone on the roster: students and the three approver roles.
//!
//! Students carry `roll_no`, `attendance` and links to their Teacher Guardian
//! (`tg_id`) and Class Coordinator (`cc_id`). Approver rows leave those unset.
//! `discord_id` ties a roster row to the Discord account that acts as it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a roster member.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Applies for leave
    #[sea_orm(string_value = "student")]
    Student,
    /// Teacher Guardian, first gate
    #[sea_orm(string_value = "tg")]
    Tg,
    /// Class Coordinator, second gate
    #[sea_orm(string_value = "cc")]
    Cc,
    /// Head of Department, final gate
    #[sea_orm(string_value = "hod")]
    Hod,
}

impl Role {
    /// Full title used in dashboards and help text.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Tg => "Teacher Guardian",
            Self::Cc => "Class Coordinator",
            Self::Hod => "Head of Department",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Student => "Student",
            Self::Tg => "TG",
            Self::Cc => "CC",
            Self::Hod => "HOD",
        };
        f.write_str(label)
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Pooja Kale", "Prof. S. P. Jadhav")
    pub name: String,
    /// Which part of the workflow this user plays
    pub role: Role,
    /// Discord account that acts as this user, if linked
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    /// Roll number, students only
    pub roll_no: Option<i32>,
    /// Batch label (e.g., "Batch 1")
    pub batch: Option<String>,
    /// Attendance percentage, students only
    pub attendance: Option<f64>,
    /// Assigned Teacher Guardian, students only
    pub tg_id: Option<i64>,
    /// Assigned Class Coordinator, students only
    pub cc_id: Option<i64>,
}

impl Model {
    /// Attendance used for eligibility and statistics; a missing value counts as zero.
    #[must_use]
    pub fn attendance_or_zero(&self) -> f64 {
        self.attendance.unwrap_or(0.0)
    }
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A student's Teacher Guardian
    #[sea_orm(belongs_to = "Entity", from = "Column::TgId", to = "Column::Id")]
    TeacherGuardian,
    /// A student's Class Coordinator
    #[sea_orm(belongs_to = "Entity", from = "Column::CcId", to = "Column::Id")]
    ClassCoordinator,
    /// One student has many leave requests
    #[sea_orm(has_many = "super::leave_request::Entity")]
    LeaveRequests,
}

impl Related<super::leave_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
