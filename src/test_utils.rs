//! Shared test utilities for `LeaveDesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating roster members and leave requests with sensible defaults.

use crate::{
    config::policy::LeavePolicy,
    core::{
        actor::Actor,
        leave,
        user::{self, NewUser},
    },
    entities::{self, Role},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Discord id the helpers link to a roster member with the given name.
pub fn discord_id_for(name: &str) -> String {
    format!("discord:{name}")
}

/// Creates an approver (TG, CC or HOD) linked to `discord_id_for(name)`.
pub async fn create_test_staff(
    db: &DatabaseConnection,
    name: &str,
    role: Role,
) -> Result<entities::user::Model> {
    let mut new_user = NewUser::new(name, role);
    new_user.discord_id = Some(discord_id_for(name));
    user::create_user(db, new_user).await
}

/// Creates a student in "Batch 1" assigned to the given TG and CC.
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
    roll_no: i32,
    attendance: f64,
    tg: &entities::user::Model,
    cc: &entities::user::Model,
) -> Result<entities::user::Model> {
    let mut new_user = NewUser::new(name, Role::Student);
    new_user.discord_id = Some(discord_id_for(name));
    new_user.roll_no = Some(roll_no);
    new_user.batch = Some("Batch 1".to_string());
    new_user.attendance = Some(attendance);
    new_user.tg_id = Some(tg.id);
    new_user.cc_id = Some(cc.id);
    user::create_user(db, new_user).await
}

/// Builds the actor for a roster member.
pub fn actor(user: &entities::user::Model) -> Actor {
    Actor::from_user(user)
}

/// Parses a `YYYY-MM-DD` literal.
#[allow(clippy::unwrap_used)]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Submits a two-day leave request with the default policy.
pub async fn submit_test_request(
    db: &DatabaseConnection,
    student: &entities::user::Model,
) -> Result<entities::leave_request::Model> {
    leave::submit(
        db,
        &LeavePolicy::default(),
        &actor(student),
        "Family function",
        date("2026-10-20"),
        date("2026-10-21"),
    )
    .await
}

/// One approver of each role plus three students with different attendance.
pub struct TestRoster {
    /// Teacher Guardian of every student below
    pub tg: entities::user::Model,
    /// Class Coordinator of every student below
    pub cc: entities::user::Model,
    /// Head of Department
    pub hod: entities::user::Model,
    /// Pooja Kale, 73% attendance
    pub low_attendance: entities::user::Model,
    /// Amit Shinde, 65% attendance
    pub failing: entities::user::Model,
    /// Pradnya Jadhav, 89% attendance
    pub eligible: entities::user::Model,
}

/// Sets up a database holding a complete roster.
/// Returns (db, roster) for workflow tests.
pub async fn setup_with_roster() -> Result<(DatabaseConnection, TestRoster)> {
    let db = setup_test_db().await?;
    let tg = create_test_staff(&db, "Prof. S. P. Jadhav", Role::Tg).await?;
    let cc = create_test_staff(&db, "Prof. A. B. Marathe", Role::Cc).await?;
    let hod = create_test_staff(&db, "Dr. P. R. Sonawane", Role::Hod).await?;
    let low_attendance = create_test_student(&db, "Pooja Kale", 10, 73.0, &tg, &cc).await?;
    let failing = create_test_student(&db, "Amit Shinde", 5, 65.0, &tg, &cc).await?;
    let eligible = create_test_student(&db, "Pradnya Jadhav", 19, 89.0, &tg, &cc).await?;

    Ok((
        db,
        TestRoster {
            tg,
            cc,
            hod,
            low_attendance,
            failing,
            eligible,
        },
    ))
}
