//! Roster business logic - creating and looking up students and approvers.
//!
//! Creation enforces the roster invariant: only students carry a roll number,
//! attendance and approver links, and those links must point at a user with
//! the matching approver role.

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Fields needed to put someone on the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Role on the roster
    pub role: Role,
    /// Linked Discord account
    pub discord_id: Option<String>,
    /// Roll number, students only
    pub roll_no: Option<i32>,
    /// Batch label
    pub batch: Option<String>,
    /// Attendance percentage, students only
    pub attendance: Option<f64>,
    /// Assigned Teacher Guardian, students only
    pub tg_id: Option<i64>,
    /// Assigned Class Coordinator, students only
    pub cc_id: Option<i64>,
}

impl NewUser {
    /// An approver (or a student, to be filled in) with no optional fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            discord_id: None,
            roll_no: None,
            batch: None,
            attendance: None,
            tg_id: None,
            cc_id: None,
        }
    }
}

/// Finds a user by id.
pub async fn find_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds the user linked to a Discord account.
pub async fn find_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Students assigned to a Teacher Guardian, ordered by roll number.
pub async fn students_for_tg(db: &DatabaseConnection, tg_id: i64) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(Role::Student))
        .filter(user::Column::TgId.eq(tg_id))
        .order_by_asc(user::Column::RollNo)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every student on the roster, ordered by roll number.
pub async fn all_students(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(Role::Student))
        .order_by_asc(user::Column::RollNo)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether anyone is on the roster yet.
pub async fn roster_is_empty(db: &DatabaseConnection) -> Result<bool> {
    Ok(User::find().count(db).await? == 0)
}

/// Adds a user to the roster after validating the role invariants.
///
/// Accepts a connection or a transaction so that roster seeding can be atomic.
#[instrument(skip(db, new_user), fields(name = %new_user.name, role = %new_user.role))]
pub async fn create_user<C>(db: &C, new_user: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let name = new_user.name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "User name cannot be empty".to_string(),
        });
    }

    match new_user.role {
        Role::Student => {
            if let Some(attendance) = new_user
                .attendance
                .filter(|value| !(0.0..=100.0).contains(value))
            {
                return Err(Error::Config {
                    message: format!(
                        "Attendance for '{name}' must be between 0 and 100, got {attendance}"
                    ),
                });
            }
            let (Some(tg_id), Some(cc_id)) = (new_user.tg_id, new_user.cc_id) else {
                return Err(Error::Config {
                    message: format!(
                        "Student '{name}' needs both a Teacher Guardian and a Class Coordinator"
                    ),
                });
            };
            ensure_role(db, tg_id, Role::Tg).await?;
            ensure_role(db, cc_id, Role::Cc).await?;
        }
        Role::Tg | Role::Cc | Role::Hod => {
            if new_user.roll_no.is_some()
                || new_user.attendance.is_some()
                || new_user.tg_id.is_some()
                || new_user.cc_id.is_some()
            {
                return Err(Error::Config {
                    message: format!(
                        "{} '{name}' cannot have a roll number, attendance or assigned approvers",
                        new_user.role
                    ),
                });
            }
        }
    }

    let model = user::ActiveModel {
        name: Set(name.to_string()),
        role: Set(new_user.role),
        discord_id: Set(new_user.discord_id),
        roll_no: Set(new_user.roll_no),
        batch: Set(new_user.batch),
        attendance: Set(new_user.attendance),
        tg_id: Set(new_user.tg_id),
        cc_id: Set(new_user.cc_id),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(user_id = created.id, "Added user to roster");
    Ok(created)
}

async fn ensure_role<C>(db: &C, user_id: i64, role: Role) -> Result<()>
where
    C: ConnectionTrait,
{
    let user = find_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            reference: format!("user #{user_id}"),
        })?;
    if user.role == role {
        Ok(())
    } else {
        Err(Error::Config {
            message: format!(
                "'{}' is a {} and cannot be assigned as {}",
                user.name,
                user.role.title(),
                role.title()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_approver_cannot_carry_student_fields() -> Result<()> {
        let db = setup_test_db().await?;

        let mut cc = NewUser::new("Prof. A. B. Marathe", Role::Cc);
        cc.attendance = Some(90.0);
        let result = create_user(&db, cc).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(roster_is_empty(&db).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_approver_may_have_batch_label() -> Result<()> {
        let db = setup_test_db().await?;

        let mut tg = NewUser::new("Prof. S. P. Jadhav", Role::Tg);
        tg.batch = Some("Batch 3".to_string());
        let created = create_user(&db, tg).await?;
        assert_eq!(created.batch.as_deref(), Some("Batch 3"));

        Ok(())
    }

    #[tokio::test]
    async fn test_student_links_must_point_at_matching_roles() -> Result<()> {
        let db = setup_test_db().await?;
        let cc = create_test_staff(&db, "Prof. A. B. Marathe", Role::Cc).await?;

        let mut student = NewUser::new("Pooja Kale", Role::Student);
        student.attendance = Some(80.0);
        student.tg_id = Some(cc.id);
        let result = create_user(&db, student).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let mut student = NewUser::new("Pooja Kale", Role::Student);
        student.tg_id = Some(999);
        student.cc_id = Some(cc.id);
        let result = create_user(&db, student).await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_student_without_tg_or_cc_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let tg = create_test_staff(&db, "Prof. S. P. Jadhav", Role::Tg).await?;
        let cc = create_test_staff(&db, "Prof. A. B. Marathe", Role::Cc).await?;

        let mut no_tg = NewUser::new("Pradnya Jadhav", Role::Student);
        no_tg.attendance = Some(90.0);
        no_tg.cc_id = Some(cc.id);
        let result = create_user(&db, no_tg).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let mut no_cc = NewUser::new("Pradnya Jadhav", Role::Student);
        no_cc.attendance = Some(90.0);
        no_cc.tg_id = Some(tg.id);
        let result = create_user(&db, no_cc).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        assert!(all_students(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_attendance_out_of_range_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let mut student = NewUser::new("Amit Shinde", Role::Student);
        student.attendance = Some(120.0);
        assert!(create_user(&db, student).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_students_for_tg_only_returns_assigned_students() -> Result<()> {
        let (db, roster) = setup_with_roster().await?;
        let other_tg = create_test_staff(&db, "Prof. K. L. Patil", Role::Tg).await?;
        create_test_student(&db, "Rahul More", 30, 88.0, &other_tg, &roster.cc).await?;

        let students = students_for_tg(&db, roster.tg.id).await?;
        let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Amit Shinde", "Pooja Kale", "Pradnya Jadhav"]);

        assert_eq!(all_students(&db).await?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_discord_id() -> Result<()> {
        let (db, roster) = setup_with_roster().await?;

        let found = find_by_discord_id(&db, &discord_id_for("Pooja Kale"))
            .await?
            .unwrap();
        assert_eq!(found.id, roster.low_attendance.id);
        assert!(find_by_discord_id(&db, "nobody").await?.is_none());

        Ok(())
    }
}
