//! Leave request business logic - submission and history.
//!
//! Submission is the only way a request comes into existence. It checks the
//! student's current attendance against the policy, validates the form, and
//! stores the request with every gate `Pending` and a snapshot of the student's
//! batch and attendance. Requests are never deleted.

use crate::{
    config::policy::LeavePolicy,
    core::{actor::Actor, eligibility, user},
    entities::{GateStatus, LeaveRequest, Role, User, leave_request, user as user_entity},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Submits a leave request on behalf of the acting student.
///
/// Fails without writing anything when the student's attendance is under
/// `policy.min_attendance`, the reason is blank or longer than
/// `policy.max_reason_len`, or `from_date` is after `to_date`.
#[instrument(skip(db, policy, reason), fields(student_id = actor.user_id))]
pub async fn submit(
    db: &DatabaseConnection,
    policy: &LeavePolicy,
    actor: &Actor,
    reason: &str,
    from_date: NaiveDate,
    to_date: NaiveDate,
) -> Result<leave_request::Model> {
    actor.require_role(Role::Student, "apply for leave")?;

    let student = user::find_by_id(db, actor.user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            reference: format!("student #{}", actor.user_id),
        })?;

    let attendance = eligibility::check_attendance(student.attendance, policy.min_attendance)?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(Error::EmptyReason);
    }
    let length = reason.chars().count();
    if length > policy.max_reason_len {
        return Err(Error::ReasonTooLong {
            length,
            max: policy.max_reason_len,
        });
    }

    if from_date > to_date {
        return Err(Error::InvalidDateRange {
            from: from_date,
            to: to_date,
        });
    }

    let request = leave_request::ActiveModel {
        student_id: Set(student.id),
        reason: Set(reason.to_string()),
        from_date: Set(from_date),
        to_date: Set(to_date),
        created_at: Set(Utc::now()),
        status_tg: Set(GateStatus::Pending),
        status_cc: Set(GateStatus::Pending),
        status_hod: Set(GateStatus::Pending),
        tg_action_at: Set(None),
        cc_action_at: Set(None),
        hod_action_at: Set(None),
        batch: Set(student.batch.clone()),
        attendance: Set(attendance),
        ..Default::default()
    };

    let created = request.insert(db).await?;
    info!(request_id = created.id, %from_date, %to_date, "Leave request submitted");
    Ok(created)
}

/// Finds a leave request by id.
pub async fn get_request(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<Option<leave_request::Model>> {
    LeaveRequest::find_by_id(request_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All of a student's requests, newest first.
pub async fn history_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .filter(leave_request::Column::StudentId.eq(student_id))
        .order_by_desc(leave_request::Column::CreatedAt)
        .order_by_desc(leave_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a request for display, enforcing who may look at it.
///
/// Students only see their own requests; anything else reads as not found.
/// A Teacher Guardian sees requests of their assigned students. The CC and HOD
/// see every request.
pub async fn view_request(
    db: &DatabaseConnection,
    actor: &Actor,
    request_id: i64,
) -> Result<leave_request::Model> {
    let request = get_request(db, request_id)
        .await?
        .ok_or(Error::LeaveRequestNotFound { id: request_id })?;

    match actor.role {
        Role::Student if request.student_id != actor.user_id => {
            Err(Error::LeaveRequestNotFound { id: request_id })
        }
        Role::Tg => {
            let student = user::find_by_id(db, request.student_id).await?;
            if student.and_then(|s| s.tg_id) == Some(actor.user_id) {
                Ok(request)
            } else {
                Err(Error::NotAssigned { id: request_id })
            }
        }
        Role::Student | Role::Cc | Role::Hod => Ok(request),
    }
}

/// The student's `limit` most recent requests, newest first.
pub async fn recent_for_student(
    db: &DatabaseConnection,
    student_id: i64,
    limit: u64,
) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .filter(leave_request::Column::StudentId.eq(student_id))
        .order_by_desc(leave_request::Column::CreatedAt)
        .order_by_desc(leave_request::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every request in the system, newest first.
pub async fn all_requests(db: &DatabaseConnection) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .order_by_desc(leave_request::Column::CreatedAt)
        .order_by_desc(leave_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Names of the students who filed the given requests, keyed by student id.
pub async fn student_names(
    db: &DatabaseConnection,
    requests: &[leave_request::Model],
) -> Result<HashMap<i64, String>> {
    let mut ids: Vec<i64> = requests.iter().map(|r| r.student_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let students = User::find()
        .filter(user_entity::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(students.into_iter().map(|s| (s.id, s.name)).collect())
}
