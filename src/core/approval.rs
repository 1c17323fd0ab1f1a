//! Approval gates - the per-role queues and the decisions that move a request along.
//!
//! A request passes three gates in a fixed order: Teacher Guardian, Class
//! Coordinator, Head of Department. Each gate goes from `Pending` to `Approved` or
//! `Rejected` once and never changes again. A gate only becomes visible to its
//! approver after every earlier gate approved, and deciding enforces the same rule,
//! so nobody can act on a request that is not in their queue.

use crate::{
    core::actor::Actor,
    entities::{GateStatus, LeaveRequest, Role, User, leave_request, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::fmt;
use tracing::{info, instrument, warn};

/// One of the three approval checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Teacher Guardian
    Tg,
    /// Class Coordinator
    Cc,
    /// Head of Department
    Hod,
}

impl Gate {
    /// Gates in routing order.
    pub const ALL: [Self; 3] = [Self::Tg, Self::Cc, Self::Hod];

    /// The gate a role is responsible for; students have none.
    #[must_use]
    pub const fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Student => None,
            Role::Tg => Some(Self::Tg),
            Role::Cc => Some(Self::Cc),
            Role::Hod => Some(Self::Hod),
        }
    }

    /// Gates that must approve before this one may act.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::Tg => &[],
            Self::Cc => &[Self::Tg],
            Self::Hod => &[Self::Tg, Self::Cc],
        }
    }

    /// Current state of this gate on a request.
    #[must_use]
    pub const fn status_of(self, request: &leave_request::Model) -> GateStatus {
        match self {
            Self::Tg => request.status_tg,
            Self::Cc => request.status_cc,
            Self::Hod => request.status_hod,
        }
    }

    /// When this gate was decided, if it was.
    #[must_use]
    pub const fn action_at(self, request: &leave_request::Model) -> Option<DateTime<Utc>> {
        match self {
            Self::Tg => request.tg_action_at,
            Self::Cc => request.cc_action_at,
            Self::Hod => request.hod_action_at,
        }
    }

    fn record(self, request: &mut leave_request::ActiveModel, status: GateStatus, at: DateTime<Utc>) {
        match self {
            Self::Tg => {
                request.status_tg = Set(status);
                request.tg_action_at = Set(Some(at));
            }
            Self::Cc => {
                request.status_cc = Set(status);
                request.cc_action_at = Set(Some(at));
            }
            Self::Hod => {
                request.status_hod = Set(status);
                request.hod_action_at = Set(Some(at));
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tg => "TG",
            Self::Cc => "CC",
            Self::Hod => "HOD",
        };
        f.write_str(label)
    }
}

/// What an approver does with a request in their queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through this gate
    Approve,
    /// Stop the request here
    Reject,
}

impl Decision {
    /// Gate status the decision leaves behind.
    #[must_use]
    pub const fn outcome(self) -> GateStatus {
        match self {
            Self::Approve => GateStatus::Approved,
            Self::Reject => GateStatus::Rejected,
        }
    }
}

/// Pending requests of the students assigned to a Teacher Guardian, oldest first.
pub async fn list_pending_for_tg(
    db: &DatabaseConnection,
    tg_id: i64,
) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .join(JoinType::InnerJoin, leave_request::Relation::Student.def())
        .filter(user::Column::TgId.eq(tg_id))
        .filter(leave_request::Column::StatusTg.eq(GateStatus::Pending))
        .order_by_asc(leave_request::Column::CreatedAt)
        .order_by_asc(leave_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Requests the Teacher Guardian approved that still wait for the Class Coordinator.
pub async fn list_pending_for_cc(db: &DatabaseConnection) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .filter(leave_request::Column::StatusTg.eq(GateStatus::Approved))
        .filter(leave_request::Column::StatusCc.eq(GateStatus::Pending))
        .order_by_asc(leave_request::Column::CreatedAt)
        .order_by_asc(leave_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Requests both earlier gates approved that wait for the Head of Department.
pub async fn list_pending_for_hod(db: &DatabaseConnection) -> Result<Vec<leave_request::Model>> {
    LeaveRequest::find()
        .filter(leave_request::Column::StatusTg.eq(GateStatus::Approved))
        .filter(leave_request::Column::StatusCc.eq(GateStatus::Approved))
        .filter(leave_request::Column::StatusHod.eq(GateStatus::Pending))
        .order_by_asc(leave_request::Column::CreatedAt)
        .order_by_asc(leave_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The queue of whoever is acting.
pub async fn pending_queue(
    db: &DatabaseConnection,
    actor: &Actor,
) -> Result<Vec<leave_request::Model>> {
    match actor.role {
        Role::Student => Err(Error::RoleNotPermitted {
            role: actor.role,
            action: "review leave requests",
        }),
        Role::Tg => list_pending_for_tg(db, actor.user_id).await,
        Role::Cc => list_pending_for_cc(db).await,
        Role::Hod => list_pending_for_hod(db).await,
    }
}

/// Teacher Guardian decision.
pub async fn decide_tg(
    db: &DatabaseConnection,
    actor: &Actor,
    request_id: i64,
    decision: Decision,
) -> Result<leave_request::Model> {
    decide(db, actor, Gate::Tg, request_id, decision).await
}

/// Class Coordinator decision.
pub async fn decide_cc(
    db: &DatabaseConnection,
    actor: &Actor,
    request_id: i64,
    decision: Decision,
) -> Result<leave_request::Model> {
    decide(db, actor, Gate::Cc, request_id, decision).await
}

/// Head of Department decision.
pub async fn decide_hod(
    db: &DatabaseConnection,
    actor: &Actor,
    request_id: i64,
    decision: Decision,
) -> Result<leave_request::Model> {
    decide(db, actor, Gate::Hod, request_id, decision).await
}

/// Decides the gate the actor's role is responsible for.
pub async fn decide_as(
    db: &DatabaseConnection,
    actor: &Actor,
    request_id: i64,
    decision: Decision,
) -> Result<leave_request::Model> {
    let gate = Gate::for_role(actor.role).ok_or(Error::RoleNotPermitted {
        role: actor.role,
        action: "review leave requests",
    })?;
    decide(db, actor, gate, request_id, decision).await
}

/// Records a decision on one gate of a request.
///
/// The read and the write happen in one database transaction. The request must
/// exist, the gate must belong to the actor's role, every earlier gate must have
/// approved, and the gate itself must still be pending. A Teacher Guardian may
/// only decide for students assigned to them.
#[instrument(skip(db, actor), fields(actor_id = actor.user_id, role = %actor.role))]
pub async fn decide(
    db: &DatabaseConnection,
    actor: &Actor,
    gate: Gate,
    request_id: i64,
    decision: Decision,
) -> Result<leave_request::Model> {
    if Gate::for_role(actor.role) != Some(gate) {
        return Err(Error::RoleNotPermitted {
            role: actor.role,
            action: "decide at this gate",
        });
    }

    let txn = db.begin().await?;

    let request = LeaveRequest::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or(Error::LeaveRequestNotFound { id: request_id })?;

    if gate == Gate::Tg {
        let student = User::find_by_id(request.student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                reference: format!("student #{}", request.student_id),
            })?;
        if student.tg_id != Some(actor.user_id) {
            warn!(request_id, "Teacher Guardian tried to decide for an unassigned student");
            return Err(Error::NotAssigned { id: request_id });
        }
    }

    let current = gate.status_of(&request);
    if current.is_terminal() {
        return Err(Error::GateAlreadyDecided {
            id: request_id,
            gate,
            status: current,
        });
    }

    if let Some(&waiting_on) = gate
        .prerequisites()
        .iter()
        .find(|earlier| earlier.status_of(&request) != GateStatus::Approved)
    {
        return Err(Error::GateNotReady {
            id: request_id,
            gate,
            waiting_on,
        });
    }

    let outcome = decision.outcome();
    let mut active: leave_request::ActiveModel = request.into();
    gate.record(&mut active, outcome, Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(request_id, %gate, %outcome, "Leave request decided");
    Ok(updated)
}
