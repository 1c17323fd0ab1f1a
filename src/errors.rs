//! Error types for `LeaveDesk`.
//!
//! Domain rejections (attendance too low, gate already decided, ...) and
//! infrastructure failures share one enum so that every layer can use `?`.
//! [`Error::is_user_facing`] tells the bot which ones can be shown verbatim.

use crate::{
    core::approval::Gate,
    entities::{leave_request::GateStatus, user::Role},
};
use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the whole crate
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or roster problems
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Failure while building a message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// The student's attendance is under the submission threshold
    #[error(
        "Your attendance is {attendance:.1}%, below the required {threshold:.0}%. You cannot apply for leave."
    )]
    AttendanceBelowThreshold {
        /// Attendance on record at submission time
        attendance: f64,
        /// Minimum attendance required
        threshold: f64,
    },

    /// No leave request with this id exists
    #[error("Leave request #{id} not found")]
    LeaveRequestNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No roster entry matches the reference
    #[error("User not found: {reference}")]
    UserNotFound {
        /// Id, Discord account or roster key that was looked up
        reference: String,
    },

    /// The leave would end before it starts
    #[error("Leave cannot end before it starts ({from} to {to})")]
    InvalidDateRange {
        /// Requested first day of leave
        from: NaiveDate,
        /// Requested last day of leave
        to: NaiveDate,
    },

    /// The reason was blank
    #[error("A reason is required to apply for leave")]
    EmptyReason,

    /// The reason is longer than the policy allows
    #[error("The reason is {length} characters long; keep it under {max} characters")]
    ReasonTooLong {
        /// Length of the submitted reason, in characters
        length: usize,
        /// Longest reason allowed
        max: usize,
    },

    /// The acting user's role does not allow the operation
    #[error("{role} accounts cannot {action}")]
    RoleNotPermitted {
        /// Role of the acting user
        role: Role,
        /// Short description of the refused operation
        action: &'static str,
    },

    /// A Teacher Guardian acted on a student assigned to someone else
    #[error("Leave request #{id} belongs to a student who is not assigned to you")]
    NotAssigned {
        /// The leave request id
        id: i64,
    },

    /// An earlier gate has not approved the request yet
    #[error("Leave request #{id} is not ready for {gate} review (waiting on {waiting_on})")]
    GateNotReady {
        /// The leave request id
        id: i64,
        /// Gate the actor tried to decide
        gate: Gate,
        /// First earlier gate that is not approved
        waiting_on: Gate,
    },

    /// The gate already holds a terminal decision
    #[error("Leave request #{id} was already {status} at the {gate} gate")]
    GateAlreadyDecided {
        /// The leave request id
        id: i64,
        /// Gate the actor tried to decide
        gate: Gate,
        /// The decision already on record
        status: GateStatus,
    },

    /// Serenity or poise failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the message is safe and useful to show to the person who ran the command.
    ///
    /// Workflow rejections are; database and framework failures are only logged.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::AttendanceBelowThreshold { .. }
                | Self::LeaveRequestNotFound { .. }
                | Self::UserNotFound { .. }
                | Self::InvalidDateRange { .. }
                | Self::EmptyReason
                | Self::ReasonTooLong { .. }
                | Self::RoleNotPermitted { .. }
                | Self::NotAssigned { .. }
                | Self::GateNotReady { .. }
                | Self::GateAlreadyDecided { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_user_facing() {
        let err = Error::AttendanceBelowThreshold {
            attendance: 73.0,
            threshold: 75.0,
        };
        assert!(err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "Your attendance is 73.0%, below the required 75%. You cannot apply for leave."
        );

        let err = Error::GateNotReady {
            id: 4,
            gate: Gate::Hod,
            waiting_on: Gate::Cc,
        };
        assert!(err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "Leave request #4 is not ready for HOD review (waiting on CC)"
        );
    }

    #[test]
    fn test_infrastructure_errors_are_not_user_facing() {
        let err = Error::Database(sea_orm::DbErr::Custom("disk full".to_string()));
        assert!(!err.is_user_facing());

        let err = Error::Config {
            message: "bad roster".to_string(),
        };
        assert!(!err.is_user_facing());
    }
}
