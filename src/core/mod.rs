//! Core business logic - framework-agnostic leave workflow operations.
//!
//! Everything here takes a `DatabaseConnection` and, where it matters, the acting
//! [`actor::Actor`]. The bot layer only parses input and formats output.

/// Request-scoped identity of the acting roster member
pub mod actor;
/// Per-role approval queues and gate decisions
pub mod approval;
/// Role dashboards and attendance statistics
pub mod dashboard;
/// Attendance threshold for submission
pub mod eligibility;
/// Submission and history of leave requests
pub mod leave;
/// Text formatting for requests and attendance
pub mod report;
/// Overall status derived from the three gates
pub mod status;
/// Roster lookups and creation
pub mod user;
