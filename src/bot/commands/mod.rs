//! Discord command implementations organized by who uses them.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Approver commands: queues, decisions, and roster views
pub mod approver;

/// Role dashboard command
pub mod dashboard;

/// General utility commands
pub mod general;

/// Student commands: applying for leave and viewing history
pub mod student;

// Export commands
pub use approver::*;
pub use dashboard::*;
pub use general::*;
pub use student::*;
