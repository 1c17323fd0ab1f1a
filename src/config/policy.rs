//! Leave policy settings read from the `[policy]` table of config.toml.

use crate::{
    core::eligibility::DEFAULT_MIN_ATTENDANCE,
    errors::{Error, Result},
};
use serde::Deserialize;

/// Number of requests shown on the student dashboard by default.
pub const DEFAULT_RECENT_REQUESTS: u64 = 5;

/// Longest reason accepted by default, in characters.
pub const DEFAULT_MAX_REASON_LEN: usize = 500;

/// Upper bound for `max_reason_len`; a request at this length still renders
/// inside a single Discord message.
pub const MAX_REASON_LEN_LIMIT: usize = 1000;

/// Tunable rules of the leave workflow
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// Minimum attendance percentage required to apply for leave
    pub min_attendance: f64,
    /// How many requests the student dashboard lists
    pub recent_requests: u64,
    /// Longest reason a student may give, in characters
    pub max_reason_len: usize,
}

impl LeavePolicy {
    /// Rejects settings that would disable or break the workflow.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_attendance) {
            return Err(Error::Config {
                message: format!(
                    "policy.min_attendance must be between 0 and 100, got {}",
                    self.min_attendance
                ),
            });
        }
        if !(1..=MAX_REASON_LEN_LIMIT).contains(&self.max_reason_len) {
            return Err(Error::Config {
                message: format!(
                    "policy.max_reason_len must be between 1 and {MAX_REASON_LEN_LIMIT}, got {}",
                    self.max_reason_len
                ),
            });
        }
        Ok(())
    }
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            min_attendance: DEFAULT_MIN_ATTENDANCE,
            recent_requests: DEFAULT_RECENT_REQUESTS,
            max_reason_len: DEFAULT_MAX_REASON_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let policy: LeavePolicy = toml::from_str("recent_requests = 3").unwrap();
        assert_eq!(policy.min_attendance, 75.0);
        assert_eq!(policy.recent_requests, 3);
        assert_eq!(policy.max_reason_len, 500);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        for toml_str in [
            "min_attendance = nan",
            "min_attendance = 120.0",
            "min_attendance = -1.0",
            "max_reason_len = 0",
            "max_reason_len = 5000",
        ] {
            let policy: LeavePolicy = toml::from_str(toml_str).unwrap();
            assert!(
                matches!(policy.validate(), Err(Error::Config { .. })),
                "{toml_str} should be rejected"
            );
        }

        let edge: LeavePolicy = toml::from_str("min_attendance = 100.0").unwrap();
        assert!(edge.validate().is_ok());
    }
}
