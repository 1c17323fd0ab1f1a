//! Attendance gate for leave submission.

use crate::errors::{Error, Result};

/// Attendance percentage below which a student may not apply for leave.
pub const DEFAULT_MIN_ATTENDANCE: f64 = 75.0;

/// Whether the attendance is under the threshold.
///
/// A missing or non-finite attendance counts as zero.
#[must_use]
pub fn is_below_threshold(attendance: Option<f64>, threshold: f64) -> bool {
    normalized(attendance) < threshold
}

/// Checks a student's attendance against the threshold.
///
/// Returns the attendance that will be snapshotted onto the new request.
pub fn check_attendance(attendance: Option<f64>, threshold: f64) -> Result<f64> {
    let attendance = normalized(attendance);
    if attendance < threshold {
        return Err(Error::AttendanceBelowThreshold {
            attendance,
            threshold,
        });
    }
    Ok(attendance)
}

fn normalized(attendance: Option<f64>) -> f64 {
    attendance.filter(|value| value.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_below_threshold_is_rejected() {
        let result = check_attendance(Some(73.0), DEFAULT_MIN_ATTENDANCE);
        assert!(matches!(
            result,
            Err(Error::AttendanceBelowThreshold { attendance, threshold })
                if attendance == 73.0 && threshold == 75.0
        ));
        assert!(is_below_threshold(Some(74.99), DEFAULT_MIN_ATTENDANCE));
    }

    #[test]
    fn test_threshold_itself_is_eligible() -> Result<()> {
        assert_eq!(check_attendance(Some(75.0), DEFAULT_MIN_ATTENDANCE)?, 75.0);
        assert_eq!(check_attendance(Some(89.0), DEFAULT_MIN_ATTENDANCE)?, 89.0);
        assert!(!is_below_threshold(Some(75.0), DEFAULT_MIN_ATTENDANCE));
        Ok(())
    }

    #[test]
    fn test_missing_or_nan_attendance_is_ineligible() {
        assert!(check_attendance(None, DEFAULT_MIN_ATTENDANCE).is_err());
        assert!(check_attendance(Some(f64::NAN), DEFAULT_MIN_ATTENDANCE).is_err());
        assert!(is_below_threshold(None, DEFAULT_MIN_ATTENDANCE));
    }
}
