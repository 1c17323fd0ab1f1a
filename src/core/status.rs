//! Overall status derivation.
//!
//! The aggregate status is never stored. It is recomputed from the three gates
//! every time a request is displayed, and routing never looks at it.

use crate::entities::leave_request::GateStatus;
use std::fmt;

/// Aggregate status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallStatus {
    /// At least one gate is still waiting and none has rejected
    Pending,
    /// Every gate approved
    Approved,
    /// Some gate rejected
    Rejected,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// Derives the overall status from the TG, CC and HOD gates.
///
/// Any rejection wins over everything else; approval needs all three gates.
#[must_use]
pub const fn overall_status(tg: GateStatus, cc: GateStatus, hod: GateStatus) -> OverallStatus {
    use GateStatus::{Approved, Rejected};

    match (tg, cc, hod) {
        (Rejected, _, _) | (_, Rejected, _) | (_, _, Rejected) => OverallStatus::Rejected,
        (Approved, Approved, Approved) => OverallStatus::Approved,
        _ => OverallStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GateStatus::{Approved, Pending, Rejected};

    const ALL: [GateStatus; 3] = [Pending, Approved, Rejected];

    #[test]
    fn test_any_rejection_means_rejected() {
        for tg in ALL {
            for cc in ALL {
                for hod in ALL {
                    let any_rejected = [tg, cc, hod].contains(&Rejected);
                    assert_eq!(
                        overall_status(tg, cc, hod) == OverallStatus::Rejected,
                        any_rejected,
                        "tg={tg} cc={cc} hod={hod}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_approved_only_when_all_gates_approved() {
        for tg in ALL {
            for cc in ALL {
                for hod in ALL {
                    let all_approved = tg == Approved && cc == Approved && hod == Approved;
                    assert_eq!(
                        overall_status(tg, cc, hod) == OverallStatus::Approved,
                        all_approved,
                        "tg={tg} cc={cc} hod={hod}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_fresh_and_partially_approved_requests_are_pending() {
        assert_eq!(overall_status(Pending, Pending, Pending), OverallStatus::Pending);
        assert_eq!(overall_status(Approved, Pending, Pending), OverallStatus::Pending);
        assert_eq!(overall_status(Approved, Approved, Pending), OverallStatus::Pending);
    }

    #[test]
    fn test_late_rejection_overrides_earlier_approvals() {
        assert_eq!(
            overall_status(Approved, Approved, Rejected),
            OverallStatus::Rejected
        );
    }
}
