//! Account status transitions, driven by presence in the HR system.
//!
//! | current status | in HR | decision |
//! |---|---|---|
//! | no account | yes | `Create` |
//! | Active | yes | `Keep` |
//! | Inactive | yes | `SetActive` |
//! | Active / Inactive | no | `SetInactive` |
//! | Separated | either | `Keep` |

use serde::Serialize;

use roster_core::EmployeeStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDecision {
    /// No account yet: create one as Active.
    Create,
    /// Leave the status as it is.
    Keep,
    SetActive,
    SetInactive,
}

impl StatusDecision {
    /// The status to write, if any.
    pub fn target_status(self) -> Option<EmployeeStatus> {
        match self {
            StatusDecision::Create | StatusDecision::SetActive => Some(EmployeeStatus::Active),
            StatusDecision::SetInactive => Some(EmployeeStatus::Inactive),
            StatusDecision::Keep => None,
        }
    }
}

pub fn resolve(current: Option<EmployeeStatus>, in_source: bool) -> StatusDecision {
    match (current, in_source) {
        (Some(EmployeeStatus::Separated), _) => StatusDecision::Keep,
        (None, true) => StatusDecision::Create,
        (None, false) => StatusDecision::Keep,
        (Some(EmployeeStatus::Active), true) => StatusDecision::Keep,
        (Some(EmployeeStatus::Inactive), true) => StatusDecision::SetActive,
        (Some(EmployeeStatus::Active | EmployeeStatus::Inactive), false) => {
            StatusDecision::SetInactive
        }
    }
}
