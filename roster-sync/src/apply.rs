//! Applying a plan through a [`TargetWriter`].
//!
//! ## Per-operation protocol
//!
//! 1. `NoOp` → [`ApplyOutcome::Skipped`], no call.
//! 2. `--dry-run` → [`ApplyOutcome::WouldApply`], no call.
//! 3. `Create` → `create(record)`.
//! 4. `Update` → `update(id, changes)` when there are field changes, then
//!    `set_status(id, status)` when the status changes.
//! 5. `SetInactive` → `set_status(id, Inactive)`.
//!
//! A failed call is recorded as [`ApplyOutcome::Failed`] and the remaining
//! operations still run. Nothing is retried.

use std::fmt;

use serde::Serialize;

use roster_core::{EmployeeId, EmployeeStatus};

use crate::ports::{PortError, TargetWriter};
use crate::reconciler::{Operation, OperationKind};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A write that the hosted app rejected or that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationApplyFailure {
    pub employee_id: EmployeeId,
    pub kind: OperationKind,
    pub message: String,
}

impl fmt::Display for OperationApplyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed: {}", self.kind, self.employee_id, self.message)
    }
}

/// Outcome of an individual operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// Every call for the operation succeeded.
    Applied {
        employee_id: EmployeeId,
        kind: OperationKind,
    },
    /// `--dry-run` mode: the operation *would* have been applied.
    WouldApply {
        employee_id: EmployeeId,
        kind: OperationKind,
    },
    /// The operation was a no-op.
    Skipped { employee_id: EmployeeId },
    Failed(OperationApplyFailure),
}

impl ApplyOutcome {
    pub fn employee_id(&self) -> &EmployeeId {
        match self {
            ApplyOutcome::Applied { employee_id, .. }
            | ApplyOutcome::WouldApply { employee_id, .. }
            | ApplyOutcome::Skipped { employee_id } => employee_id,
            ApplyOutcome::Failed(failure) => &failure.employee_id,
        }
    }

    pub fn failure(&self) -> Option<&OperationApplyFailure> {
        match self {
            ApplyOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Apply every operation in order, one outcome per operation.
pub fn apply<W>(operations: &[Operation], writer: &mut W, dry_run: bool) -> Vec<ApplyOutcome>
where
    W: TargetWriter + ?Sized,
{
    let mut outcomes = Vec::with_capacity(operations.len());
    for op in operations {
        outcomes.push(apply_one(op, &mut *writer, dry_run));
    }
    outcomes
}

fn apply_one<W>(op: &Operation, writer: &mut W, dry_run: bool) -> ApplyOutcome
where
    W: TargetWriter + ?Sized,
{
    let employee_id = op.employee_id().clone();
    let kind = op.kind();

    if op.is_noop() {
        tracing::debug!("unchanged: {employee_id}");
        return ApplyOutcome::Skipped { employee_id };
    }

    if dry_run {
        tracing::info!("[dry-run] would {kind}: {employee_id}");
        return ApplyOutcome::WouldApply { employee_id, kind };
    }

    match dispatch(op, writer) {
        Ok(()) => {
            tracing::info!("{kind}: {employee_id}");
            ApplyOutcome::Applied { employee_id, kind }
        }
        Err(err) => {
            let failure = OperationApplyFailure {
                employee_id,
                kind,
                message: err.to_string(),
            };
            tracing::error!("{failure}");
            ApplyOutcome::Failed(failure)
        }
    }
}

fn dispatch<W>(op: &Operation, writer: &mut W) -> Result<(), PortError>
where
    W: TargetWriter + ?Sized,
{
    match op {
        Operation::Create { record } => writer.create(record),
        Operation::Update {
            employee_id,
            changes,
            status,
        } => {
            if !changes.is_empty() {
                writer.update(employee_id, changes)?;
            }
            if let Some(status) = status {
                writer.set_status(employee_id, *status)?;
            }
            Ok(())
        }
        Operation::SetInactive { employee_id } => {
            writer.set_status(employee_id, EmployeeStatus::Inactive)
        }
        Operation::NoOp { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::Changeset;
    use chrono::NaiveDate;
    use roster_core::{EmployeeRecord, EmploymentType, FieldValue, TrackedField};

    /// Records every call; fails any call for ids listed in `fail_ids`.
    #[derive(Default)]
    struct RecordingWriter {
        calls: Vec<String>,
        fail_ids: Vec<&'static str>,
    }

    impl RecordingWriter {
        fn check(&self, id: &EmployeeId) -> Result<(), PortError> {
            if self.fail_ids.iter().any(|f| *f == id.as_str()) {
                return Err(format!("rejected {id}").into());
            }
            Ok(())
        }
    }

    impl TargetWriter for RecordingWriter {
        fn create(&mut self, record: &EmployeeRecord) -> Result<(), PortError> {
            self.check(&record.employee_id)?;
            self.calls.push(format!("create {}", record.employee_id));
            Ok(())
        }

        fn update(&mut self, id: &EmployeeId, changes: &Changeset) -> Result<(), PortError> {
            self.check(id)?;
            self.calls.push(format!("update {id} {}", changes.len()));
            Ok(())
        }

        fn set_status(&mut self, id: &EmployeeId, status: EmployeeStatus) -> Result<(), PortError> {
            self.check(id)?;
            self.calls.push(format!("status {id} {status}"));
            Ok(())
        }
    }

    fn record(id: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::from(id),
            full_name: "Jane Doe".into(),
            job_title: "Engineer".into(),
            email: "jane@x.org".into(),
            division_name: "Transportation".into(),
            position_number: "T-100".into(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            employment_type: EmploymentType::FullTime,
            status: Some(EmployeeStatus::Active),
        }
    }

    fn title_change() -> Changeset {
        [(TrackedField::JobTitle, FieldValue::Text("Tech II".into()))]
            .into_iter()
            .collect()
    }

    fn operations() -> Vec<Operation> {
        vec![
            Operation::Create {
                record: record("1"),
            },
            Operation::Update {
                employee_id: "2".into(),
                changes: title_change(),
                status: Some(EmployeeStatus::Active),
            },
            Operation::Update {
                employee_id: "3".into(),
                changes: Changeset::new(),
                status: Some(EmployeeStatus::Active),
            },
            Operation::SetInactive {
                employee_id: "4".into(),
            },
            Operation::NoOp {
                employee_id: "5".into(),
                reason: crate::reconciler::NoOpReason::Unchanged,
            },
        ]
    }

    #[test]
    fn dispatches_each_operation_to_the_right_calls() {
        let mut writer = RecordingWriter::default();
        let outcomes = apply(&operations(), &mut writer, false);

        assert_eq!(
            writer.calls,
            [
                "create 1",
                "update 2 1",
                "status 2 active",
                "status 3 active",
                "status 4 inactive",
            ]
        );
        assert!(matches!(outcomes[0], ApplyOutcome::Applied { kind: OperationKind::Create, .. }));
        assert!(matches!(
            outcomes[2],
            ApplyOutcome::Applied {
                kind: OperationKind::Reactivate,
                ..
            }
        ));
        assert!(matches!(outcomes[4], ApplyOutcome::Skipped { .. }));
    }

    #[test]
    fn dry_run_makes_no_calls() {
        let mut writer = RecordingWriter::default();
        let outcomes = apply(&operations(), &mut writer, true);
        assert!(writer.calls.is_empty(), "dry-run must not write");
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, ApplyOutcome::WouldApply { .. }))
                .count(),
            4
        );
    }

    #[test]
    fn failure_is_reported_and_batch_continues() {
        let mut writer = RecordingWriter {
            fail_ids: vec!["2"],
            ..Default::default()
        };
        let outcomes = apply(&operations(), &mut writer, false);

        let failure = outcomes[1].failure().expect("failure for 2");
        assert_eq!(failure.employee_id.as_str(), "2");
        assert_eq!(failure.kind, OperationKind::Reactivate);
        assert_eq!(failure.message, "rejected 2");
        assert!(writer.calls.contains(&"status 4 inactive".to_string()));
        assert_eq!(outcomes.iter().filter_map(ApplyOutcome::failure).count(), 1);
    }
}
