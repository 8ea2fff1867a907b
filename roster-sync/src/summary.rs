//! Counts shown at the end of a run.

use serde::Serialize;

use crate::apply::ApplyOutcome;
use crate::reconciler::{OperationKind, Plan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub created: usize,
    pub updated: usize,
    pub deactivated: usize,
    pub reactivated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

impl RunSummary {
    /// Count outcomes by the kind of operation they carried.
    ///
    /// Dry-run outcomes count as if applied.
    pub fn from_outcomes(plan: &Plan, outcomes: &[ApplyOutcome]) -> Self {
        let mut summary = RunSummary {
            malformed: plan.malformed.len(),
            duplicates: plan.duplicates.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                ApplyOutcome::Applied { kind, .. } | ApplyOutcome::WouldApply { kind, .. } => {
                    summary.count(*kind)
                }
                ApplyOutcome::Skipped { .. } => summary.skipped += 1,
                ApplyOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Count a plan's operations, before anything is applied.
    pub fn from_plan(plan: &Plan) -> Self {
        let mut summary = RunSummary {
            malformed: plan.malformed.len(),
            duplicates: plan.duplicates.len(),
            ..Default::default()
        };
        for op in &plan.operations {
            summary.count(op.kind());
        }
        summary
    }

    fn count(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Create => self.created += 1,
            OperationKind::Update => self.updated += 1,
            OperationKind::Reactivate => self.reactivated += 1,
            OperationKind::Deactivate => self.deactivated += 1,
            OperationKind::Skip => self.skipped += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deactivated, {} reactivated, {} skipped, {} failed",
            self.created, self.updated, self.deactivated, self.reactivated, self.skipped, self.failed
        )?;
        if self.malformed > 0 || self.duplicates > 0 {
            write!(
                f,
                " ({} malformed, {} duplicate ids)",
                self.malformed, self.duplicates
            )?;
        }
        Ok(())
    }
}
