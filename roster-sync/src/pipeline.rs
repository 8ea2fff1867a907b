//! Shared run entrypoint used by `roster plan` and `roster sync`.
//!
//! Both reads happen before anything is planned; a failure of either aborts
//! the run with no writes.

use serde::Serialize;

use crate::apply::{apply, ApplyOutcome};
use crate::error::SyncError;
use crate::matcher::DuplicatePolicy;
use crate::ports::{SourceReader, Target, TargetReader};
use crate::reconciler::{reconcile, Plan};
use crate::summary::RunSummary;

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Plan and report, but make no writes.
    pub dry_run: bool,
    pub duplicate_policy: DuplicatePolicy,
}

/// Everything a run decided and did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub plan: Plan,
    pub outcomes: Vec<ApplyOutcome>,
    pub summary: RunSummary,
}

/// Fetch both sides and plan, without writing.
pub fn fetch_and_plan<T>(
    source: &mut dyn SourceReader,
    target: &mut T,
    policy: DuplicatePolicy,
) -> Result<Plan, SyncError>
where
    T: TargetReader + ?Sized,
{
    let source_raw = source
        .fetch_all()
        .map_err(|err| SyncError::SourceUnavailable { source: err })?;
    tracing::info!("fetched {} source records", source_raw.len());

    let target_raw = target
        .fetch_all()
        .map_err(|err| SyncError::TargetUnavailable { source: err })?;
    tracing::info!("fetched {} target records", target_raw.len());

    Ok(reconcile(&source_raw, &target_raw, policy))
}

/// Fetch, plan and apply.
///
/// Per-operation failures are reported in the returned [`RunReport`]; only
/// fetch failures return `Err`.
pub fn run(
    source: &mut dyn SourceReader,
    target: &mut dyn Target,
    options: RunOptions,
) -> Result<RunReport, SyncError> {
    let plan = fetch_and_plan(&mut *source, &mut *target, options.duplicate_policy)?;
    tracing::info!(
        "{} operations planned ({} actionable)",
        plan.operations.len(),
        plan.actionable().count()
    );

    let outcomes = apply(&plan.operations, target, options.dry_run);
    let summary = RunSummary::from_outcomes(&plan, &outcomes);
    tracing::info!("run finished: {summary}");

    Ok(RunReport {
        dry_run: options.dry_run,
        plan,
        outcomes,
        summary,
    })
}
