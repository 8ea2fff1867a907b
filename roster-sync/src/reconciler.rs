//! Per-id operation planning.
//!
//! [`plan`] is pure: it turns two indexes and their [`MatchSets`] into one
//! [`Operation`] per id, sorted by employee id. [`reconcile`] runs the whole
//! pure pipeline from raw records.

use std::fmt;

use serde::Serialize;

use roster_core::{
    normalize_source, normalize_target, EmployeeId, EmployeeRecord, EmployeeStatus,
    MalformedRecord, RawSourceRecord, RawTargetRecord, Side,
};

use crate::differ::{diff, Changeset};
use crate::matcher::{index, match_ids, DuplicateIdentifier, DuplicatePolicy, MatchSets, SideIndex};
use crate::status::{resolve, StatusDecision};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Why an id needs no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// Every tracked field and the status already match.
    Unchanged,
    /// The account is Separated and absent from the HR system.
    Separated,
}

/// One intended change to the hosted app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// New account from the HR record, with `status = Some(Active)`.
    Create { record: EmployeeRecord },
    /// Field changes and/or a status change for an existing account.
    Update {
        employee_id: EmployeeId,
        changes: Changeset,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<EmployeeStatus>,
    },
    /// Deactivate an account no longer present in the HR system.
    SetInactive { employee_id: EmployeeId },
    NoOp {
        employee_id: EmployeeId,
        reason: NoOpReason,
    },
}

/// Summary bucket for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Update,
    Reactivate,
    Deactivate,
    Skip,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Reactivate => write!(f, "reactivate"),
            OperationKind::Deactivate => write!(f, "deactivate"),
            OperationKind::Skip => write!(f, "skip"),
        }
    }
}

impl Operation {
    pub fn employee_id(&self) -> &EmployeeId {
        match self {
            Operation::Create { record } => &record.employee_id,
            Operation::Update { employee_id, .. }
            | Operation::SetInactive { employee_id }
            | Operation::NoOp { employee_id, .. } => employee_id,
        }
    }

    /// An update that turns the account back on counts as a reactivation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create { .. } => OperationKind::Create,
            Operation::Update {
                status: Some(EmployeeStatus::Active),
                ..
            } => OperationKind::Reactivate,
            Operation::Update { .. } => OperationKind::Update,
            Operation::SetInactive { .. } => OperationKind::Deactivate,
            Operation::NoOp { .. } => OperationKind::Skip,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Operation::NoOp { .. })
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Decide one operation per matched id, sorted by employee id.
pub fn plan(source: &SideIndex, target: &SideIndex, sets: &MatchSets) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(sets.len());

    for id in &sets.only_in_source {
        if let Some(record) = source.get(id) {
            operations.push(plan_create(record));
        }
    }

    for id in &sets.only_in_target {
        if let Some(record) = target.get(id) {
            operations.push(plan_absent(record));
        }
    }

    for id in &sets.in_both {
        if let (Some(s), Some(t)) = (source.get(id), target.get(id)) {
            operations.push(plan_matched(s, t));
        }
    }

    operations.sort_by(|a, b| a.employee_id().cmp(b.employee_id()));
    operations
}

fn plan_create(source: &EmployeeRecord) -> Operation {
    let mut record = source.clone();
    record.status = resolve(None, true).target_status();
    Operation::Create { record }
}

fn plan_absent(target: &EmployeeRecord) -> Operation {
    let employee_id = target.employee_id.clone();
    match resolve(target.status, false) {
        StatusDecision::SetInactive => Operation::SetInactive { employee_id },
        _ => Operation::NoOp {
            employee_id,
            reason: NoOpReason::Separated,
        },
    }
}

fn plan_matched(source: &EmployeeRecord, target: &EmployeeRecord) -> Operation {
    let changes = diff(source, target);
    let status = resolve(target.status, true).target_status();
    let employee_id = target.employee_id.clone();

    if changes.is_empty() && status.is_none() {
        return Operation::NoOp {
            employee_id,
            reason: NoOpReason::Unchanged,
        };
    }

    Operation::Update {
        employee_id,
        changes,
        status,
    }
}

// ---------------------------------------------------------------------------
// Full pure pipeline
// ---------------------------------------------------------------------------

/// Everything a run decided, before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub operations: Vec<Operation>,
    /// Records excluded by the normalizer.
    pub malformed: Vec<MalformedRecord>,
    pub duplicates: Vec<DuplicateIdentifier>,
}

impl Plan {
    pub fn actionable(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| !op.is_noop())
    }
}

/// Normalize, index, match and plan.
pub fn reconcile(
    source: &[RawSourceRecord],
    target: &[RawTargetRecord],
    policy: DuplicatePolicy,
) -> Plan {
    let mut malformed = Vec::new();
    let source_records = collect_valid(source.iter().map(normalize_source), &mut malformed);
    let target_records = collect_valid(target.iter().map(normalize_target), &mut malformed);

    let source_index = index(Side::Source, source_records, policy);
    let target_index = index(Side::Target, target_records, policy);
    let sets = match_ids(&source_index, &target_index);
    tracing::debug!(
        "matched {} ids: {} source-only, {} target-only, {} in both",
        sets.len(),
        sets.only_in_source.len(),
        sets.only_in_target.len(),
        sets.in_both.len()
    );

    let operations = plan(&source_index, &target_index, &sets);
    let duplicates = source_index
        .duplicates
        .into_iter()
        .chain(target_index.duplicates)
        .collect();

    Plan {
        operations,
        malformed,
        duplicates,
    }
}

fn collect_valid(
    results: impl Iterator<Item = Result<EmployeeRecord, MalformedRecord>>,
    malformed: &mut Vec<MalformedRecord>,
) -> Vec<EmployeeRecord> {
    let mut valid = Vec::new();
    for result in results {
        match result {
            Ok(record) => valid.push(record),
            Err(err) => {
                tracing::warn!("{err}");
                malformed.push(err);
            }
        }
    }
    valid
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
