//! Error types for roster-core.

use serde::Serialize;
use thiserror::Error;

use crate::types::Side;

/// Why a raw record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedReason {
    MissingEmployeeId,
    InvalidHireDate { raw: Option<String> },
    UnknownEmploymentType { raw: String },
    UnknownStatus { raw: String },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::MissingEmployeeId => write!(f, "missing employee id"),
            MalformedReason::InvalidHireDate { raw: None } => write!(f, "missing hire date"),
            MalformedReason::InvalidHireDate { raw: Some(raw) } => {
                write!(f, "unparsable hire date '{raw}'")
            }
            MalformedReason::UnknownEmploymentType { raw } => {
                write!(f, "unknown employment type '{raw}'")
            }
            MalformedReason::UnknownStatus { raw } => write!(f, "unknown status '{raw}'"),
        }
    }
}

/// A single raw record that failed normalization.
///
/// The record is excluded from matching and listed in the run report; the
/// rest of the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("malformed {side} record{id}: {reason}", id = display_id(.employee_id))]
pub struct MalformedRecord {
    pub side: Side,
    /// The trimmed id when one was present.
    pub employee_id: Option<String>,
    pub reason: MalformedReason,
}

fn display_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" {id}"),
        None => String::new(),
    }
}
