//! # roster-sync
//!
//! Reconciliation of HR employee records against the hosted app.
//!
//! The pure pipeline is [`reconcile`]: normalize → [`matcher`] →
//! [`differ`] + [`status`] → [`reconciler::plan`]. [`pipeline::run`] wraps it
//! with the fetch and apply steps through the collaborator traits in
//! [`ports`].

pub mod apply;
pub mod differ;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod ports;
pub mod reconciler;
pub mod status;
pub mod summary;

pub use apply::{apply, ApplyOutcome, OperationApplyFailure};
pub use differ::{diff, Changeset};
pub use error::SyncError;
pub use matcher::{index, match_ids, DuplicateIdentifier, DuplicatePolicy, MatchSets, SideIndex};
pub use pipeline::{fetch_and_plan, run, RunOptions, RunReport};
pub use ports::{PortError, SourceReader, Target, TargetReader, TargetWriter};
pub use reconciler::{plan, reconcile, NoOpReason, Operation, OperationKind, Plan};
pub use status::{resolve, StatusDecision};
pub use summary::RunSummary;
