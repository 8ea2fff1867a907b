//! Collaborator contracts for reading both systems and writing the target.
//!
//! Implementations live outside this crate and receive their credentials at
//! construction; nothing here touches the network or the environment.

use roster_core::{EmployeeId, EmployeeRecord, EmployeeStatus, RawSourceRecord, RawTargetRecord};

use crate::differ::Changeset;

/// Boxed error returned by any collaborator.
pub type PortError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reads every employee from the HR system.
pub trait SourceReader {
    fn fetch_all(&mut self) -> Result<Vec<RawSourceRecord>, PortError>;
}

/// Reads every account from the hosted app.
pub trait TargetReader {
    fn fetch_all(&mut self) -> Result<Vec<RawTargetRecord>, PortError>;
}

/// Mutates accounts in the hosted app. One call per operation; no retries.
pub trait TargetWriter {
    /// Create a new account. `record.status` is the status to create with.
    fn create(&mut self, record: &EmployeeRecord) -> Result<(), PortError>;

    /// Write the given field values onto an existing account.
    fn update(&mut self, employee_id: &EmployeeId, changes: &Changeset) -> Result<(), PortError>;

    fn set_status(&mut self, employee_id: &EmployeeId, status: EmployeeStatus)
        -> Result<(), PortError>;
}

/// A hosted app client that can both read and write.
pub trait Target: TargetReader + TargetWriter {}

impl<T: TargetReader + TargetWriter> Target for T {}
