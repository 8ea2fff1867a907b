//! Error types for roster-sync.

use thiserror::Error;

use crate::ports::PortError;

/// Run-level failures. Either one aborts the run before any write.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The HR system could not be read.
    #[error("source unavailable: {source}")]
    SourceUnavailable {
        #[source]
        source: PortError,
    },

    /// The hosted app could not be read.
    #[error("target unavailable: {source}")]
    TargetUnavailable {
        #[source]
        source: PortError,
    },
}
