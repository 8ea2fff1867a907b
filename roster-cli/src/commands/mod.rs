pub mod check;
pub mod plan;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use roster_connectors::{KnackClient, SnapshotSource, SnapshotTarget};
use roster_sync::{DuplicatePolicy, SourceReader, Target};

use crate::config::RosterConfig;

/// Where records come from and go to; shared by `plan` and `sync`.
#[derive(Args, Debug)]
pub struct EndpointArgs {
    /// Read HR rows from a JSON file instead of Banner.
    #[arg(long, value_name = "FILE")]
    pub source_file: Option<PathBuf>,

    /// Use a JSON snapshot of accounts instead of Knack. `sync` writes the
    /// result back to the file.
    #[arg(long, value_name = "FILE")]
    pub target_file: Option<PathBuf>,

    /// Duplicate id handling: reject, keep-first or keep-last.
    #[arg(long, value_name = "POLICY")]
    pub duplicates: Option<DuplicatePolicy>,
}

impl EndpointArgs {
    pub fn policy(&self, config: &RosterConfig) -> DuplicatePolicy {
        self.duplicates.unwrap_or(config.duplicate_policy)
    }

    pub fn source(&self, config: &RosterConfig) -> Result<Box<dyn SourceReader>> {
        match &self.source_file {
            Some(path) => Ok(Box::new(SnapshotSource::new(path))),
            None => Ok(Box::new(
                config.banner_client().context("Banner is not configured")?,
            )),
        }
    }

    pub fn target(&self, config: &RosterConfig) -> Result<TargetEndpoint> {
        match &self.target_file {
            Some(path) => {
                let target = SnapshotTarget::load(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                Ok(TargetEndpoint::Snapshot {
                    target,
                    path: path.clone(),
                })
            }
            None => Ok(TargetEndpoint::Knack(
                config.knack_client().context("Knack is not configured")?,
            )),
        }
    }
}

/// The account store a command runs against.
pub enum TargetEndpoint {
    Knack(KnackClient),
    Snapshot {
        target: SnapshotTarget,
        path: PathBuf,
    },
}

impl TargetEndpoint {
    pub fn as_target(&mut self) -> &mut dyn Target {
        match self {
            TargetEndpoint::Knack(client) => client,
            TargetEndpoint::Snapshot { target, .. } => target,
        }
    }

    /// Persist snapshot writes. Knack writes are already live.
    pub fn finish(&self) -> Result<()> {
        if let TargetEndpoint::Snapshot { target, path } = self {
            if !target.journal().is_empty() {
                target
                    .save(path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!("wrote {} changes to {}", target.journal().len(), path.display());
            }
        }
        Ok(())
    }
}
