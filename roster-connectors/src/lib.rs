//! # roster-connectors
//!
//! Concrete readers and writers for the collaborator traits in
//! `roster_sync::ports`:
//! - [`banner::BannerClient`] reads the HR system
//! - [`knack::KnackClient`] reads and writes the hosted app
//! - [`snapshot`] stands in for either side with JSON files

pub mod banner;
pub mod error;
pub mod knack;
pub mod password;
pub mod snapshot;

pub use banner::BannerClient;
pub use error::ConnectorError;
pub use knack::{KnackClient, KnackFieldMap};
pub use snapshot::{JournalEntry, SnapshotSource, SnapshotTarget};
