//! Roster core library — employee domain types, raw record shapes, normalizer.
//!
//! Public API surface:
//! - [`types`] — newtypes, enums and the normalized [`EmployeeRecord`]
//! - [`raw`] — records exactly as the HR system and the hosted app supply them
//! - [`normalize`] — raw → normalized conversion
//! - [`error`] — [`MalformedRecord`]

pub mod error;
pub mod normalize;
pub mod raw;
pub mod types;

pub use error::{MalformedReason, MalformedRecord};
pub use normalize::{normalize_source, normalize_target};
pub use raw::{RawName, RawSourceRecord, RawTargetRecord};
pub use types::{
    EmployeeId, EmployeeRecord, EmployeeStatus, EmploymentType, FieldValue, PersonName, Side,
    TrackedField,
};
