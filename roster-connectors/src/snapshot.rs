//! JSON snapshot files standing in for either system.
//!
//! A source snapshot is a JSON array of HR rows; a target snapshot is a
//! JSON array of [`RawTargetRecord`]. [`SnapshotTarget`] applies writes to
//! its in-memory copy, journals each one, and can save the result back with
//! the same `.tmp` + rename pattern used for every file we write.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use roster_core::{
    EmployeeId, EmployeeRecord, EmployeeStatus, FieldValue, RawName, RawSourceRecord,
    RawTargetRecord, TrackedField,
};
use roster_sync::{Changeset, PortError, SourceReader, TargetReader, TargetWriter};

use crate::error::{decode_err, io_err, ConnectorError};

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConnectorError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|e| decode_err(path.display().to_string(), e))
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// HR rows read from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceReader for SnapshotSource {
    fn fetch_all(&mut self) -> Result<Vec<RawSourceRecord>, PortError> {
        let records: Vec<RawSourceRecord> = read_json(&self.path)?;
        tracing::debug!("read {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// One write received by a [`SnapshotTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum JournalEntry {
    Create {
        record: EmployeeRecord,
    },
    Update {
        employee_id: EmployeeId,
        changes: Changeset,
    },
    SetStatus {
        employee_id: EmployeeId,
        status: EmployeeStatus,
    },
}

/// Hosted-app accounts held in memory, optionally loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTarget {
    records: Vec<RawTargetRecord>,
    journal: Vec<JournalEntry>,
}

impl SnapshotTarget {
    pub fn new(records: Vec<RawTargetRecord>) -> Self {
        Self {
            records,
            journal: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConnectorError> {
        Ok(Self::new(read_json(path)?))
    }

    pub fn records(&self) -> &[RawTargetRecord] {
        &self.records
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Write the current records to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConnectorError> {
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| decode_err("target snapshot", e))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
        Ok(())
    }

    fn find_mut(&mut self, employee_id: &EmployeeId) -> Result<&mut RawTargetRecord, ConnectorError> {
        self.records
            .iter_mut()
            .find(|r| r.employee_id.as_deref().map(str::trim) == Some(employee_id.as_str()))
            .ok_or_else(|| ConnectorError::UnknownRecord(employee_id.clone()))
    }
}

impl TargetReader for SnapshotTarget {
    fn fetch_all(&mut self) -> Result<Vec<RawTargetRecord>, PortError> {
        Ok(self.records.clone())
    }
}

impl TargetWriter for SnapshotTarget {
    fn create(&mut self, record: &EmployeeRecord) -> Result<(), PortError> {
        let mut raw = RawTargetRecord {
            record_id: Some(format!("snapshot-{}", self.records.len() + 1)),
            employee_id: Some(record.employee_id.to_string()),
            status: Some(record.status.unwrap_or(EmployeeStatus::Active).to_string()),
            ..Default::default()
        };
        for field in TrackedField::ALL {
            set_raw_field(&mut raw, field, &record.field(field));
        }
        self.records.push(raw);
        self.journal.push(JournalEntry::Create {
            record: record.clone(),
        });
        Ok(())
    }

    fn update(&mut self, employee_id: &EmployeeId, changes: &Changeset) -> Result<(), PortError> {
        let raw = self.find_mut(employee_id)?;
        for (field, value) in changes.iter() {
            set_raw_field(raw, field, value);
        }
        self.journal.push(JournalEntry::Update {
            employee_id: employee_id.clone(),
            changes: changes.clone(),
        });
        Ok(())
    }

    fn set_status(&mut self, employee_id: &EmployeeId, status: EmployeeStatus) -> Result<(), PortError> {
        self.find_mut(employee_id)?.status = Some(status.to_string());
        self.journal.push(JournalEntry::SetStatus {
            employee_id: employee_id.clone(),
            status,
        });
        Ok(())
    }
}

fn set_raw_field(raw: &mut RawTargetRecord, field: TrackedField, value: &FieldValue) {
    if let FieldValue::Name(name) = value {
        raw.name = Some(RawName::Parts {
            first: name.first.clone(),
            last: name.last.clone(),
        });
        return;
    }
    let text = match value {
        FieldValue::Date(date) => iso_date(*date),
        other => other.to_string(),
    };
    match field {
        TrackedField::EmploymentType => raw.employment_type = Some(text),
        TrackedField::JobTitle => raw.job_title = Some(text),
        TrackedField::Email => raw.email = Some(text),
        TrackedField::DivisionName => raw.division_name = Some(text),
        TrackedField::PositionNumber => raw.position_number = Some(text),
        TrackedField::HireDate => raw.hire_date = Some(text),
        TrackedField::FullName => raw.name = Some(RawName::Full(text)),
    }
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{normalize_target, EmploymentType, PersonName};
    use tempfile::TempDir;

    fn record(id: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: id.into(),
            full_name: "Jane Doe".into(),
            job_title: "Engineer".into(),
            email: "jane@x.org".into(),
            division_name: "Transportation".into(),
            position_number: "T-100".into(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            employment_type: EmploymentType::Temporary,
            status: Some(EmployeeStatus::Active),
        }
    }

    #[test]
    fn created_accounts_normalize_back_to_the_same_record() {
        let mut target = SnapshotTarget::default();
        target.create(&record("1")).unwrap();
        let stored = normalize_target(&target.records()[0]).unwrap();
        assert_eq!(stored, record("1"));
        assert_eq!(target.journal().len(), 1);
    }

    #[test]
    fn update_and_status_edit_in_place() {
        let mut target = SnapshotTarget::default();
        target.create(&record("1")).unwrap();

        let changes: Changeset = [(TrackedField::JobTitle, FieldValue::Text("Tech II".into()))]
            .into_iter()
            .collect();
        target.update(&"1".into(), &changes).unwrap();
        target
            .set_status(&"1".into(), EmployeeStatus::Inactive)
            .unwrap();

        let raw = &target.records()[0];
        assert_eq!(raw.job_title.as_deref(), Some("Tech II"));
        assert_eq!(raw.status.as_deref(), Some("inactive"));
        assert_eq!(target.journal().len(), 3);
    }

    #[test]
    fn name_changes_store_first_and_last() {
        let mut target = SnapshotTarget::default();
        target.create(&record("1")).unwrap();

        let renamed = PersonName::new("Jan", "Van Der Berg");
        let changes: Changeset = [(TrackedField::FullName, FieldValue::Name(renamed))]
            .into_iter()
            .collect();
        target.update(&"1".into(), &changes).unwrap();

        assert_eq!(
            target.records()[0].name,
            Some(RawName::Parts {
                first: "Jan".into(),
                last: "Van Der Berg".into()
            })
        );
        let stored = normalize_target(&target.records()[0]).unwrap();
        assert_eq!(stored.name_parts(), ("Jan", "Van Der Berg"));
    }

    #[test]
    fn writes_to_unknown_ids_fail() {
        let mut target = SnapshotTarget::default();
        let err = target
            .set_status(&"nope".into(), EmployeeStatus::Inactive)
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("target.json");
        let mut target = SnapshotTarget::default();
        target.create(&record("1")).unwrap();
        target.save(&path).unwrap();

        let loaded = SnapshotTarget::load(&path).unwrap();
        assert_eq!(loaded.records(), target.records());
        assert!(loaded.journal().is_empty());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_source_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let mut source = SnapshotSource::new(tmp.path().join("absent.json"));
        let err = source.fetch_all().unwrap_err();
        assert!(err.to_string().starts_with("I/O error at"));
    }
}
