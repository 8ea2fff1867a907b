//! Field-level comparison of a matched pair.
//!
//! Comparison is one-directional: the changeset holds the HR system's value
//! for every tracked field that differs, and nothing else. The hosted app's
//! differing value is discarded.

use std::collections::BTreeMap;

use serde::Serialize;

use roster_core::{EmployeeRecord, FieldValue, TrackedField};

/// Tracked fields to overwrite, with the values to write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Changeset(BTreeMap<TrackedField, FieldValue>);

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: TrackedField, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: TrackedField) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: TrackedField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackedField, &FieldValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }

    pub fn fields(&self) -> impl Iterator<Item = TrackedField> + '_ {
        self.0.keys().copied()
    }

    /// Write every value onto `record`.
    pub fn apply_to(&self, record: &mut EmployeeRecord) {
        for (field, value) in self.iter() {
            record.set_field(field, value.clone());
        }
    }
}

impl FromIterator<(TrackedField, FieldValue)> for Changeset {
    fn from_iter<I: IntoIterator<Item = (TrackedField, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compare the seven tracked fields of a matched pair.
///
/// `source` and `target` are expected to share an employee id; status and
/// any other attribute are ignored.
pub fn diff(source: &EmployeeRecord, target: &EmployeeRecord) -> Changeset {
    debug_assert_eq!(source.employee_id, target.employee_id);
    TrackedField::ALL
        .into_iter()
        .filter_map(|field| {
            let wanted = source.field(field);
            (wanted != target.field(field)).then_some((field, wanted))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_core::{EmployeeId, EmployeeStatus, EmploymentType};

    fn base() -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::from("1005"),
            full_name: "Sam Lee".into(),
            job_title: "Tech I".into(),
            email: "sam@x.org".into(),
            division_name: "Signals".into(),
            position_number: "S-7".into(),
            hire_date: NaiveDate::from_ymd_opt(2019, 6, 3).unwrap(),
            employment_type: EmploymentType::FullTime,
            status: None,
        }
    }

    #[test]
    fn identical_records_yield_empty_changeset() {
        assert!(diff(&base(), &base()).is_empty());
    }

    #[test]
    fn status_and_other_attributes_are_ignored() {
        let mut target = base();
        target.status = Some(EmployeeStatus::Separated);
        assert!(diff(&base(), &target).is_empty());
    }

    #[test]
    fn changeset_holds_source_values_only_for_differing_fields() {
        let mut source = base();
        source.job_title = "Tech II".into();
        source.hire_date = NaiveDate::from_ymd_opt(2019, 6, 4).unwrap();
        source.employment_type = EmploymentType::Temporary;

        let changes = diff(&source, &base());
        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes.get(TrackedField::JobTitle),
            Some(&FieldValue::Text("Tech II".into()))
        );
        assert_eq!(
            changes.get(TrackedField::HireDate),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2019, 6, 4).unwrap()))
        );
        assert_eq!(
            changes.get(TrackedField::EmploymentType),
            Some(&FieldValue::EmploymentType(EmploymentType::Temporary))
        );
        assert!(!changes.contains(TrackedField::Email));
    }

    #[test]
    fn every_tracked_field_is_compared() {
        for field in TrackedField::ALL {
            let mut source = base();
            let changed = match field {
                TrackedField::HireDate => {
                    FieldValue::Date(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap())
                }
                TrackedField::EmploymentType => {
                    FieldValue::EmploymentType(EmploymentType::Temporary)
                }
                TrackedField::FullName => FieldValue::Name("Changed Name".into()),
                _ => FieldValue::Text("changed".into()),
            };
            assert!(source.set_field(field, changed));
            let changes = diff(&source, &base());
            assert_eq!(changes.fields().collect::<Vec<_>>(), vec![field]);
        }
    }

    #[test]
    fn applying_a_changeset_converges() {
        let mut source = base();
        source.email = "sam.lee@x.org".into();
        source.division_name = "Traffic".into();
        let mut target = base();
        target.status = Some(EmployeeStatus::Active);

        let changes = diff(&source, &target);
        changes.apply_to(&mut target);
        assert!(diff(&source, &target).is_empty());
        assert_eq!(target.status, Some(EmployeeStatus::Active));
    }

    #[test]
    fn comparison_is_exact() {
        let mut source = base();
        source.job_title = "tech i".into();
        assert!(diff(&source, &base()).contains(TrackedField::JobTitle));
    }

    #[test]
    fn serializes_as_field_name_map() {
        let mut source = base();
        source.job_title = "Tech II".into();
        let json = serde_json::to_value(diff(&source, &base())).unwrap();
        assert_eq!(json, serde_json::json!({ "job_title": "Tech II" }));
    }
}
