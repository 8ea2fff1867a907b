//! Domain types for employee reconciliation.
//!
//! Every record that reaches matching is an [`EmployeeRecord`]: trimmed text,
//! a calendar `hire_date`, and enum-encoded employment type and status.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable employee identifier shared by both systems.
///
/// Matching is exact, case-sensitive string equality. The normalizer only
/// builds values that are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which system a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Temporary,
    #[default]
    FullTime,
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmploymentType::Temporary => write!(f, "temporary"),
            EmploymentType::FullTime => write!(f, "full_time"),
        }
    }
}

/// Account status as recorded by the hosted app.
///
/// `Separated` is terminal: reconciliation never moves a record out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Separated,
}

impl EmployeeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, EmployeeStatus::Separated)
    }

    /// Lowercase wire form used by the hosted app.
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Separated => "separated",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven attributes compared between the two systems.
///
/// Declaration order is the order changesets iterate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    EmploymentType,
    JobTitle,
    Email,
    DivisionName,
    FullName,
    PositionNumber,
    HireDate,
}

impl TrackedField {
    pub const ALL: [TrackedField; 7] = [
        TrackedField::EmploymentType,
        TrackedField::JobTitle,
        TrackedField::Email,
        TrackedField::DivisionName,
        TrackedField::FullName,
        TrackedField::PositionNumber,
        TrackedField::HireDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackedField::EmploymentType => "employment_type",
            TrackedField::JobTitle => "job_title",
            TrackedField::Email => "email",
            TrackedField::DivisionName => "division_name",
            TrackedField::FullName => "full_name",
            TrackedField::PositionNumber => "position_number",
            TrackedField::HireDate => "hire_date",
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// A name held as the first/last pair the hosted app stores.
///
/// Equality and `Display` use the joined `"First Last"` form; the split is
/// what gets written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    /// Whitespace inside each part is collapsed.
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: collapse(first),
            last: collapse(last),
        }
    }

    pub fn full(&self) -> String {
        match (self.first.is_empty(), self.last.is_empty()) {
            (true, _) => self.last.clone(),
            (_, true) => self.first.clone(),
            _ => format!("{} {}", self.first, self.last),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }
}

/// A single string is split on its last space: `"Mary Ann Smith"` →
/// `Mary Ann` / `Smith`, `"Cher"` → `""` / `Cher`.
impl From<&str> for PersonName {
    fn from(full: &str) -> Self {
        let full = collapse(full);
        match full.rsplit_once(' ') {
            Some((first, last)) => Self::new(first, last),
            None => Self::new("", &full),
        }
    }
}

impl From<String> for PersonName {
    fn from(full: String) -> Self {
        Self::from(full.as_str())
    }
}

impl PartialEq for PersonName {
    fn eq(&self, other: &Self) -> bool {
        self.full() == other.full()
    }
}

impl Eq for PersonName {}

impl PartialEq<str> for PersonName {
    fn eq(&self, other: &str) -> bool {
        self.full() == other
    }
}

impl PartialEq<&str> for PersonName {
    fn eq(&self, other: &&str) -> bool {
        self.full() == *other
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

pub(crate) fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The normalized value of one tracked field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Name(PersonName),
    Date(NaiveDate),
    EmploymentType(EmploymentType),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Name(n) => n.fmt(f),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::EmploymentType(t) => t.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized record
// ---------------------------------------------------------------------------

/// A normalized employee snapshot from either side.
///
/// `status` is `Some` only for records read from the hosted app; HR records
/// carry no status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub full_name: PersonName,
    pub job_title: String,
    pub email: String,
    pub division_name: String,
    pub position_number: String,
    pub hire_date: NaiveDate,
    pub employment_type: EmploymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

impl EmployeeRecord {
    /// Current value of a tracked field.
    pub fn field(&self, field: TrackedField) -> FieldValue {
        match field {
            TrackedField::EmploymentType => FieldValue::EmploymentType(self.employment_type),
            TrackedField::JobTitle => FieldValue::Text(self.job_title.clone()),
            TrackedField::Email => FieldValue::Text(self.email.clone()),
            TrackedField::DivisionName => FieldValue::Text(self.division_name.clone()),
            TrackedField::FullName => FieldValue::Name(self.full_name.clone()),
            TrackedField::PositionNumber => FieldValue::Text(self.position_number.clone()),
            TrackedField::HireDate => FieldValue::Date(self.hire_date),
        }
    }

    /// Overwrite a tracked field.
    ///
    /// Returns `false` and leaves the record untouched when the value kind
    /// does not fit the field.
    pub fn set_field(&mut self, field: TrackedField, value: FieldValue) -> bool {
        match (field, value) {
            (TrackedField::EmploymentType, FieldValue::EmploymentType(t)) => {
                self.employment_type = t
            }
            (TrackedField::HireDate, FieldValue::Date(d)) => self.hire_date = d,
            (TrackedField::JobTitle, FieldValue::Text(s)) => self.job_title = s,
            (TrackedField::Email, FieldValue::Text(s)) => self.email = s,
            (TrackedField::DivisionName, FieldValue::Text(s)) => self.division_name = s,
            (TrackedField::FullName, FieldValue::Name(n)) => self.full_name = n,
            (TrackedField::PositionNumber, FieldValue::Text(s)) => self.position_number = s,
            _ => return false,
        }
        true
    }

    /// `(first, last)` as they will be written.
    pub fn name_parts(&self) -> (&str, &str) {
        (&self.full_name.first, &self.full_name.last)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::from("1001"),
            full_name: PersonName::new("Jane", "Doe"),
            job_title: "Engineer".to_string(),
            email: "jane@x.org".to_string(),
            division_name: "Transportation".to_string(),
            position_number: "T-100".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            employment_type: EmploymentType::FullTime,
            status: None,
        }
    }

    #[test]
    fn employee_id_orders_lexically() {
        let mut ids = vec![EmployeeId::from("b"), EmployeeId::from("a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }

    #[test]
    fn field_and_set_field_agree() {
        let mut r = record();
        for field in TrackedField::ALL {
            let value = r.field(field);
            assert!(r.set_field(field, value.clone()));
            assert_eq!(r.field(field), value);
        }
    }

    #[test]
    fn set_field_rejects_mismatched_kind() {
        let mut r = record();
        let ok = r.set_field(TrackedField::HireDate, FieldValue::Text("soon".into()));
        assert!(!ok);
        assert_eq!(r, record());
    }

    #[test]
    fn single_string_names_split_on_last_space() {
        let mut r = record();
        assert_eq!(r.name_parts(), ("Jane", "Doe"));
        r.full_name = "Mary Ann  Smith".into();
        assert_eq!(r.name_parts(), ("Mary Ann", "Smith"));
        r.full_name = "Cher".into();
        assert_eq!(r.name_parts(), ("", "Cher"));
    }

    #[test]
    fn names_compare_on_the_joined_form() {
        let hr = PersonName::new("Jan", "Van Der Berg");
        assert_eq!(hr, "Jan Van Der Berg");
        assert_eq!(hr, PersonName::from("Jan Van Der Berg"));
        assert_eq!(hr.last, "Van Der Berg");
        assert_eq!(FieldValue::Name(hr).to_string(), "Jan Van Der Berg");
        assert!(PersonName::default().is_empty());
    }

    #[test]
    fn status_wire_form_is_lowercase() {
        assert_eq!(EmployeeStatus::Separated.to_string(), "separated");
        assert!(EmployeeStatus::Separated.is_terminal());
        assert!(!EmployeeStatus::Inactive.is_terminal());
    }

    #[test]
    fn date_value_displays_iso() {
        let v = FieldValue::Date(NaiveDate::from_ymd_opt(2020, 1, 5).unwrap());
        assert_eq!(v.to_string(), "2020-01-05");
    }
}
