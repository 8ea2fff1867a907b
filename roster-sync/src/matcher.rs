//! Indexing by employee id and three-way classification.
//!
//! Each side is indexed into a `BTreeMap` so every later step iterates in id
//! order. Duplicate ids within one side are never resolved silently: they are
//! reported as [`DuplicateIdentifier`] warnings and handled according to the
//! configured [`DuplicatePolicy`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use roster_core::{EmployeeId, EmployeeRecord, Side};

// ---------------------------------------------------------------------------
// Duplicate handling
// ---------------------------------------------------------------------------

/// What to do when one side lists the same employee id more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Withhold the id from the whole run, on both sides.
    #[default]
    Reject,
    /// Keep the first occurrence in fetch order.
    KeepFirst,
    /// Keep the last occurrence in fetch order.
    KeepLast,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "reject" => Ok(Self::Reject),
            "keep-first" => Ok(Self::KeepFirst),
            "keep-last" => Ok(Self::KeepLast),
            other => Err(format!(
                "unknown duplicate policy '{other}'; expected: reject, keep-first, keep-last"
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::KeepFirst => write!(f, "keep-first"),
            DuplicatePolicy::KeepLast => write!(f, "keep-last"),
        }
    }
}

/// Warning: `employee_id` appeared `occurrences` times on `side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateIdentifier {
    pub side: Side,
    pub employee_id: EmployeeId,
    pub occurrences: usize,
    pub policy: DuplicatePolicy,
}

impl fmt::Display for DuplicateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate {} id {} ({} records, policy {})",
            self.side, self.employee_id, self.occurrences, self.policy
        )
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// One side's records keyed by employee id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideIndex {
    pub side: Side,
    pub records: BTreeMap<EmployeeId, EmployeeRecord>,
    pub duplicates: Vec<DuplicateIdentifier>,
}

impl SideIndex {
    pub fn get(&self, id: &EmployeeId) -> Option<&EmployeeRecord> {
        self.records.get(id)
    }

    /// Ids withheld from matching because of a rejected duplicate.
    pub fn quarantined(&self) -> impl Iterator<Item = &EmployeeId> {
        self.duplicates
            .iter()
            .filter(|d| d.policy == DuplicatePolicy::Reject)
            .map(|d| &d.employee_id)
    }
}

/// Index normalized records by id, applying `policy` to duplicates.
pub fn index(side: Side, records: Vec<EmployeeRecord>, policy: DuplicatePolicy) -> SideIndex {
    let mut grouped: BTreeMap<EmployeeId, Vec<EmployeeRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.employee_id.clone())
            .or_default()
            .push(record);
    }

    let mut index = BTreeMap::new();
    let mut duplicates = Vec::new();
    for (id, mut group) in grouped {
        if group.len() > 1 {
            let warning = DuplicateIdentifier {
                side,
                employee_id: id.clone(),
                occurrences: group.len(),
                policy,
            };
            tracing::warn!("{warning}");
            duplicates.push(warning);
        }

        let kept = match (group.len(), policy) {
            (1, _) | (_, DuplicatePolicy::KeepLast) => group.pop(),
            (_, DuplicatePolicy::KeepFirst) => group.into_iter().next(),
            (_, DuplicatePolicy::Reject) => None,
        };
        if let Some(record) = kept {
            index.insert(id, record);
        }
    }

    SideIndex {
        side,
        records: index,
        duplicates,
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// Disjoint classification of every matchable id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSets {
    pub only_in_source: BTreeSet<EmployeeId>,
    pub only_in_target: BTreeSet<EmployeeId>,
    pub in_both: BTreeSet<EmployeeId>,
}

impl MatchSets {
    pub fn len(&self) -> usize {
        self.only_in_source.len() + self.only_in_target.len() + self.in_both.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify ids by exact, case-sensitive equality.
///
/// Ids quarantined on either side appear in none of the three sets.
pub fn match_ids(source: &SideIndex, target: &SideIndex) -> MatchSets {
    let quarantined: BTreeSet<&EmployeeId> =
        source.quarantined().chain(target.quarantined()).collect();

    let source_ids: BTreeSet<&EmployeeId> = source
        .records
        .keys()
        .filter(|id| !quarantined.contains(id))
        .collect();
    let target_ids: BTreeSet<&EmployeeId> = target
        .records
        .keys()
        .filter(|id| !quarantined.contains(id))
        .collect();

    MatchSets {
        only_in_source: source_ids.difference(&target_ids).map(|id| (*id).clone()).collect(),
        only_in_target: target_ids.difference(&source_ids).map(|id| (*id).clone()).collect(),
        in_both: source_ids.intersection(&target_ids).map(|id| (*id).clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_core::EmploymentType;

    fn rec(id: &str, title: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::from(id),
            full_name: "Jane Doe".into(),
            job_title: title.into(),
            email: "jane@x.org".into(),
            division_name: "Transportation".into(),
            position_number: "T-100".into(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            employment_type: EmploymentType::FullTime,
            status: None,
        }
    }

    fn ids(set: &BTreeSet<EmployeeId>) -> Vec<&str> {
        set.iter().map(EmployeeId::as_str).collect()
    }

    #[test]
    fn classifies_into_disjoint_sets() {
        let source = index(
            Side::Source,
            vec![rec("1", "a"), rec("2", "a"), rec("3", "a")],
            DuplicatePolicy::Reject,
        );
        let target = index(
            Side::Target,
            vec![rec("2", "a"), rec("3", "a"), rec("4", "a")],
            DuplicatePolicy::Reject,
        );
        let sets = match_ids(&source, &target);
        assert_eq!(ids(&sets.only_in_source), ["1"]);
        assert_eq!(ids(&sets.only_in_target), ["4"]);
        assert_eq!(ids(&sets.in_both), ["2", "3"]);
        assert_eq!(sets.len(), 4);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let source = index(Side::Source, vec![rec("a1", "x")], DuplicatePolicy::Reject);
        let target = index(Side::Target, vec![rec("A1", "x")], DuplicatePolicy::Reject);
        let sets = match_ids(&source, &target);
        assert!(sets.in_both.is_empty());
        assert_eq!(ids(&sets.only_in_source), ["a1"]);
        assert_eq!(ids(&sets.only_in_target), ["A1"]);
    }

    #[test]
    fn keep_last_and_keep_first_pick_by_fetch_order() {
        let records = vec![rec("1", "first"), rec("1", "last")];

        let last = index(Side::Source, records.clone(), DuplicatePolicy::KeepLast);
        assert_eq!(last.records[&EmployeeId::from("1")].job_title, "last");
        assert_eq!(last.duplicates.len(), 1);
        assert_eq!(last.duplicates[0].occurrences, 2);

        let first = index(Side::Source, records, DuplicatePolicy::KeepFirst);
        assert_eq!(first.records[&EmployeeId::from("1")].job_title, "first");
        assert_eq!(first.quarantined().count(), 0);
    }

    #[test]
    fn rejected_duplicate_is_withheld_from_both_sides() {
        let source = index(
            Side::Source,
            vec![rec("1", "a"), rec("1", "b"), rec("2", "a")],
            DuplicatePolicy::Reject,
        );
        assert!(source.get(&EmployeeId::from("1")).is_none());

        let target = index(
            Side::Target,
            vec![rec("1", "a"), rec("2", "a")],
            DuplicatePolicy::Reject,
        );
        let sets = match_ids(&source, &target);
        assert_eq!(ids(&sets.in_both), ["2"]);
        assert!(sets.only_in_target.is_empty(), "quarantined id must not be deactivated");
    }

    #[test]
    fn policy_parses_from_cli_text() {
        assert_eq!("keep_last".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::KeepLast));
        assert_eq!("Keep-First".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::KeepFirst));
        assert!("newest".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::default().to_string(), "reject");
    }
}
