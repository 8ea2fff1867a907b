//! Raw → normalized record conversion.
//!
//! Both sides are brought into the same comparable shape:
//! - text is trimmed and internal whitespace collapsed
//! - names become a first/last pair (the HR system sends `"Last, First"`)
//! - email is lower-cased
//! - `hire_date` becomes a calendar date
//! - employment type and status are mapped onto shared enums
//!
//! A record without an id or with an unusable date is rejected with
//! [`MalformedRecord`] rather than skipped.

use chrono::NaiveDate;

use crate::error::{MalformedReason, MalformedRecord};
use crate::raw::{RawName, RawSourceRecord, RawTargetRecord};
use crate::types::{
    collapse, EmployeeId, EmployeeRecord, EmployeeStatus, EmploymentType, PersonName, Side,
};

/// Date layouts seen in either system, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y", "%d-%b-%Y"];

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Normalize one HR record. The result carries no status.
pub fn normalize_source(raw: &RawSourceRecord) -> Result<EmployeeRecord, MalformedRecord> {
    let employee_id = require_id(Side::Source, raw.pidm.as_deref())?;
    let malformed = |reason| MalformedRecord {
        side: Side::Source,
        employee_id: Some(employee_id.0.clone()),
        reason,
    };

    let hire_date = parse_hire_date(raw.hire_date.as_deref()).map_err(malformed)?;
    let employment_type = parse_employment_type(raw.temp_status.as_deref()).map_err(malformed)?;

    Ok(EmployeeRecord {
        full_name: canonical_name(raw.fullname.as_deref().unwrap_or_default()),
        job_title: clean_text(raw.job_title.as_deref()),
        email: clean_email(raw.email.as_deref()),
        division_name: clean_text(raw.divn_name.as_deref()),
        position_number: clean_text(raw.posn.as_deref()),
        hire_date,
        employment_type,
        status: None,
        employee_id,
    })
}

/// Normalize one hosted-app record. The result always carries a status.
pub fn normalize_target(raw: &RawTargetRecord) -> Result<EmployeeRecord, MalformedRecord> {
    let employee_id = require_id(Side::Target, raw.employee_id.as_deref())?;
    let malformed = |reason| MalformedRecord {
        side: Side::Target,
        employee_id: Some(employee_id.0.clone()),
        reason,
    };

    let hire_date = parse_hire_date(raw.hire_date.as_deref()).map_err(malformed)?;
    let employment_type =
        parse_employment_type(raw.employment_type.as_deref()).map_err(malformed)?;
    let status = parse_status(raw.status.as_deref()).map_err(malformed)?;

    let full_name = match &raw.name {
        Some(RawName::Parts { first, last }) => PersonName::new(first, last),
        Some(RawName::Full(full)) => canonical_name(full),
        None => PersonName::default(),
    };

    Ok(EmployeeRecord {
        full_name,
        job_title: clean_text(raw.job_title.as_deref()),
        email: clean_email(raw.email.as_deref()),
        division_name: clean_text(raw.division_name.as_deref()),
        position_number: clean_text(raw.position_number.as_deref()),
        hire_date,
        employment_type,
        status: Some(status),
        employee_id,
    })
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn require_id(side: Side, raw: Option<&str>) -> Result<EmployeeId, MalformedRecord> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(EmployeeId::from(id)),
        _ => Err(MalformedRecord {
            side,
            employee_id: None,
            reason: MalformedReason::MissingEmployeeId,
        }),
    }
}

/// Parse a hire date in any of the known layouts.
///
/// A trailing time component (`2020-01-15T08:00:00`, `01/15/2020 8:00am`)
/// is ignored.
pub fn parse_hire_date(raw: Option<&str>) -> Result<NaiveDate, MalformedReason> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(MalformedReason::InvalidHireDate { raw: None });
    }

    let date_part = text
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(text);

    [text, date_part]
        .iter()
        .flat_map(|candidate| {
            DATE_FORMATS
                .iter()
                .map(move |fmt| NaiveDate::parse_from_str(candidate, fmt))
        })
        .find_map(Result::ok)
        .ok_or_else(|| MalformedReason::InvalidHireDate {
            raw: Some(text.to_string()),
        })
}

/// Map the side-specific employment encoding onto [`EmploymentType`].
///
/// The HR system flags temporary staff (`Y`/`N`); the hosted app stores a
/// label. Blank means full-time.
pub fn parse_employment_type(raw: Option<&str>) -> Result<EmploymentType, MalformedReason> {
    let text = collapse(raw.unwrap_or_default()).to_ascii_uppercase();
    match text.as_str() {
        "Y" | "YES" | "T" | "TRUE" | "TEMP" | "TEMPORARY" => Ok(EmploymentType::Temporary),
        "" | "N" | "NO" | "F" | "FALSE" | "FT" | "FULL" | "FULL TIME" | "FULL-TIME"
        | "FULLTIME" | "FULL_TIME" | "REGULAR" | "PERMANENT" => Ok(EmploymentType::FullTime),
        _ => Err(MalformedReason::UnknownEmploymentType {
            raw: raw.unwrap_or_default().trim().to_string(),
        }),
    }
}

/// Map the hosted app's status text. Blank is the app's default, inactive.
pub fn parse_status(raw: Option<&str>) -> Result<EmployeeStatus, MalformedReason> {
    let text = raw.map(str::trim).unwrap_or_default();
    match text.to_ascii_lowercase().as_str() {
        "" | "inactive" => Ok(EmployeeStatus::Inactive),
        "active" => Ok(EmployeeStatus::Active),
        "separated" => Ok(EmployeeStatus::Separated),
        _ => Err(MalformedReason::UnknownStatus {
            raw: text.to_string(),
        }),
    }
}

/// `"Last, First"` keeps its own split; other forms split on the last space.
pub fn canonical_name(raw: &str) -> PersonName {
    match raw.split_once(',') {
        Some((last, first)) => PersonName::new(first, last),
        None => PersonName::from(raw),
    }
}

fn clean_text(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

fn clean_email(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
