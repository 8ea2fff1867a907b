//! Normalizing payloads shaped like what each system actually returns.

use chrono::NaiveDate;
use roster_core::{
    normalize_source, normalize_target, EmployeeStatus, EmploymentType, MalformedReason,
    RawSourceRecord, RawTargetRecord, Side,
};

const HR_PAYLOAD: &str = r#"[
    {"pidm": 1001, "fullname": "Doe,  Jane", "job_title": "Engineer ",
     "email": "Jane@X.org", "divn_name": "Transportation", "posn": "T-100",
     "temp_status": "N", "current_hire_date": "01/15/2020"},
    {"pidm": "1002", "fullname": "Roe, Richard", "job_title": "Analyst",
     "email": null, "divn_name": "Finance", "posn": 4471,
     "temp_status": "Y", "hiredate": "Mar 01, 2018"},
    {"pidm": null, "fullname": "Nobody, No"}
]"#;

#[test]
fn hr_payload_normalizes_to_comparable_records() {
    let raw: Vec<RawSourceRecord> = serde_json::from_str(HR_PAYLOAD).unwrap();
    let results: Vec<_> = raw.iter().map(normalize_source).collect();

    let jane = results[0].as_ref().unwrap();
    assert_eq!(jane.employee_id.as_str(), "1001");
    assert_eq!(jane.full_name, "Jane Doe");
    assert_eq!(jane.job_title, "Engineer");
    assert_eq!(jane.email, "jane@x.org");
    assert_eq!(jane.hire_date, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
    assert_eq!(jane.employment_type, EmploymentType::FullTime);
    assert_eq!(jane.status, None);

    let richard = results[1].as_ref().unwrap();
    assert_eq!(richard.position_number, "4471");
    assert_eq!(richard.email, "");
    assert_eq!(richard.employment_type, EmploymentType::Temporary);
    assert_eq!(richard.hire_date, NaiveDate::from_ymd_opt(2018, 3, 1).unwrap());

    let missing = results[2].as_ref().unwrap_err();
    assert_eq!(missing.side, Side::Source);
    assert_eq!(missing.reason, MalformedReason::MissingEmployeeId);
}

#[test]
fn hosted_app_record_normalizes_to_the_same_shape() {
    let raw: RawTargetRecord = serde_json::from_str(
        r#"{"record_id": "5f1a", "employee_id": 1001,
            "name": {"first": "Jane", "last": "Doe"},
            "job_title": "Engineer", "email": "jane@x.org",
            "division_name": "Transportation", "position_number": "T-100",
            "hire_date": "2020-01-15T00:00:00", "employment_type": "Full Time",
            "status": "Active"}"#,
    )
    .unwrap();
    let target = normalize_target(&raw).unwrap();

    let source = normalize_source(&RawSourceRecord {
        pidm: Some("1001".into()),
        fullname: Some("Doe, Jane".into()),
        job_title: Some("Engineer".into()),
        email: Some("jane@x.org".into()),
        divn_name: Some("Transportation".into()),
        posn: Some("T-100".into()),
        temp_status: Some("N".into()),
        hire_date: Some("2020-01-15".into()),
    })
    .unwrap();

    assert_eq!(target.status, Some(EmployeeStatus::Active));
    assert_eq!(
        roster_core::EmployeeRecord {
            status: None,
            ..target
        },
        source
    );
}

#[test]
fn unknown_status_text_is_malformed_not_guessed() {
    let raw = RawTargetRecord {
        employee_id: Some("9".into()),
        hire_date: Some("2020-01-15".into()),
        status: Some("on leave".into()),
        ..Default::default()
    };
    let err = normalize_target(&raw).unwrap_err();
    assert_eq!(err.employee_id.as_deref(), Some("9"));
    assert!(matches!(err.reason, MalformedReason::UnknownStatus { .. }));
}
