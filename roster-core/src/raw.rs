//! Records as the two systems supply them, before normalization.
//!
//! Field names on [`RawSourceRecord`] follow the HR system's JSON payload.
//! [`RawTargetRecord`] is the hosted app's record after its field ids have
//! been resolved by the connector; snapshot files use the same shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One employee row from the HR system.
///
/// Every field is optional and accepts strings, numbers or booleans; the
/// normalizer decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub pidm: Option<String>,
    /// `"Last, First"` in the HR system.
    #[serde(default, deserialize_with = "lenient_string")]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub divn_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub posn: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub temp_status: Option<String>,
    #[serde(
        default,
        alias = "hiredate",
        alias = "current_hire_date",
        deserialize_with = "lenient_string"
    )]
    pub hire_date: Option<String>,
}

/// A person's name as the hosted app stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawName {
    Parts {
        #[serde(default)]
        first: String,
        #[serde(default)]
        last: String,
    },
    Full(String),
}

/// One account record from the hosted app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTargetRecord {
    /// The app's own record id, used to address updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<RawName>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub division_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hire_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

/// Accept a JSON string, number or boolean as text; `null` becomes `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_string(&v)))
}

/// Text form of a scalar JSON value. Arrays and objects yield `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_record_accepts_numeric_pidm() {
        let raw: RawSourceRecord =
            serde_json::from_str(r#"{"pidm": 123456, "fullname": "Doe, Jane"}"#).unwrap();
        assert_eq!(raw.pidm.as_deref(), Some("123456"));
        assert_eq!(raw.fullname.as_deref(), Some("Doe, Jane"));
        assert!(raw.email.is_none());
    }

    #[test]
    fn source_record_null_fields_are_none() {
        let raw: RawSourceRecord = serde_json::from_str(r#"{"pidm": null}"#).unwrap();
        assert!(raw.pidm.is_none());
    }

    #[test]
    fn target_name_accepts_parts_or_string() {
        let parts: RawTargetRecord =
            serde_json::from_str(r#"{"name": {"first": "Jane", "last": "Doe"}}"#).unwrap();
        assert_eq!(
            parts.name,
            Some(RawName::Parts {
                first: "Jane".into(),
                last: "Doe".into()
            })
        );

        let full: RawTargetRecord = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(full.name, Some(RawName::Full("Jane Doe".into())));
    }
}
