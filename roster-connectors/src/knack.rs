//! Knack accounts-object client.
//!
//! Reads page through `/v1/objects/{object}/records`. Writes address
//! records by the Knack record id remembered from the last fetch (or from
//! the create response), so callers only ever deal in employee ids.
//!
//! Field encodings on the wire:
//! - name: `{"first": .., "last": ..}`
//! - email: `{"email": ..}`
//! - hire date: `MM/DD/YYYY`
//! - employment type: the HR temp flag, `Y` or `N`
//! - status: lowercase text

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use roster_core::raw::value_to_string;
use roster_core::{
    EmployeeId, EmployeeRecord, EmployeeStatus, EmploymentType, FieldValue, RawName,
    RawTargetRecord, TrackedField,
};
use roster_sync::{Changeset, PortError, TargetReader, TargetWriter};

use crate::error::{decode_err, from_ureq, ConnectorError};
use crate::password::generate_password;

pub const DEFAULT_API_URL: &str = "https://api.knack.com";
pub const ROWS_PER_PAGE: u32 = 1000;

/// Accounts object for a known Knack app name.
pub fn object_for_app(app_name: &str) -> Option<&'static str> {
    match app_name {
        "hr" => Some("object_5"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Field map
// ---------------------------------------------------------------------------

/// Knack field ids of the accounts object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnackFieldMap {
    pub employee_id: String,
    pub employment_type: String,
    pub job_title: String,
    pub email: String,
    pub division_name: String,
    pub full_name: String,
    pub position_number: String,
    pub hire_date: String,
    pub status: String,
    pub password: String,
}

impl Default for KnackFieldMap {
    fn default() -> Self {
        Self {
            employee_id: "field_99".into(),
            employment_type: "field_95".into(),
            job_title: "field_230".into(),
            email: "field_18".into(),
            division_name: "field_250".into(),
            full_name: "field_17".into(),
            position_number: "field_248".into(),
            hire_date: "field_252".into(),
            status: "field_20".into(),
            password: "field_19".into(),
        }
    }
}

impl KnackFieldMap {
    pub fn tracked(&self, field: TrackedField) -> &str {
        match field {
            TrackedField::EmploymentType => &self.employment_type,
            TrackedField::JobTitle => &self.job_title,
            TrackedField::Email => &self.email,
            TrackedField::DivisionName => &self.division_name,
            TrackedField::FullName => &self.full_name,
            TrackedField::PositionNumber => &self.position_number,
            TrackedField::HireDate => &self.hire_date,
        }
    }

    /// Decode one record as Knack returns it.
    ///
    /// `field_N_raw` is preferred over the formatted `field_N` when present.
    pub fn decode(&self, record: &Map<String, Value>) -> RawTargetRecord {
        let text = |key: &str| field_text(lookup(record, key));
        RawTargetRecord {
            record_id: record.get("id").and_then(value_to_string),
            employee_id: text(&self.employee_id),
            name: field_name(lookup(record, &self.full_name)),
            job_title: text(&self.job_title),
            email: text(&self.email),
            division_name: text(&self.division_name),
            position_number: text(&self.position_number),
            hire_date: text(&self.hire_date),
            employment_type: text(&self.employment_type),
            status: text(&self.status),
        }
    }

    /// Body for a new account: every tracked field, the id, the status and
    /// a generated password.
    pub fn create_body(&self, record: &EmployeeRecord, password: &str) -> Map<String, Value> {
        let mut body: Map<String, Value> = TrackedField::ALL
            .iter()
            .map(|&f| (self.tracked(f).to_string(), encode(f, &record.field(f))))
            .collect();
        body.insert(self.employee_id.clone(), json!(record.employee_id.as_str()));
        let status = record.status.unwrap_or(EmployeeStatus::Active);
        body.insert(self.status.clone(), json!(status.as_str()));
        body.insert(self.password.clone(), json!(password));
        body
    }

    /// Body carrying only the changed fields.
    pub fn update_body(&self, changes: &Changeset) -> Map<String, Value> {
        changes
            .iter()
            .map(|(f, value)| (self.tracked(f).to_string(), encode(f, value)))
            .collect()
    }

    pub fn status_body(&self, status: EmployeeStatus) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert(self.status.clone(), json!(status.as_str()));
        body
    }
}

fn lookup<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record
        .get(&format!("{key}_raw"))
        .filter(|v| !v.is_null())
        .or_else(|| record.get(key))
}

/// Scalar text of a field, unwrapping Knack's email/date objects and
/// single-item lists.
fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(map) => ["email", "date", "identifier"]
            .iter()
            .find_map(|key| map.get(*key).and_then(value_to_string)),
        Value::Array(items) => field_text(items.first()),
        other => value_to_string(other),
    }
}

fn field_name(value: Option<&Value>) -> Option<RawName> {
    match value? {
        Value::Object(map) => {
            let part = |key: &str| map.get(key).and_then(value_to_string).unwrap_or_default();
            Some(RawName::Parts {
                first: part("first"),
                last: part("last"),
            })
        }
        other => value_to_string(other).map(RawName::Full),
    }
}

fn encode(field: TrackedField, value: &FieldValue) -> Value {
    match (field, value) {
        (TrackedField::Email, FieldValue::Text(email)) => json!({ "email": email }),
        (_, FieldValue::Name(name)) => json!({ "first": name.first, "last": name.last }),
        (_, FieldValue::Date(date)) => json!(date.format("%m/%d/%Y").to_string()),
        (_, FieldValue::EmploymentType(EmploymentType::Temporary)) => json!("Y"),
        (_, FieldValue::EmploymentType(EmploymentType::FullTime)) => json!("N"),
        (_, FieldValue::Text(text)) => json!(text),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RecordsPage {
    #[serde(default)]
    total_pages: Value,
    #[serde(default)]
    current_page: Value,
    #[serde(default)]
    records: Vec<Map<String, Value>>,
}

fn page_number(value: &Value) -> Option<u32> {
    value_to_string(value)?.parse().ok()
}

/// HTTP client for one Knack object.
///
/// Credentials are passed in by the caller; do not log them.
#[derive(Debug, Clone)]
pub struct KnackClient {
    agent: ureq::Agent,
    base_url: String,
    app_id: String,
    api_key: String,
    object: String,
    fields: KnackFieldMap,
    record_ids: BTreeMap<EmployeeId, String>,
}

impl KnackClient {
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        object: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: DEFAULT_API_URL.to_string(),
            app_id: app_id.into(),
            api_key: api_key.into(),
            object: object.into(),
            fields: KnackFieldMap::default(),
            record_ids: BTreeMap::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_fields(mut self, fields: KnackFieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn fields(&self) -> &KnackFieldMap {
        &self.fields
    }

    /// Knack record id for an employee, as of the last fetch or create.
    pub fn record_id(&self, employee_id: &EmployeeId) -> Option<&str> {
        self.record_ids.get(employee_id).map(String::as_str)
    }

    fn records_url(&self) -> String {
        format!(
            "{}/v1/objects/{}/records",
            self.base_url.trim_end_matches('/'),
            self.object
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("X-Knack-Application-Id", &self.app_id)
            .set("X-Knack-REST-API-Key", &self.api_key)
    }

    /// Read every page of the object and refresh the record-id map.
    pub fn fetch_records(&mut self) -> Result<Vec<RawTargetRecord>, ConnectorError> {
        let url = self.records_url();
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!("fetching {} page {page}", self.object);
            let body: RecordsPage = self
                .request("GET", &url)
                .query("page", &page.to_string())
                .query("rows_per_page", &ROWS_PER_PAGE.to_string())
                .call()
                .map_err(|e| from_ureq(&url, e))?
                .into_json()
                .map_err(|e| decode_err("Knack records page", e))?;

            let fetched = body.records.len();
            records.extend(body.records.iter().map(|r| self.fields.decode(r)));

            // A server that repeats or rewinds its page number cannot hold us
            // on one page.
            let current = page_number(&body.current_page).unwrap_or(page).max(page);
            let total = page_number(&body.total_pages).unwrap_or(current);
            if fetched == 0 || current >= total {
                break;
            }
            page = current + 1;
        }

        self.record_ids = records
            .iter()
            .filter_map(|r| {
                let employee_id = r.employee_id.as_deref()?.trim();
                let record_id = r.record_id.clone()?;
                Some((EmployeeId::from(employee_id), record_id))
            })
            .collect();
        Ok(records)
    }

    pub fn create_record(&mut self, record: &EmployeeRecord) -> Result<(), ConnectorError> {
        let url = self.records_url();
        let body = self.fields.create_body(record, &generate_password());
        let response: Value = self
            .request("POST", &url)
            .send_json(Value::Object(body))
            .map_err(|e| from_ureq(&url, e))?
            .into_json()
            .unwrap_or_else(|err| {
                tracing::warn!(
                    "could not decode create response for employee {}: {err}",
                    record.employee_id
                );
                Value::Null
            });

        match response.get("id").and_then(value_to_string) {
            Some(record_id) => {
                self.record_ids.insert(record.employee_id.clone(), record_id);
            }
            None => tracing::warn!(
                "create response for employee {} carried no record id",
                record.employee_id
            ),
        }
        Ok(())
    }

    pub fn update_record(
        &mut self,
        employee_id: &EmployeeId,
        changes: &Changeset,
    ) -> Result<(), ConnectorError> {
        self.put(employee_id, self.fields.update_body(changes))
    }

    pub fn update_status(
        &mut self,
        employee_id: &EmployeeId,
        status: EmployeeStatus,
    ) -> Result<(), ConnectorError> {
        self.put(employee_id, self.fields.status_body(status))
    }

    fn put(&self, employee_id: &EmployeeId, body: Map<String, Value>) -> Result<(), ConnectorError> {
        let record_id = self
            .record_id(employee_id)
            .ok_or_else(|| ConnectorError::UnknownRecord(employee_id.clone()))?;
        let url = format!("{}/{record_id}", self.records_url());
        self.request("PUT", &url)
            .send_json(Value::Object(body))
            .map_err(|e| from_ureq(&url, e))?;
        Ok(())
    }
}

impl TargetReader for KnackClient {
    fn fetch_all(&mut self) -> Result<Vec<RawTargetRecord>, PortError> {
        Ok(self.fetch_records()?)
    }
}

impl TargetWriter for KnackClient {
    fn create(&mut self, record: &EmployeeRecord) -> Result<(), PortError> {
        Ok(self.create_record(record)?)
    }

    fn update(&mut self, employee_id: &EmployeeId, changes: &Changeset) -> Result<(), PortError> {
        Ok(self.update_record(employee_id, changes)?)
    }

    fn set_status(&mut self, employee_id: &EmployeeId, status: EmployeeStatus) -> Result<(), PortError> {
        Ok(self.update_status(employee_id, status)?)
    }
}
