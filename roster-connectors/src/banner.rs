//! Banner HR client.
//!
//! Banner answers `getTransitEmployees` with a WDDX packet whose first
//! `<string>` element carries the employee list as escaped JSON. Vacant
//! positions (rows with no `pidm`) are dropped here, before the normalizer
//! sees them.

use std::time::Duration;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use roster_core::RawSourceRecord;
use roster_sync::{PortError, SourceReader};

use crate::error::{decode_err, from_ureq, ConnectorError};

pub const DEFAULT_DEPT: &str = "24E";

const METHOD: &str = "getTransitEmployees";

/// HTTP client for the Banner employee endpoint.
///
/// The API key is passed in by the caller; do not log it.
#[derive(Debug, Clone)]
pub struct BannerClient {
    agent: ureq::Agent,
    url: String,
    api_key: String,
    dept: String,
}

impl BannerClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.into(),
            api_key: api_key.into(),
            dept: DEFAULT_DEPT.to_string(),
        }
    }

    pub fn with_dept(mut self, dept: impl Into<String>) -> Self {
        self.dept = dept.into();
        self
    }

    /// Fetch and decode every filled position.
    pub fn fetch_records(&self) -> Result<Vec<RawSourceRecord>, ConnectorError> {
        tracing::debug!("requesting {METHOD} for dept {} from {}", self.dept, self.url);
        let body = self
            .agent
            .get(&self.url)
            .query("method", METHOD)
            .query("setApiDept", &self.dept)
            .query("setApiKey", &self.api_key)
            .call()
            .map_err(|e| from_ureq(&self.url, e))?
            .into_string()
            .map_err(|e| decode_err("Banner response body", e))?;

        let records = decode_packet(&body)?;
        Ok(drop_vacant_positions(records))
    }
}

impl SourceReader for BannerClient {
    fn fetch_all(&mut self) -> Result<Vec<RawSourceRecord>, PortError> {
        Ok(self.fetch_records()?)
    }
}

/// Keep only rows that carry an employee id.
pub fn drop_vacant_positions(records: Vec<RawSourceRecord>) -> Vec<RawSourceRecord> {
    let total = records.len();
    let filled: Vec<_> = records
        .into_iter()
        .filter(|r| r.pidm.as_deref().is_some_and(|id| !id.trim().is_empty()))
        .collect();
    if filled.len() < total {
        tracing::debug!("dropped {} vacant positions", total - filled.len());
    }
    filled
}

// ---------------------------------------------------------------------------
// WDDX
// ---------------------------------------------------------------------------

/// Decode a Banner WDDX packet into raw employee rows.
pub fn decode_packet(packet: &str) -> Result<Vec<RawSourceRecord>, ConnectorError> {
    let payload = first_string_element(packet)?
        .ok_or_else(|| decode_err("Banner WDDX packet", "no <string> element"))?;
    let json = payload.replace("//", "");
    serde_json::from_str(&json).map_err(|e| decode_err("Banner employee JSON", e))
}

/// Unescaped text of the first `<string>` element, with WDDX
/// `<char code='..'/>` escapes resolved.
fn first_string_element(packet: &str) -> Result<Option<String>, ConnectorError> {
    let mut reader = Reader::from_str(packet);
    let mut inside = false;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| decode_err("Banner WDDX packet", e))?;
        match event {
            Event::Start(e) if !inside && e.local_name().as_ref() == b"string" => inside = true,
            Event::Empty(e) if !inside && e.local_name().as_ref() == b"string" => {
                return Ok(Some(text))
            }
            Event::End(e) if inside && e.local_name().as_ref() == b"string" => {
                return Ok(Some(text))
            }
            Event::Text(e) if inside => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| decode_err("Banner WDDX packet", e))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) if inside => {
                let raw = std::str::from_utf8(&e).map_err(|e| decode_err("Banner WDDX packet", e))?;
                text.push_str(raw);
            }
            Event::Empty(e) if inside && e.local_name().as_ref() == b"char" => {
                text.push(char_code(&e)?)
            }
            Event::Eof if inside => {
                return Err(decode_err(
                    "Banner WDDX packet",
                    "unterminated <string> element",
                ))
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// `<char code='0A'/>` → the character.
fn char_code(tag: &BytesStart<'_>) -> Result<char, ConnectorError> {
    tag.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"code")
        .and_then(|attr| {
            let hex = std::str::from_utf8(&attr.value).ok()?;
            u32::from_str_radix(hex.trim(), 16).ok()
        })
        .and_then(char::from_u32)
        .ok_or_else(|| decode_err("Banner WDDX packet", "<char> without a valid code"))
}
