//! Environment configuration.
//!
//! Everything is read once at startup. Connection settings stay optional
//! here and are only required when a live client is built, so snapshot runs
//! need no credentials.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use roster_connectors::knack::{object_for_app, DEFAULT_API_URL};
use roster_connectors::{banner::DEFAULT_DEPT, BannerClient, KnackClient};
use roster_sync::DuplicatePolicy;

const DEFAULT_APP_NAME: &str = "hr";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing env {0}")]
    Missing(&'static str),

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub banner_url: Option<String>,
    pub banner_api_key: Option<String>,
    pub banner_dept: String,
    pub knack_app_name: String,
    pub knack_app_id: Option<String>,
    pub knack_api_key: Option<String>,
    pub knack_api_url: String,
    pub knack_object: Option<String>,
    pub duplicate_policy: DuplicatePolicy,
    pub http_timeout: Duration,
}

impl RosterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let knack_app_name = get("KNACK_APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.into());
        let knack_object = get("KNACK_OBJECT")
            .or_else(|| object_for_app(&knack_app_name).map(str::to_string));

        let duplicate_policy = match get("ROSTER_DUPLICATE_POLICY") {
            Some(raw) => raw.parse::<DuplicatePolicy>().map_err(|message| ConfigError::Invalid {
                key: "ROSTER_DUPLICATE_POLICY",
                message,
            })?,
            None => DuplicatePolicy::default(),
        };

        let timeout_secs = match get("ROSTER_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "ROSTER_HTTP_TIMEOUT_SECS",
                    message: format!("expected a positive number of seconds, got '{raw}'"),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            banner_url: get("BANNER_URL"),
            banner_api_key: get("BANNER_API_KEY"),
            banner_dept: get("BANNER_DEPT").unwrap_or_else(|| DEFAULT_DEPT.into()),
            knack_app_name,
            knack_app_id: get("KNACK_APP_ID"),
            knack_api_key: get("KNACK_API_KEY"),
            knack_api_url: get("KNACK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            knack_object,
            duplicate_policy,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn banner_client(&self) -> Result<BannerClient, ConfigError> {
        let url = required(&self.banner_url, "BANNER_URL")?;
        let api_key = required(&self.banner_api_key, "BANNER_API_KEY")?;
        Ok(BannerClient::new(url, api_key, self.http_timeout).with_dept(&self.banner_dept))
    }

    pub fn knack_client(&self) -> Result<KnackClient, ConfigError> {
        let app_id = required(&self.knack_app_id, "KNACK_APP_ID")?;
        let api_key = required(&self.knack_api_key, "KNACK_API_KEY")?;
        let object = self.knack_object.as_deref().ok_or_else(|| ConfigError::Invalid {
            key: "KNACK_APP_NAME",
            message: format!(
                "no accounts object known for app '{}'; set KNACK_OBJECT",
                self.knack_app_name
            ),
        })?;
        Ok(KnackClient::new(app_id, api_key, object, self.http_timeout)
            .with_base_url(&self.knack_api_url))
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing(key))
}

/// Settings listing with secrets masked.
impl fmt::Display for RosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("BANNER_URL", shown(&self.banner_url)),
            ("BANNER_API_KEY", redacted(&self.banner_api_key)),
            ("BANNER_DEPT", self.banner_dept.clone()),
            ("KNACK_APP_NAME", self.knack_app_name.clone()),
            ("KNACK_APP_ID", shown(&self.knack_app_id)),
            ("KNACK_API_KEY", redacted(&self.knack_api_key)),
            ("KNACK_API_URL", self.knack_api_url.clone()),
            ("KNACK_OBJECT", shown(&self.knack_object)),
            ("ROSTER_DUPLICATE_POLICY", self.duplicate_policy.to_string()),
            (
                "ROSTER_HTTP_TIMEOUT_SECS",
                self.http_timeout.as_secs().to_string(),
            ),
        ];
        for (key, value) in rows {
            writeln!(f, "{key:<26}{value}")?;
        }
        Ok(())
    }
}

fn shown(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "(unset)".into())
}

fn redacted(value: &Option<String>) -> String {
    match value {
        Some(_) => "********".into(),
        None => "(unset)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<RosterConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RosterConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.banner_dept, "24E");
        assert_eq!(cfg.knack_app_name, "hr");
        assert_eq!(cfg.knack_object.as_deref(), Some("object_5"));
        assert_eq!(cfg.knack_api_url, "https://api.knack.com");
        assert_eq!(cfg.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn live_clients_need_credentials() {
        let cfg = config(&[("BANNER_URL", "https://hr.example"), ("KNACK_APP_ID", " ")]).unwrap();
        assert_eq!(
            cfg.banner_client().unwrap_err(),
            ConfigError::Missing("BANNER_API_KEY")
        );
        assert_eq!(
            cfg.knack_client().unwrap_err(),
            ConfigError::Missing("KNACK_APP_ID")
        );
    }

    #[test]
    fn unknown_app_needs_explicit_object() {
        let cfg = config(&[
            ("KNACK_APP_NAME", "dts_portal"),
            ("KNACK_APP_ID", "app"),
            ("KNACK_API_KEY", "key"),
        ])
        .unwrap();
        assert!(matches!(
            cfg.knack_client().unwrap_err(),
            ConfigError::Invalid {
                key: "KNACK_APP_NAME",
                ..
            }
        ));

        let cfg = config(&[("KNACK_APP_NAME", "dts_portal"), ("KNACK_OBJECT", "object_9")]).unwrap();
        assert_eq!(cfg.knack_object.as_deref(), Some("object_9"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config(&[("ROSTER_DUPLICATE_POLICY", "newest")]),
            Err(ConfigError::Invalid { key: "ROSTER_DUPLICATE_POLICY", .. })
        ));
        assert!(matches!(
            config(&[("ROSTER_HTTP_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid { key: "ROSTER_HTTP_TIMEOUT_SECS", .. })
        ));
        assert_eq!(
            config(&[("ROSTER_DUPLICATE_POLICY", "keep_last")])
                .unwrap()
                .duplicate_policy,
            DuplicatePolicy::KeepLast
        );
    }

    #[test]
    fn display_masks_secrets() {
        let cfg = config(&[("BANNER_API_KEY", "s3cret"), ("KNACK_APP_ID", "app-1")]).unwrap();
        let shown = cfg.to_string();
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("********"));
        assert!(shown.contains("app-1"));
        assert!(shown.contains("(unset)"));
    }
}
