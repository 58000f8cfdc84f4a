//! JSON envelope for script-facing output
//!
//! Every `--format json` command prints `{ "data": ..., "meta": ... }` so
//! scripts can tell which wardgate build produced a permission decision.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    /// When the output was produced, RFC 3339 in UTC
    pub generated_at: String,
    pub version: String,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Pretty-print `data` inside the envelope
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permissions;

    #[test]
    fn test_json_output_metadata() {
        let output = JsonOutput::new(vec!["dashboard"]);

        assert_eq!(output.data, vec!["dashboard"]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(output.meta.generated_at.ends_with('Z'));
    }

    #[test]
    fn test_format_json_permissions() {
        let perms = Permissions {
            view: true,
            ..Permissions::default()
        };

        let result = format_json(&perms).unwrap();

        assert!(result.contains("\"data\""));
        assert!(result.contains("\"meta\""));
        assert!(result.contains("\"view\": true"));
        assert!(result.contains("\"delete\": false"));
    }

    #[test]
    fn test_format_json_null_payload() {
        let result = format_json(&serde_json::Value::Null).unwrap();
        assert!(result.contains("\"data\": null"));
    }
}
