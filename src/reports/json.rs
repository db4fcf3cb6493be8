//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::diff::SnapshotDiff;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator, always pretty printed
pub struct JsonReporter;

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_diff_report(&self, result: &SnapshotDiff) -> Result<String, ReportError> {
        let report = JsonDiffReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
                generated_at: Utc::now().to_rfc3339(),
            },
            diff: result,
        };

        serde_json::to_string_pretty(&report).map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonDiffReport<'a> {
    metadata: JsonReportMetadata,
    #[serde(flatten)]
    diff: &'a SnapshotDiff,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{Snapshot, SnapshotKey};

    #[test]
    fn test_json_report_structure() {
        let mut pre = Snapshot::new(SnapshotKey::new("t1", "pre").unwrap());
        pre.items.insert("motd".to_string(), b"hello\n".to_vec());
        pre.items.insert("hosts".to_string(), b"x\n".to_vec());
        let mut post = Snapshot::new(SnapshotKey::new("t1", "post").unwrap());
        post.items.insert("motd".to_string(), b"hello world\n".to_vec());
        post.items.insert("hosts".to_string(), b"x\n".to_vec());
        let result = DiffEngine::new().diff(&pre, &post);

        let json = JsonReporter::new().generate_diff_report(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["tool"]["name"], "syscap");
        assert_eq!(value["tag"], "t1");
        assert_eq!(value["old_phase"], "pre");
        assert_eq!(value["new_phase"], "post");
        assert_eq!(value["summary"]["modified"], 1);
        assert_eq!(value["summary"]["unchanged"], 1);

        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "hosts");
        assert_eq!(items[0]["change"], "unchanged");
        assert!(items[0].get("unified").is_none());
        assert_eq!(items[1]["change"], "modified");
        assert!(items[1]["unified"].as_str().unwrap().contains("+hello world"));
    }
}
