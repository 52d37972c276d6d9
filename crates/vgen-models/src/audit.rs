//! Audit log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::{GenerationMetadata, GenerationResult};

/// One line of the generation audit log.
///
/// Only successful generations produce a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub metadata: GenerationMetadata,
}

impl AuditRecord {
    /// Build the record for a generation result.
    ///
    /// Returns `None` unless the result is a success.
    pub fn for_result(result: &GenerationResult) -> Option<Self> {
        if !result.is_success() {
            return None;
        }

        Some(Self {
            timestamp: Utc::now(),
            metadata: result.metadata.clone(),
        })
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationRequest, GenerationStatus};

    #[test]
    fn test_record_only_for_success() {
        let ok = GenerationResult::success(GenerationRequest::new("test"), "https://x/y.mp4", "y.mp4");
        assert!(AuditRecord::for_result(&ok).is_some());

        let mut failed = ok.clone();
        failed.status = GenerationStatus::Error;
        assert!(AuditRecord::for_result(&failed).is_none());
    }

    #[test]
    fn test_json_line_is_single_line() {
        let result = GenerationResult::success(
            GenerationRequest::new("multi\nline prompt"),
            "https://x/y.mp4",
            "y.mp4",
        );
        let record = AuditRecord::for_result(&result).unwrap();
        let line = record.to_json_line().unwrap();

        assert!(!line.contains('\n'));
        let parsed: AuditRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }
}
