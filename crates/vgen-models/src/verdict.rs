//! Quality review verdicts.

use serde::{Deserialize, Serialize};

/// Phrase the review model is instructed to emit when a video passes.
pub const APPROVAL_MARKER: &str = "APPROVED FOR PRODUCTION";

/// Outcome of a quality review.
///
/// Approval is read out of free text, so it is a best-effort signal:
/// a false negative is acceptable, a positive should not be the only
/// gate before publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub approved: bool,
    /// Raw model output; `None` when the review could not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl QualityVerdict {
    /// Derive a verdict from the model's analysis text.
    pub fn from_analysis(analysis: impl Into<String>) -> Self {
        let analysis = analysis.into();
        let approved = analysis.to_uppercase().contains(APPROVAL_MARKER);

        Self {
            approved,
            analysis: Some(analysis),
        }
    }

    /// Verdict for a review that failed before producing any analysis.
    pub fn rejected_without_analysis() -> Self {
        Self {
            approved: false,
            analysis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_any_case() {
        assert!(QualityVerdict::from_analysis("Looks great. APPROVED FOR PRODUCTION").approved);
        assert!(QualityVerdict::from_analysis("approved for production!").approved);
        assert!(QualityVerdict::from_analysis("Status: Approved For Production").approved);
    }

    #[test]
    fn test_missing_marker_keeps_text() {
        let text = "1. Shadow flickers at 00:02\n2. Hand clips through table";
        let verdict = QualityVerdict::from_analysis(text);

        assert!(!verdict.approved);
        assert_eq!(verdict.analysis.as_deref(), Some(text));
    }

    #[test]
    fn test_rejected_without_analysis() {
        let verdict = QualityVerdict::rejected_without_analysis();
        assert!(!verdict.approved);
        assert!(verdict.analysis.is_none());
    }
}
