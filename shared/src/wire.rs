//! Wire types for the condition-check REST contract.
//!
//! The backend owns these shapes; everything beyond `id` and `status` is
//! optional on the wire so older backends that return only the minimum
//! fields still decode.

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a stored vehicle photo.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ImageId(pub String);

/// Backend-assigned identifier of a prediction job.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PredictionId(pub String);

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&str> for PredictionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Lifecycle of a prediction job as reported by the backend.
/// `processing` sits between `pending` and the terminal pair; the client
/// treats it exactly like `pending`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PredictionStatus {
    /// `completed` and `failed` both end polling; nothing else does.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Response to a successful image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: ImageId,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Response to a prediction start request. The backend may omit the
/// status on a freshly queued job; it is `pending` then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionJob {
    pub id: PredictionId,
    #[serde(default)]
    pub status: PredictionStatus,
}

/// One assessed dimension (cleanliness or bodywork integrity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: String,
    pub confidence: f64,
}

/// One poll observation of a prediction job. Verdict fields are only
/// populated once the status is `completed`; `error_message` only on
/// `failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub id: PredictionId,
    pub status: PredictionStatus,
    #[serde(default)]
    pub cleanliness: Option<Verdict>,
    #[serde(default)]
    pub integrity: Option<Verdict>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PredictionStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(PredictionStatus::Processing.to_string(), "processing");
    }

    #[test]
    fn status_parses_from_wire_strings() {
        for (s, expected) in [
            ("pending", PredictionStatus::Pending),
            ("processing", PredictionStatus::Processing),
            ("completed", PredictionStatus::Completed),
            ("failed", PredictionStatus::Failed),
        ] {
            assert_eq!(PredictionStatus::from_str(s).unwrap(), expected);
            assert_eq!(
                serde_json::from_str::<PredictionStatus>(&format!("\"{s}\"")).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        assert!(serde_json::from_str::<PredictionStatus>("\"queued\"").is_err());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!PredictionStatus::Pending.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Completed.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
    }

    #[test]
    fn minimal_upload_response_decodes() {
        let img: UploadedImage = serde_json::from_str(r#"{"id":"img-1"}"#).unwrap();
        assert_eq!(img.id, ImageId::from("img-1"));
        assert_eq!(img.filename, None);
        assert_eq!(img.file_size, None);
    }

    #[test]
    fn upload_response_with_metadata_decodes() {
        let img: UploadedImage = serde_json::from_str(
            r#"{"id":"img-1","filename":"a1.jpg","original_name":"car.jpg","file_size":52340,"mime_type":"image/jpeg"}"#,
        )
        .unwrap();
        assert_eq!(img.original_name.as_deref(), Some("car.jpg"));
        assert_eq!(img.file_size, Some(52340));
    }

    #[test]
    fn job_without_status_defaults_to_pending() {
        let job: PredictionJob = serde_json::from_str(r#"{"id":"job-1"}"#).unwrap();
        assert_eq!(job.status, PredictionStatus::Pending);
    }

    #[test]
    fn minimal_report_decodes() {
        let report: PredictionReport =
            serde_json::from_str(r#"{"id":"job-1","status":"pending"}"#).unwrap();
        assert_eq!(report.status, PredictionStatus::Pending);
        assert!(report.cleanliness.is_none());
        assert!(report.integrity.is_none());
    }

    #[test]
    fn report_without_status_is_a_decode_error() {
        assert!(serde_json::from_str::<PredictionReport>(r#"{"id":"job-1"}"#).is_err());
    }

    #[test]
    fn completed_report_carries_verdicts() {
        let report: PredictionReport = serde_json::from_str(
            r#"{
                "id": "job-1",
                "status": "completed",
                "cleanliness": {"status": "clean", "confidence": 0.93},
                "integrity": {"status": "intact", "confidence": 0.88},
                "model_version": "v2",
                "processing_time_ms": 412
            }"#,
        )
        .unwrap();
        assert!(report.status.is_terminal());
        let cleanliness = report.cleanliness.unwrap();
        assert_eq!(cleanliness.status, "clean");
        assert!((cleanliness.confidence - 0.93).abs() < f64::EPSILON);
        assert_eq!(report.model_version.as_deref(), Some("v2"));
    }

    #[test]
    fn failed_report_carries_error_message() {
        let report: PredictionReport = serde_json::from_str(
            r#"{"id":"job-1","status":"failed","error_message":"model unavailable"}"#,
        )
        .unwrap();
        assert!(report.status.is_terminal());
        assert_eq!(report.error_message.as_deref(), Some("model unavailable"));
    }
}
