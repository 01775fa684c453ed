//! HTTP DTOs for the job and webhook endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{DraftOutcome, WebhookDisposition};
use crate::domain::sync::SyncReport;

/// Query parameters for the draft batch job.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftJobQuery {
    /// Batch size cap. Defaults to 10 items per run.
    #[serde(default = "default_draft_limit")]
    pub limit: usize,
}

fn default_draft_limit() -> usize {
    10
}

impl Default for DraftJobQuery {
    fn default() -> Self {
        Self {
            limit: default_draft_limit(),
        }
    }
}

/// Response body for a completed sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncJobResponse {
    pub target_count: usize,
    pub imported: usize,
    pub failed: usize,
    pub report: SyncReport,
}

impl From<SyncReport> for SyncJobResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            target_count: report.target_count,
            imported: report.total_imported(),
            failed: report.failure_count(),
            report,
        }
    }
}

/// Response body for a completed draft batch.
#[derive(Debug, Clone, Serialize)]
pub struct DraftJobResponse {
    pub processed: usize,
    pub outcomes: Vec<DraftOutcome>,
}

/// Acknowledgement body for an accepted webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
}

impl WebhookAck {
    pub fn from_disposition(disposition: &WebhookDisposition) -> Self {
        let label = match disposition {
            WebhookDisposition::Applied { plan, .. } => format!("applied:{plan}"),
            WebhookDisposition::Ignored { event_type } => format!("ignored:{event_type}"),
        };
        Self {
            received: true,
            disposition: Some(label),
        }
    }
}

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_query_defaults_to_ten() {
        let query: DraftJobQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn draft_query_accepts_explicit_limit() {
        let query: DraftJobQuery = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert_eq!(query.limit, 3);
    }

    #[test]
    fn sync_response_summarizes_the_report() {
        use crate::domain::foundation::LocationId;
        use crate::domain::sync::{SyncError, SyncReportEntry};

        let report = SyncReport {
            target_count: 2,
            entries: vec![
                SyncReportEntry::success(LocationId::new(), 4),
                SyncReportEntry::error(
                    LocationId::new(),
                    &SyncError::Auth("token expired".to_string()),
                ),
            ],
        };

        let response = SyncJobResponse::from(report);
        assert_eq!(response.target_count, 2);
        assert_eq!(response.imported, 4);
        assert_eq!(response.failed, 1);
    }
}
