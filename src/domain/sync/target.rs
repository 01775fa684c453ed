//! Sync targets.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LocationId, OrgId};

/// One externally-tracked location subject to periodic review sync.
///
/// Targets are created when an organization links its external account
/// (onboarding flow, outside this crate) and are read-only here. Every
/// target carries everything one sync call needs, so targets are
/// independently retryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    pub location_id: LocationId,
    pub org_id: OrgId,
    /// Handle the external platform uses for this location.
    pub external_ref: String,
    /// Reference to the organization's stored provider credential.
    pub credential: String,
    /// End of the last successful sync window; `None` before the first
    /// successful run, which then imports the full history.
    pub last_synced_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_serializes_with_external_ref() {
        let target = SyncTarget {
            location_id: LocationId::new(),
            org_id: OrgId::new(),
            external_ref: "places/abc123".to_string(),
            credential: "tok_org_1".to_string(),
            last_synced_at: None,
        };
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["external_ref"], "places/abc123");
    }
}
