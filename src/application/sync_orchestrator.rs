//! Fan-out sync orchestrator.
//!
//! One scheduled run enumerates every eligible sync target, invokes the
//! external review source per target, and collects one tagged report
//! entry per target. Failure isolation is the central discipline: no
//! target's failure may affect another target's outcome or abort the
//! batch. The orchestrator performs no retries; a failed target is
//! reported and left for the next scheduled run.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::review::ReviewItem;
use crate::domain::sync::{SyncError, SyncReport, SyncReportEntry, SyncTarget};
use crate::ports::{ReviewItemStore, ReviewSource, StoreError, SyncTargetStore};

/// Default bound on one provider call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates one fan-out run over all sync targets.
pub struct SyncOrchestrator {
    targets: Arc<dyn SyncTargetStore>,
    reviews: Arc<dyn ReviewItemStore>,
    source: Arc<dyn ReviewSource>,
    call_timeout: Duration,
}

impl SyncOrchestrator {
    pub fn new(
        targets: Arc<dyn SyncTargetStore>,
        reviews: Arc<dyn ReviewItemStore>,
        source: Arc<dyn ReviewSource>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            targets,
            reviews,
            source,
            call_timeout,
        }
    }

    /// Runs one fan-out pass.
    ///
    /// Targets run sequentially, each bounded by the per-call timeout so
    /// one unresponsive provider cannot stall the remainder of the
    /// batch. Every target yields exactly one report entry.
    ///
    /// # Errors
    ///
    /// Only enumeration failure is fatal; with no candidate set there is
    /// nothing to fan out to, so no partial report is produced.
    pub async fn run(&self) -> Result<SyncReport, StoreError> {
        let targets = self.targets.list_targets().await?;
        info!(target_count = targets.len(), "starting review sync run");

        let mut entries = Vec::with_capacity(targets.len());
        for target in &targets {
            let entry = match self.sync_target(target).await {
                Ok(imported) => {
                    info!(location = %target.location_id, imported, "target synced");
                    SyncReportEntry::success(target.location_id, imported)
                }
                Err(err) => {
                    warn!(location = %target.location_id, error = %err, "target sync failed");
                    SyncReportEntry::error(target.location_id, &err)
                }
            };
            entries.push(entry);
        }

        Ok(SyncReport {
            target_count: targets.len(),
            entries,
        })
    }

    /// Syncs one target: fetch, normalize, upsert, advance the window.
    async fn sync_target(&self, target: &SyncTarget) -> Result<usize, SyncError> {
        let window_end = Utc::now();

        let fetched = tokio::time::timeout(
            self.call_timeout,
            self.source.fetch_reviews(target, target.last_synced_at),
        )
        .await
        .map_err(|_| {
            SyncError::Provider(format!(
                "no response within {}s",
                self.call_timeout.as_secs()
            ))
        })??;

        let items: Vec<ReviewItem> = fetched
            .into_iter()
            .map(|review| {
                ReviewItem::imported(
                    target.org_id,
                    target.location_id,
                    review.external_id,
                    review.author,
                    review.text,
                    review.rating,
                    review.posted_at,
                )
            })
            .collect();

        let imported = self
            .reviews
            .upsert_imported(&items)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        self.targets
            .mark_synced(&target.location_id, window_end)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::foundation::{LocationId, OrgId, ReviewId};
    use crate::ports::{PendingReview, SourceReview};

    // ── Test infrastructure ──────────────────────────────────────────

    struct InMemoryTargets {
        targets: Vec<SyncTarget>,
        fail_enumeration: bool,
        synced: Mutex<Vec<LocationId>>,
    }

    impl InMemoryTargets {
        fn with(targets: Vec<SyncTarget>) -> Self {
            Self {
                targets,
                fail_enumeration: false,
                synced: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                targets: Vec::new(),
                fail_enumeration: true,
                synced: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SyncTargetStore for InMemoryTargets {
        async fn list_targets(&self) -> Result<Vec<SyncTarget>, StoreError> {
            if self.fail_enumeration {
                return Err(StoreError::Database("connection refused".to_string()));
            }
            Ok(self.targets.clone())
        }

        async fn mark_synced(
            &self,
            location_id: &LocationId,
            _at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.synced.lock().unwrap().push(*location_id);
            Ok(())
        }
    }

    struct InMemoryReviews {
        by_external_id: Mutex<HashMap<String, ReviewItem>>,
        fail_upserts: bool,
    }

    impl InMemoryReviews {
        fn new() -> Self {
            Self {
                by_external_id: Mutex::new(HashMap::new()),
                fail_upserts: false,
            }
        }

        fn failing() -> Self {
            Self {
                by_external_id: Mutex::new(HashMap::new()),
                fail_upserts: true,
            }
        }

        fn stored_count(&self) -> usize {
            self.by_external_id.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ReviewItemStore for InMemoryReviews {
        async fn upsert_imported(&self, items: &[ReviewItem]) -> Result<usize, StoreError> {
            if self.fail_upserts {
                return Err(StoreError::Database("write failed".to_string()));
            }
            let mut map = self.by_external_id.lock().unwrap();
            let mut inserted = 0;
            for item in items {
                if !map.contains_key(&item.external_id) {
                    map.insert(item.external_id.clone(), item.clone());
                    inserted += 1;
                }
            }
            Ok(inserted)
        }

        async fn list_pending(&self, _limit: usize) -> Result<Vec<PendingReview>, StoreError> {
            unimplemented!("not used by orchestrator tests")
        }

        async fn persist_transition(&self, _item: &ReviewItem) -> Result<(), StoreError> {
            unimplemented!("not used by orchestrator tests")
        }

        async fn find_by_id(&self, _id: &ReviewId) -> Result<Option<ReviewItem>, StoreError> {
            unimplemented!("not used by orchestrator tests")
        }
    }

    /// Source whose behavior is keyed by the target's credential.
    struct ScriptedSource {
        delay: Option<Duration>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self { delay: None }
        }

        fn slow(delay: Duration) -> Self {
            Self { delay: Some(delay) }
        }
    }

    #[async_trait]
    impl ReviewSource for ScriptedSource {
        async fn fetch_reviews(
            &self,
            target: &SyncTarget,
            _since: Option<DateTime<Utc>>,
        ) -> Result<Vec<SourceReview>, SyncError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match target.credential.as_str() {
                "bad-token" => Err(SyncError::Auth("credential expired".to_string())),
                "flaky" => Err(SyncError::Provider("502 Bad Gateway".to_string())),
                _ => Ok(vec![
                    SourceReview {
                        external_id: format!("{}-r1", target.external_ref),
                        author: Some("A. Customer".to_string()),
                        text: "Great service".to_string(),
                        rating: 5,
                        posted_at: Utc::now(),
                    },
                    SourceReview {
                        external_id: format!("{}-r2", target.external_ref),
                        author: None,
                        text: "Slow checkout".to_string(),
                        rating: 2,
                        posted_at: Utc::now(),
                    },
                ]),
            }
        }
    }

    fn target(credential: &str, external_ref: &str) -> SyncTarget {
        SyncTarget {
            location_id: LocationId::new(),
            org_id: OrgId::new(),
            external_ref: external_ref.to_string(),
            credential: credential.to_string(),
            last_synced_at: None,
        }
    }

    fn orchestrator(
        targets: InMemoryTargets,
        reviews: InMemoryReviews,
        source: ScriptedSource,
        timeout: Duration,
    ) -> (SyncOrchestrator, Arc<InMemoryTargets>, Arc<InMemoryReviews>) {
        let targets = Arc::new(targets);
        let reviews = Arc::new(reviews);
        let orchestrator = SyncOrchestrator::new(
            targets.clone(),
            reviews.clone(),
            Arc::new(source),
            timeout,
        );
        (orchestrator, targets, reviews)
    }

    // ── Tests ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn all_targets_sync_and_report_imported_counts() {
        let (orchestrator, targets, reviews) = orchestrator(
            InMemoryTargets::with(vec![target("ok", "loc-a"), target("ok", "loc-b")]),
            InMemoryReviews::new(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.target_count, 2);
        assert_eq!(report.entries.len(), 2);
        assert!(report.entries.iter().all(|e| e.is_success()));
        assert_eq!(report.total_imported(), 4);
        assert_eq!(reviews.stored_count(), 4);
        assert_eq!(targets.synced.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn one_failing_target_does_not_prevent_the_others() {
        let (orchestrator, targets, _reviews) = orchestrator(
            InMemoryTargets::with(vec![
                target("ok", "loc-a"),
                target("bad-token", "loc-b"),
                target("ok", "loc-c"),
            ]),
            InMemoryReviews::new(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.failure_count(), 1);
        assert!(report.entries[0].is_success());
        assert!(!report.entries[1].is_success());
        assert!(report.entries[2].is_success());
        // The failed target's window is not advanced.
        assert_eq!(targets.synced.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn provider_errors_are_reported_with_detail() {
        let (orchestrator, _, _) = orchestrator(
            InMemoryTargets::with(vec![target("flaky", "loc-a")]),
            InMemoryReviews::new(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let report = orchestrator.run().await.unwrap();

        let json = serde_json::to_value(&report.entries[0]).unwrap();
        assert_eq!(json["outcome"], "error");
        assert_eq!(json["detail"], "provider error: 502 Bad Gateway");
    }

    #[tokio::test]
    async fn enumeration_failure_aborts_the_run_without_a_partial_report() {
        let (orchestrator, _, _) = orchestrator(
            InMemoryTargets::failing(),
            InMemoryReviews::new(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let result = orchestrator.run().await;

        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn store_failure_is_isolated_to_the_target_as_an_error_entry() {
        let (orchestrator, _, _) = orchestrator(
            InMemoryTargets::with(vec![target("ok", "loc-a")]),
            InMemoryReviews::failing(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.entries.len(), 1);
        assert!(!report.entries[0].is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn unresponsive_provider_is_cut_off_by_the_call_timeout() {
        let (orchestrator, _, _) = orchestrator(
            InMemoryTargets::with(vec![target("ok", "loc-a"), target("ok", "loc-b")]),
            InMemoryReviews::new(),
            ScriptedSource::slow(Duration::from_secs(120)),
            Duration::from_secs(5),
        );

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failure_count(), 2);
        let json = serde_json::to_value(&report.entries[0]).unwrap();
        assert_eq!(json["detail"], "provider error: no response within 5s");
    }

    #[tokio::test]
    async fn resyncing_the_same_reviews_imports_nothing_new() {
        let (orchestrator, _, reviews) = orchestrator(
            InMemoryTargets::with(vec![target("ok", "loc-a")]),
            InMemoryReviews::new(),
            ScriptedSource::new(),
            DEFAULT_CALL_TIMEOUT,
        );

        let first = orchestrator.run().await.unwrap();
        let second = orchestrator.run().await.unwrap();

        assert_eq!(first.total_imported(), 2);
        assert_eq!(second.total_imported(), 0);
        assert_eq!(reviews.stored_count(), 2);
    }
}
