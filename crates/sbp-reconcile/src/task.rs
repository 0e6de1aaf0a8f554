//! One reconciliation pass: fetch desired and actual broker sets, diff,
//! apply create/fetch/delete, and trigger access reconciliation.

use std::collections::BTreeMap;

use sbp_config::Settings;
use sbp_platform::{BrokerSource, PlatformClient};
use sbp_schemas::{
    managed_broker_id, proxy_broker_name, proxy_broker_url, CreateBrokerRequest,
    DeleteBrokerRequest, DesiredBroker, RegisteredBroker,
};

use crate::tracker::RunTracker;

/// Scope payload used for catalog-driven access reconciliation: apply
/// globally, across all organizations.
const GLOBAL_SCOPE: &[u8] = b"{}";

// ---------------------------------------------------------------------------
// PassError / PassSummary
// ---------------------------------------------------------------------------

/// Fatal-to-the-pass failure: one of the two bulk fetches failed. The pass
/// aborts cleanly with no mutation attempted beyond the failed fetch.
#[derive(Debug)]
pub enum PassError {
    PlatformFetch(anyhow::Error),
    SourceFetch(anyhow::Error),
}

impl std::fmt::Display for PassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassError::PlatformFetch(err) => {
                write!(f, "listing platform brokers failed: {err}")
            }
            PassError::SourceFetch(err) => {
                write!(f, "listing desired brokers failed: {err}")
            }
        }
    }
}

impl std::error::Error for PassError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PassError::PlatformFetch(err) | PassError::SourceFetch(err) => Some(err.as_ref()),
        }
    }
}

/// What one pass did. Per-broker failures are counted, never propagated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub created: usize,
    pub deleted: usize,
    /// Catalog refreshes requested for already-registered brokers.
    pub refreshed: usize,
    /// Isolated per-broker or per-service failures (create, fetch, delete,
    /// access update).
    pub failures: usize,
}

// ---------------------------------------------------------------------------
// ReconciliationTask
// ---------------------------------------------------------------------------

/// Orchestrates one reconciliation pass. Invoked periodically by an external
/// scheduler; overlapping invocations are not mutually excluded here.
pub struct ReconciliationTask<S, P> {
    broker_prefix: String,
    proxy_base_path: String,
    source: S,
    platform: P,
    tracker: RunTracker,
}

impl<S, P> ReconciliationTask<S, P>
where
    S: BrokerSource,
    P: PlatformClient,
{
    pub fn new(settings: &Settings, source: S, platform: P) -> Self {
        Self {
            broker_prefix: settings.broker_prefix.clone(),
            proxy_base_path: settings.proxy_base_path.clone(),
            source,
            platform,
            tracker: RunTracker::new(),
        }
    }

    /// Handle the host process uses to drain an in-flight pass at shutdown.
    pub fn tracker(&self) -> RunTracker {
        self.tracker.clone()
    }

    /// Scheduler entry point. Never returns an error: all failures are
    /// terminal for this pass and logged, because the scheduler has no use
    /// for a return value.
    pub async fn run(&self) {
        let _guard = self.tracker.track();
        tracing::info!("reconciliation pass starting");
        match self.run_pass().await {
            Ok(summary) => tracing::info!(
                created = summary.created,
                deleted = summary.deleted,
                refreshed = summary.refreshed,
                failures = summary.failures,
                "reconciliation pass finished"
            ),
            Err(err) => tracing::error!(error = %err, "reconciliation pass aborted"),
        }
    }

    /// The sequential pass algorithm. Only the two bulk fetches are fatal;
    /// every per-broker operation is isolated.
    pub async fn run_pass(&self) -> Result<PassSummary, PassError> {
        let registered = self
            .platform
            .get_brokers()
            .await
            .map_err(PassError::PlatformFetch)?;

        // Managed set, keyed by the correlation id recovered from the URL.
        // Unmanaged registrations are invisible to this system.
        let mut managed: BTreeMap<String, RegisteredBroker> = BTreeMap::new();
        for broker in registered {
            if let Some(id) = managed_broker_id(&broker.broker_url, &self.proxy_base_path) {
                managed.insert(id.to_string(), broker);
            }
        }

        let desired = self
            .source
            .get_brokers()
            .await
            .map_err(PassError::SourceFetch)?;

        let mut summary = PassSummary::default();

        for broker in &desired {
            match managed.remove(&broker.id) {
                None => self.create_proxy_broker(broker, &mut summary).await,
                Some(existing) => self.refresh_catalog(broker, &existing, &mut summary).await,
            }
        }

        // Whatever remains is registered but no longer desired.
        for (id, orphan) in managed {
            let req = DeleteBrokerRequest {
                guid: orphan.guid.clone(),
                name: orphan.name.clone(),
            };
            match self.platform.delete_broker(&req).await {
                Ok(()) => {
                    summary.deleted += 1;
                    tracing::info!(broker = %id, name = %orphan.name, "deleted orphaned proxy registration");
                }
                Err(err) => {
                    summary.failures += 1;
                    tracing::error!(broker = %id, name = %orphan.name, error = %err, "deleting proxy registration failed");
                }
            }
        }

        Ok(summary)
    }

    async fn create_proxy_broker(&self, desired: &DesiredBroker, summary: &mut PassSummary) {
        let req = CreateBrokerRequest {
            name: proxy_broker_name(&self.broker_prefix, &desired.id),
            broker_url: proxy_broker_url(&self.proxy_base_path, &desired.id),
        };
        match self.platform.create_broker(&req).await {
            Ok(_) => {
                summary.created += 1;
                tracing::info!(broker = %desired.id, name = %req.name, "created proxy registration");
                self.reconcile_access(desired, summary).await;
            }
            Err(err) => {
                summary.failures += 1;
                tracing::error!(broker = %desired.id, name = %req.name, error = %err, "creating proxy registration failed");
            }
        }
    }

    async fn refresh_catalog(
        &self,
        desired: &DesiredBroker,
        existing: &RegisteredBroker,
        summary: &mut PassSummary,
    ) {
        // Capability-optional: a platform without a catalog fetcher is a
        // no-op here, not an error.
        if let Some(fetcher) = self.platform.catalog_fetcher() {
            match fetcher.fetch(existing).await {
                Ok(()) => {
                    summary.refreshed += 1;
                    tracing::info!(broker = %desired.id, name = %existing.name, "refreshed platform catalog");
                }
                Err(err) => {
                    summary.failures += 1;
                    tracing::error!(broker = %desired.id, name = %existing.name, error = %err, "catalog refresh failed");
                    // A failed refresh skips access reconciliation for this
                    // broker; the pass continues.
                    return;
                }
            }
        }
        self.reconcile_access(desired, summary).await;
    }

    async fn reconcile_access(&self, desired: &DesiredBroker, summary: &mut PassSummary) {
        let Some(catalog) = &desired.catalog else {
            tracing::error!(broker = %desired.id, "desired broker has no catalog; skipping access reconciliation");
            return;
        };
        let Some(access) = self.platform.service_access() else {
            return;
        };
        for service in &catalog.services {
            if let Err(err) = access
                .enable_access_for_service(GLOBAL_SCOPE, &service.id)
                .await
            {
                summary.failures += 1;
                tracing::error!(
                    broker = %desired.id,
                    service = %service.id,
                    error = %err,
                    "access reconciliation failed"
                );
            }
        }
    }
}
