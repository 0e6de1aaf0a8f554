//! sbp-platform
//!
//! Consumed external interfaces. The reconciliation core never talks HTTP
//! itself; concrete registry and platform clients (CF-style or
//! Kubernetes-style) implement these traits elsewhere and are injected
//! through constructors, so the core is tested against substitutable fakes
//! without mutable global state.
//!
//! Capability-optional collaborators ([`CatalogFetcher`], [`ServiceAccess`])
//! are surfaced as `Option<&dyn …>` accessors on [`PlatformClient`]. A
//! platform either exposes the capability or it doesn't; absence is a no-op
//! at the call site, never an error.
//!
//! Cancellation: callers cancel an in-flight platform call by dropping its
//! future; the resulting failure is handled by the ordinary per-broker or
//! pass-level error rules. No retries happen at this layer.

use anyhow::Result;
use async_trait::async_trait;

use sbp_schemas::{
    CreateBrokerRequest, DeleteBrokerRequest, DesiredBroker, PlanVisibility, PlatformPlan,
    PlatformService, RegisteredBroker, UpdateBrokerRequest, VisibilityFilter,
};

/// Supplies the desired broker set from the central registry.
#[async_trait]
pub trait BrokerSource: Send + Sync {
    async fn get_brokers(&self) -> Result<Vec<DesiredBroker>>;
}

/// CRUD for broker registrations on the target platform.
#[async_trait]
pub trait PlatformRegistry: Send + Sync {
    async fn get_brokers(&self) -> Result<Vec<RegisteredBroker>>;

    async fn create_broker(&self, req: &CreateBrokerRequest) -> Result<RegisteredBroker>;

    async fn delete_broker(&self, req: &DeleteBrokerRequest) -> Result<()>;

    async fn update_broker(&self, req: &UpdateBrokerRequest) -> Result<RegisteredBroker>;
}

/// Optional capability: ask the platform to refresh a broker's cached
/// catalog.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, broker: &RegisteredBroker) -> Result<()>;
}

/// Optional capability: grant/revoke visibility of a service or plan.
///
/// `scope_payload` is an opaque JSON blob (see `sbp_schemas::AccessScope`);
/// ids are catalog-level identifiers, resolved to platform-local ones by the
/// implementation.
#[async_trait]
pub trait ServiceAccess: Send + Sync {
    async fn enable_access_for_service(&self, scope_payload: &[u8], service_id: &str)
        -> Result<()>;

    async fn disable_access_for_service(
        &self,
        scope_payload: &[u8],
        service_id: &str,
    ) -> Result<()>;

    async fn enable_access_for_plan(&self, scope_payload: &[u8], plan_id: &str) -> Result<()>;

    async fn disable_access_for_plan(&self, scope_payload: &[u8], plan_id: &str) -> Result<()>;
}

/// Low-level visibility primitives the access state machine drives.
///
/// Visibilities are queried and mutated live on every call; nothing is
/// cached, so staleness cannot occur but every decision pays a round trip.
#[async_trait]
pub trait VisibilityOps: Send + Sync {
    /// Platform services whose catalog identifier equals `catalog_id`.
    async fn services_by_catalog_id(&self, catalog_id: &str) -> Result<Vec<PlatformService>>;

    /// Platform plans whose catalog identifier equals `catalog_id`.
    async fn plans_by_catalog_id(&self, catalog_id: &str) -> Result<Vec<PlatformPlan>>;

    /// All plans belonging to a platform service.
    async fn plans_for_service(&self, service_guid: &str) -> Result<Vec<PlatformPlan>>;

    async fn plan_visibilities(&self, filter: &VisibilityFilter) -> Result<Vec<PlanVisibility>>;

    async fn create_plan_visibility(&self, plan_guid: &str, organization_guid: &str)
        -> Result<()>;

    async fn delete_plan_visibility(&self, visibility: &PlanVisibility) -> Result<()>;

    /// Flip a plan's platform-side `public` flag.
    async fn update_plan_public(&self, plan_guid: &str, public: bool) -> Result<()>;
}

/// A platform client: registration CRUD plus whatever optional capabilities
/// the concrete platform supports.
///
/// The defaults return `None`, so a minimal backend only implements
/// [`PlatformRegistry`]. The orchestrator checks each capability at the call
/// site and treats absence as a no-op.
pub trait PlatformClient: PlatformRegistry {
    fn catalog_fetcher(&self) -> Option<&dyn CatalogFetcher> {
        None
    }

    fn service_access(&self) -> Option<&dyn ServiceAccess> {
        None
    }
}
