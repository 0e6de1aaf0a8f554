//! sbp-schemas
//!
//! Shared data model for the broker-proxy reconciliation core.
//!
//! Everything here is a plain in-memory snapshot: desired brokers come from
//! the registry, registered brokers and plan/visibility records come from the
//! platform, and nothing is cached across reconciliation passes.

pub mod broker;
pub mod correlation;
pub mod platform;
pub mod scope;

pub use broker::{Catalog, CatalogPlan, CatalogService, DesiredBroker, RegisteredBroker};
pub use correlation::{managed_broker_id, proxy_broker_name, proxy_broker_url};
pub use platform::{
    CreateBrokerRequest, DeleteBrokerRequest, PlanVisibility, PlatformPlan, PlatformService,
    UpdateBrokerRequest, VisibilityFilter,
};
pub use scope::AccessScope;
