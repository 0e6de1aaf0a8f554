//! Broker snapshots: the registry's desired view and the platform's actual view.

use serde::{Deserialize, Serialize};

/// A broker the registry wants proxied, as reported by the broker source.
///
/// Immutable snapshot for the duration of one reconciliation pass. The `id`
/// is the registry-assigned identifier and doubles as the correlation key
/// embedded in proxy registration URLs (see [`crate::correlation`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredBroker {
    pub id: String,
    pub name: String,
    pub broker_url: String,
    /// Catalog of services offered by this broker. `None` means the registry
    /// did not return one; access reconciliation is skipped for such brokers.
    pub catalog: Option<Catalog>,
    /// Opaque registry metadata, passed through untouched.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Service/plan tree attached to a [`DesiredBroker`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<CatalogService>,
}

/// A service as described by the registry catalog.
///
/// `id` is the catalog-level identifier, NOT the platform-local GUID; the two
/// are joined by a lookup-by-unique-identifier query at access time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: String,
    pub name: String,
    pub plans: Vec<CatalogPlan>,
}

/// A plan as described by the registry catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPlan {
    pub id: String,
    pub name: String,
}

/// A broker registration that exists on the target platform.
///
/// One platform registration corresponds to at most one [`DesiredBroker`];
/// the join key is recovered from `broker_url`, never stored separately.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredBroker {
    /// Platform-assigned identifier.
    pub guid: String,
    pub name: String,
    pub broker_url: String,
}
