//! sbp-testkit
//!
//! Deterministic recording fakes for the reconciliation core. No network
//! I/O; every platform mutation is recorded so scenario tests can assert on
//! exactly which calls a pass issued.

pub mod fake_platform;
pub mod fake_source;
pub mod fake_visibility;

pub use fake_platform::{AccessCall, AccessTarget, FakePlatform};
pub use fake_source::FakeBrokerSource;
pub use fake_visibility::FakeVisibilityOps;

use sbp_schemas::{Catalog, CatalogPlan, CatalogService, DesiredBroker};

/// Desired broker with no catalog.
pub fn desired_broker(id: &str) -> DesiredBroker {
    DesiredBroker {
        id: id.to_string(),
        name: format!("broker-{id}"),
        broker_url: format!("https://brokers.example.com/{id}"),
        catalog: None,
        metadata: serde_json::Value::Null,
    }
}

/// Desired broker with a one-service catalog.
pub fn desired_broker_with_services(id: &str, service_ids: &[&str]) -> DesiredBroker {
    let services = service_ids
        .iter()
        .map(|sid| CatalogService {
            id: sid.to_string(),
            name: format!("service-{sid}"),
            plans: vec![CatalogPlan {
                id: format!("{sid}-plan"),
                name: "default".to_string(),
            }],
        })
        .collect();
    DesiredBroker {
        catalog: Some(Catalog { services }),
        ..desired_broker(id)
    }
}
