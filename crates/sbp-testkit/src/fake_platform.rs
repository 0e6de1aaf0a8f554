//! Recording fake for the target platform client.
//!
//! Implements registration CRUD plus both optional capabilities; either
//! capability can be switched off to exercise the orchestrator's
//! absence-is-a-no-op paths.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use uuid::Uuid;

use sbp_platform::{CatalogFetcher, PlatformClient, PlatformRegistry, ServiceAccess};
use sbp_schemas::{
    CreateBrokerRequest, DeleteBrokerRequest, RegisteredBroker, UpdateBrokerRequest,
};

/// One recorded access-capability invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessCall {
    pub scope_payload: Vec<u8>,
    pub target: AccessTarget,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessTarget {
    Service(String),
    Plan(String),
}

#[derive(Default)]
struct Inner {
    brokers: Vec<RegisteredBroker>,
    created: Vec<CreateBrokerRequest>,
    updated: Vec<UpdateBrokerRequest>,
    deleted: Vec<DeleteBrokerRequest>,
    fetched: Vec<String>,
    access_calls: Vec<AccessCall>,
    fail_get: bool,
    fail_create_names: HashSet<String>,
    catalog_fetcher_enabled: bool,
    service_access_enabled: bool,
}

/// In-memory platform. Clones share state (see [`crate::FakeBrokerSource`]).
///
/// Both optional capabilities are enabled by default.
#[derive(Clone)]
pub struct FakePlatform {
    inner: Arc<Mutex<Inner>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                catalog_fetcher_enabled: true,
                service_access_enabled: true,
                ..Inner::default()
            })),
        }
    }

    /// Platform that does not expose the catalog-refresh capability.
    pub fn without_catalog_fetcher(self) -> Self {
        self.inner.lock().unwrap().catalog_fetcher_enabled = false;
        self
    }

    /// Platform that does not expose the access capability.
    pub fn without_service_access(self) -> Self {
        self.inner.lock().unwrap().service_access_enabled = false;
        self
    }

    /// Seed an existing registration.
    pub fn add_registered(&self, name: &str, broker_url: &str) -> RegisteredBroker {
        let broker = RegisteredBroker {
            guid: Uuid::new_v4().to_string(),
            name: name.to_string(),
            broker_url: broker_url.to_string(),
        };
        self.inner.lock().unwrap().brokers.push(broker.clone());
        broker
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.inner.lock().unwrap().fail_get = fail;
    }

    /// Make `create_broker` fail for the given registration name.
    pub fn fail_create_for(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_create_names
            .insert(name.to_string());
    }

    pub fn registered(&self) -> Vec<RegisteredBroker> {
        self.inner.lock().unwrap().brokers.clone()
    }

    pub fn created(&self) -> Vec<CreateBrokerRequest> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<UpdateBrokerRequest> {
        self.inner.lock().unwrap().updated.clone()
    }

    pub fn deleted(&self) -> Vec<DeleteBrokerRequest> {
        self.inner.lock().unwrap().deleted.clone()
    }

    /// Names of brokers whose catalog was refreshed.
    pub fn fetched(&self) -> Vec<String> {
        self.inner.lock().unwrap().fetched.clone()
    }

    pub fn access_calls(&self) -> Vec<AccessCall> {
        self.inner.lock().unwrap().access_calls.clone()
    }

    fn record_access(&self, scope_payload: &[u8], target: AccessTarget, enabled: bool) {
        self.inner.lock().unwrap().access_calls.push(AccessCall {
            scope_payload: scope_payload.to_vec(),
            target,
            enabled,
        });
    }
}

#[async_trait]
impl PlatformRegistry for FakePlatform {
    async fn get_brokers(&self) -> Result<Vec<RegisteredBroker>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_get {
            bail!("platform listing unavailable");
        }
        Ok(inner.brokers.clone())
    }

    async fn create_broker(&self, req: &CreateBrokerRequest) -> Result<RegisteredBroker> {
        let mut inner = self.inner.lock().unwrap();
        inner.created.push(req.clone());
        if inner.fail_create_names.contains(&req.name) {
            bail!("platform rejected create of '{}'", req.name);
        }
        let broker = RegisteredBroker {
            guid: Uuid::new_v4().to_string(),
            name: req.name.clone(),
            broker_url: req.broker_url.clone(),
        };
        inner.brokers.push(broker.clone());
        Ok(broker)
    }

    async fn delete_broker(&self, req: &DeleteBrokerRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.deleted.push(req.clone());
        inner.brokers.retain(|b| b.guid != req.guid);
        Ok(())
    }

    async fn update_broker(&self, req: &UpdateBrokerRequest) -> Result<RegisteredBroker> {
        let mut inner = self.inner.lock().unwrap();
        inner.updated.push(req.clone());
        let broker = inner
            .brokers
            .iter_mut()
            .find(|b| b.guid == req.guid)
            .ok_or_else(|| anyhow::anyhow!("no broker with guid '{}'", req.guid))?;
        broker.name = req.name.clone();
        broker.broker_url = req.broker_url.clone();
        Ok(broker.clone())
    }
}

#[async_trait]
impl CatalogFetcher for FakePlatform {
    async fn fetch(&self, broker: &RegisteredBroker) -> Result<()> {
        self.inner.lock().unwrap().fetched.push(broker.name.clone());
        Ok(())
    }
}

#[async_trait]
impl ServiceAccess for FakePlatform {
    async fn enable_access_for_service(
        &self,
        scope_payload: &[u8],
        service_id: &str,
    ) -> Result<()> {
        self.record_access(scope_payload, AccessTarget::Service(service_id.into()), true);
        Ok(())
    }

    async fn disable_access_for_service(
        &self,
        scope_payload: &[u8],
        service_id: &str,
    ) -> Result<()> {
        self.record_access(
            scope_payload,
            AccessTarget::Service(service_id.into()),
            false,
        );
        Ok(())
    }

    async fn enable_access_for_plan(&self, scope_payload: &[u8], plan_id: &str) -> Result<()> {
        self.record_access(scope_payload, AccessTarget::Plan(plan_id.into()), true);
        Ok(())
    }

    async fn disable_access_for_plan(&self, scope_payload: &[u8], plan_id: &str) -> Result<()> {
        self.record_access(scope_payload, AccessTarget::Plan(plan_id.into()), false);
        Ok(())
    }
}

impl PlatformClient for FakePlatform {
    fn catalog_fetcher(&self) -> Option<&dyn CatalogFetcher> {
        if self.inner.lock().unwrap().catalog_fetcher_enabled {
            Some(self)
        } else {
            None
        }
    }

    fn service_access(&self) -> Option<&dyn ServiceAccess> {
        if self.inner.lock().unwrap().service_access_enabled {
            Some(self)
        } else {
            None
        }
    }
}
