//! Recording fake for the low-level visibility primitives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use sbp_platform::VisibilityOps;
use sbp_schemas::{PlanVisibility, PlatformPlan, PlatformService, VisibilityFilter};

#[derive(Default)]
struct Inner {
    services: Vec<PlatformService>,
    plans: Vec<PlatformPlan>,
    /// service guid -> plan guids
    service_plans: HashMap<String, Vec<String>>,
    visibilities: Vec<PlanVisibility>,
    created: Vec<(String, String)>,
    deleted: Vec<PlanVisibility>,
    public_updates: Vec<(String, bool)>,
    visibility_queries: usize,
    fail_delete: bool,
    next_guid: u64,
}

impl Inner {
    fn mint_guid(&mut self) -> String {
        self.next_guid += 1;
        format!("vis-{:04}", self.next_guid)
    }
}

/// In-memory visibility store. Clones share state.
#[derive(Clone, Default)]
pub struct FakeVisibilityOps {
    inner: Arc<Mutex<Inner>>,
}

impl FakeVisibilityOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service(&self, guid: &str, catalog_id: &str) {
        self.inner.lock().unwrap().services.push(PlatformService {
            guid: guid.to_string(),
            catalog_id: catalog_id.to_string(),
        });
    }

    /// Register a plan, optionally attached to a service.
    pub fn add_plan(&self, guid: &str, catalog_id: &str, public: bool, service_guid: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        inner.plans.push(PlatformPlan {
            guid: guid.to_string(),
            catalog_id: catalog_id.to_string(),
            public,
        });
        if let Some(service) = service_guid {
            inner
                .service_plans
                .entry(service.to_string())
                .or_default()
                .push(guid.to_string());
        }
    }

    /// Seed an existing grant.
    pub fn add_visibility(&self, plan_guid: &str, organization_guid: &str) {
        let mut inner = self.inner.lock().unwrap();
        let guid = inner.mint_guid();
        inner.visibilities.push(PlanVisibility {
            guid,
            plan_guid: plan_guid.to_string(),
            organization_guid: organization_guid.to_string(),
        });
    }

    /// Make `delete_plan_visibility` fail.
    pub fn set_fail_delete(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete = fail;
    }

    pub fn visibilities(&self) -> Vec<PlanVisibility> {
        self.inner.lock().unwrap().visibilities.clone()
    }

    /// Grants created through the ops interface, as (plan, org) pairs.
    pub fn created(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn deleted(&self) -> Vec<PlanVisibility> {
        self.inner.lock().unwrap().deleted.clone()
    }

    /// Public-flag updates issued, as (plan, public) pairs.
    pub fn public_updates(&self) -> Vec<(String, bool)> {
        self.inner.lock().unwrap().public_updates.clone()
    }

    /// Number of visibility queries observed.
    pub fn visibility_queries(&self) -> usize {
        self.inner.lock().unwrap().visibility_queries
    }

    pub fn plan_public(&self, plan_guid: &str) -> Option<bool> {
        self.inner
            .lock()
            .unwrap()
            .plans
            .iter()
            .find(|p| p.guid == plan_guid)
            .map(|p| p.public)
    }
}

#[async_trait]
impl VisibilityOps for FakeVisibilityOps {
    async fn services_by_catalog_id(&self, catalog_id: &str) -> Result<Vec<PlatformService>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .services
            .iter()
            .filter(|s| s.catalog_id == catalog_id)
            .cloned()
            .collect())
    }

    async fn plans_by_catalog_id(&self, catalog_id: &str) -> Result<Vec<PlatformPlan>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .plans
            .iter()
            .filter(|p| p.catalog_id == catalog_id)
            .cloned()
            .collect())
    }

    async fn plans_for_service(&self, service_guid: &str) -> Result<Vec<PlatformPlan>> {
        let inner = self.inner.lock().unwrap();
        let guids = inner
            .service_plans
            .get(service_guid)
            .cloned()
            .unwrap_or_default();
        Ok(inner
            .plans
            .iter()
            .filter(|p| guids.contains(&p.guid))
            .cloned()
            .collect())
    }

    async fn plan_visibilities(&self, filter: &VisibilityFilter) -> Result<Vec<PlanVisibility>> {
        let mut inner = self.inner.lock().unwrap();
        inner.visibility_queries += 1;
        Ok(inner
            .visibilities
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }

    async fn create_plan_visibility(
        &self,
        plan_guid: &str,
        organization_guid: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .created
            .push((plan_guid.to_string(), organization_guid.to_string()));
        let guid = inner.mint_guid();
        inner.visibilities.push(PlanVisibility {
            guid,
            plan_guid: plan_guid.to_string(),
            organization_guid: organization_guid.to_string(),
        });
        Ok(())
    }

    async fn delete_plan_visibility(&self, visibility: &PlanVisibility) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_delete {
            bail!("platform rejected visibility delete '{}'", visibility.guid);
        }
        inner.deleted.push(visibility.clone());
        inner.visibilities.retain(|v| v.guid != visibility.guid);
        Ok(())
    }

    async fn update_plan_public(&self, plan_guid: &str, public: bool) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.public_updates.push((plan_guid.to_string(), public));
        if let Some(plan) = inner.plans.iter_mut().find(|p| p.guid == plan_guid) {
            plan.public = public;
        }
        Ok(())
    }
}
