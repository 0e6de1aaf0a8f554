//! Platform-local records and request shapes for registration CRUD.

use serde::{Deserialize, Serialize};

/// Request to create a proxy broker registration on the platform.
///
/// Credentials for the created registration are supplied by the
/// platform-specific client, not by the reconciliation core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBrokerRequest {
    pub name: String,
    pub broker_url: String,
}

/// Request to update an existing registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBrokerRequest {
    pub guid: String,
    pub name: String,
    pub broker_url: String,
}

/// Request to delete a registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBrokerRequest {
    pub guid: String,
    pub name: String,
}

/// A service as the platform sees it, joined to the registry catalog by
/// `catalog_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformService {
    pub guid: String,
    pub catalog_id: String,
}

/// A plan as the platform sees it.
///
/// `public` is platform state, never registry state: a public plan is
/// reachable by every organization regardless of visibility grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPlan {
    pub guid: String,
    pub catalog_id: String,
    pub public: bool,
}

/// A visibility grant associating one plan with one organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVisibility {
    pub guid: String,
    pub plan_guid: String,
    pub organization_guid: String,
}

/// Filter for querying visibilities live on the platform. No local cache of
/// visibilities is kept, so every access decision pays a query round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityFilter {
    pub plan_guid: String,
    /// `None` matches grants for any organization.
    pub organization_guid: Option<String>,
}

impl VisibilityFilter {
    /// All grants for a plan, any organization.
    pub fn for_plan(plan_guid: impl Into<String>) -> Self {
        Self {
            plan_guid: plan_guid.into(),
            organization_guid: None,
        }
    }

    /// Grants for one (plan, organization) pair.
    pub fn for_plan_and_org(
        plan_guid: impl Into<String>,
        organization_guid: impl Into<String>,
    ) -> Self {
        Self {
            plan_guid: plan_guid.into(),
            organization_guid: Some(organization_guid.into()),
        }
    }

    /// Whether a grant matches this filter.
    pub fn matches(&self, visibility: &PlanVisibility) -> bool {
        if visibility.plan_guid != self.plan_guid {
            return false;
        }
        match &self.organization_guid {
            Some(org) => &visibility.organization_guid == org,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vis(plan: &str, org: &str) -> PlanVisibility {
        PlanVisibility {
            guid: format!("v-{plan}-{org}"),
            plan_guid: plan.to_string(),
            organization_guid: org.to_string(),
        }
    }

    #[test]
    fn plan_filter_matches_any_org() {
        let f = VisibilityFilter::for_plan("p1");
        assert!(f.matches(&vis("p1", "o1")));
        assert!(f.matches(&vis("p1", "o2")));
        assert!(!f.matches(&vis("p2", "o1")));
    }

    #[test]
    fn pair_filter_matches_exact_org_only() {
        let f = VisibilityFilter::for_plan_and_org("p1", "o1");
        assert!(f.matches(&vis("p1", "o1")));
        assert!(!f.matches(&vis("p1", "o2")));
    }
}
