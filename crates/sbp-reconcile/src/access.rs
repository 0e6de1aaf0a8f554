//! Access-visibility state machine.
//!
//! Given a service or plan, an enable/disable intent, and an optional
//! scoping organization, decide and apply the minimal set of visibility
//! mutations on the platform.
//!
//! The global branch treats the plan's `public` flag as the single source of
//! truth and actively reconciles away any leftover per-organization grants
//! so state never silently diverges. The organization branch only ever
//! touches the narrow (plan, organization) pair and defers entirely to the
//! public flag when it already satisfies the intent.

use async_trait::async_trait;

use sbp_platform::{ServiceAccess, VisibilityOps};
use sbp_schemas::{AccessScope, PlatformPlan, PlatformService, VisibilityFilter};

// ---------------------------------------------------------------------------
// AccessError
// ---------------------------------------------------------------------------

/// Why an access call failed. Platform causes are preserved through the
/// error chain so logs can distinguish "platform rejected the call" from
/// local validation failures.
#[derive(Debug)]
pub enum AccessError {
    /// The scope payload was not valid JSON. No mutation was attempted.
    MalformedScope(serde_json::Error),
    /// Catalog-to-platform service resolution was absent or ambiguous.
    ServiceLookup { catalog_id: String, matches: usize },
    /// Catalog-to-platform plan resolution was absent or ambiguous.
    PlanLookup { catalog_id: String, matches: usize },
    /// A platform query or mutation failed; the remainder of the call was
    /// not applied.
    Platform(anyhow::Error),
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::MalformedScope(err) => {
                write!(f, "malformed access scope payload: {err}")
            }
            AccessError::ServiceLookup {
                catalog_id,
                matches,
            } => write!(
                f,
                "catalog service id '{catalog_id}' matched {matches} platform services, want exactly 1"
            ),
            AccessError::PlanLookup {
                catalog_id,
                matches,
            } => write!(
                f,
                "catalog plan id '{catalog_id}' matched {matches} platform plans, want exactly 1"
            ),
            AccessError::Platform(err) => write!(f, "platform call failed: {err}"),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessError::MalformedScope(err) => Some(err),
            AccessError::Platform(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AccessVisibilityReconciler
// ---------------------------------------------------------------------------

/// Drives the visibility state machine over a platform's low-level
/// visibility primitives.
///
/// Ids passed in are catalog-level identifiers; they are resolved to
/// platform-local records first, and a resolution that is absent or
/// ambiguous fails the call before any mutation.
pub struct AccessVisibilityReconciler<V: VisibilityOps> {
    ops: V,
}

impl<V: VisibilityOps> AccessVisibilityReconciler<V> {
    pub fn new(ops: V) -> Self {
        Self { ops }
    }

    /// Apply an access decision to every plan of a service.
    pub async fn set_service_access(
        &self,
        scope_payload: &[u8],
        service_id: &str,
        enabled: bool,
    ) -> Result<(), AccessError> {
        let scope = AccessScope::parse(scope_payload).map_err(AccessError::MalformedScope)?;
        let service = self.resolve_service(service_id).await?;
        let plans = self
            .ops
            .plans_for_service(&service.guid)
            .await
            .map_err(AccessError::Platform)?;
        for plan in &plans {
            self.apply_plan(&scope, plan, enabled).await?;
        }
        Ok(())
    }

    /// Apply an access decision to a single plan.
    pub async fn set_plan_access(
        &self,
        scope_payload: &[u8],
        plan_id: &str,
        enabled: bool,
    ) -> Result<(), AccessError> {
        let scope = AccessScope::parse(scope_payload).map_err(AccessError::MalformedScope)?;
        let plan = self.resolve_plan(plan_id).await?;
        self.apply_plan(&scope, &plan, enabled).await
    }

    /// Plan-level state machine. Any failure aborts the remaining steps so a
    /// partial state transition is never applied.
    async fn apply_plan(
        &self,
        scope: &AccessScope,
        plan: &PlatformPlan,
        enabled: bool,
    ) -> Result<(), AccessError> {
        match scope {
            AccessScope::Global => {
                // Clear stale per-organization grants before the global
                // decision, regardless of the intent or the current flag.
                let stale = self
                    .ops
                    .plan_visibilities(&VisibilityFilter::for_plan(&plan.guid))
                    .await
                    .map_err(AccessError::Platform)?;
                for visibility in &stale {
                    self.ops
                        .delete_plan_visibility(visibility)
                        .await
                        .map_err(AccessError::Platform)?;
                }
                if plan.public == enabled {
                    return Ok(());
                }
                self.ops
                    .update_plan_public(&plan.guid, enabled)
                    .await
                    .map_err(AccessError::Platform)
            }
            AccessScope::Organization(org) => {
                if plan.public {
                    // A public plan is reachable regardless of any grant.
                    tracing::info!(
                        plan = %plan.catalog_id,
                        organization = %org,
                        "plan is public; per-organization visibility has no effect"
                    );
                    return Ok(());
                }
                if enabled {
                    // Unconditional create: idempotent by recreation, not by
                    // checking for an existing grant.
                    self.ops
                        .create_plan_visibility(&plan.guid, org)
                        .await
                        .map_err(AccessError::Platform)
                } else {
                    let grants = self
                        .ops
                        .plan_visibilities(&VisibilityFilter::for_plan_and_org(&plan.guid, org))
                        .await
                        .map_err(AccessError::Platform)?;
                    for visibility in &grants {
                        self.ops
                            .delete_plan_visibility(visibility)
                            .await
                            .map_err(AccessError::Platform)?;
                    }
                    Ok(())
                }
            }
        }
    }

    async fn resolve_service(&self, catalog_id: &str) -> Result<PlatformService, AccessError> {
        let matches = self
            .ops
            .services_by_catalog_id(catalog_id)
            .await
            .map_err(AccessError::Platform)?;
        let count = matches.len();
        let mut it = matches.into_iter();
        match (it.next(), it.next()) {
            (Some(service), None) => Ok(service),
            _ => Err(AccessError::ServiceLookup {
                catalog_id: catalog_id.to_string(),
                matches: count,
            }),
        }
    }

    async fn resolve_plan(&self, catalog_id: &str) -> Result<PlatformPlan, AccessError> {
        let matches = self
            .ops
            .plans_by_catalog_id(catalog_id)
            .await
            .map_err(AccessError::Platform)?;
        let count = matches.len();
        let mut it = matches.into_iter();
        match (it.next(), it.next()) {
            (Some(plan), None) => Ok(plan),
            _ => Err(AccessError::PlanLookup {
                catalog_id: catalog_id.to_string(),
                matches: count,
            }),
        }
    }
}

/// The reconciler is itself a [`ServiceAccess`] capability, so the task can
/// drive either this state machine or a platform-native implementation.
#[async_trait]
impl<V: VisibilityOps> ServiceAccess for AccessVisibilityReconciler<V> {
    async fn enable_access_for_service(
        &self,
        scope_payload: &[u8],
        service_id: &str,
    ) -> anyhow::Result<()> {
        self.set_service_access(scope_payload, service_id, true)
            .await
            .map_err(anyhow::Error::new)
    }

    async fn disable_access_for_service(
        &self,
        scope_payload: &[u8],
        service_id: &str,
    ) -> anyhow::Result<()> {
        self.set_service_access(scope_payload, service_id, false)
            .await
            .map_err(anyhow::Error::new)
    }

    async fn enable_access_for_plan(
        &self,
        scope_payload: &[u8],
        plan_id: &str,
    ) -> anyhow::Result<()> {
        self.set_plan_access(scope_payload, plan_id, true)
            .await
            .map_err(anyhow::Error::new)
    }

    async fn disable_access_for_plan(
        &self,
        scope_payload: &[u8],
        plan_id: &str,
    ) -> anyhow::Result<()> {
        self.set_plan_access(scope_payload, plan_id, false)
            .await
            .map_err(anyhow::Error::new)
    }
}
