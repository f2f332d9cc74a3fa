//! Organization removal service
//!
//! Runs the full removal flow for one request:
//!
//! 1. Resolve the target key, then the caller, and check the caller is verified
//! 2. Load the organization through a request-scoped loader
//! 3. Gate on the caller's permission and the organization's verified flag
//! 4. Scope the cascade with two pre-transaction reads
//! 5. Apply the ordered steps in one transaction and commit
//!
//! Every terminal outcome records exactly one audit line.

use std::sync::Arc;
use tracing::{debug, info, warn};
use tracker_org::{clean_input, GlobalId, Locale, Organization};
use tracker_rbac::{AuthorizationProvider, Denial, RemovalDecision, User};
use tracker_store::{
    collect_rows, DomainClaimCount, GraphStore, OrganizationLoader, OwnedDomain, ReadQuery,
    StoreOrgLoader,
};

use crate::audit::{AuditLevel, AuditLog, TracingAuditLog};
use crate::config::RemovalConfig;
use crate::error::{CascadeRead, Failure, RemovalError, ServiceResult};
use crate::i18n::{Catalog, Localizer, Message};
use crate::plan::{RemovalPlan, REMOVAL_COLLECTIONS};
use crate::result::{OrganizationError, OrganizationResult, RemovalResult, RemovedOrganization};

/// Global id type name for organizations.
pub const ORGANIZATION_TYPE: &str = "Organization";

/// Service removing organizations and their exclusively-held data.
#[derive(Clone)]
pub struct OrganizationRemovalService {
    store: Arc<dyn GraphStore>,
    auth: Arc<dyn AuthorizationProvider>,
    localizer: Arc<dyn Localizer>,
    audit: Arc<dyn AuditLog>,
    config: RemovalConfig,
}

impl std::fmt::Debug for OrganizationRemovalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationRemovalService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OrganizationRemovalService {
    /// Create a service with the built-in catalog and tracing audit sink.
    pub fn new(store: Arc<dyn GraphStore>, auth: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            store,
            auth,
            localizer: Arc::new(Catalog),
            audit: Arc::new(TracingAuditLog),
            config: RemovalConfig::default(),
        }
    }

    /// Replace the message localizer.
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Replace the audit sink.
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: RemovalConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Remove an organization, answering in the locale named by a request's
    /// language tag.
    ///
    /// Missing or unsupported tags fall back to the configured default
    /// locale.
    pub async fn remove_organization_with_language(
        &self,
        caller_key: &str,
        org_id: &str,
        language: Option<&str>,
    ) -> ServiceResult<RemovalResult> {
        let locale = self.config.resolve_locale(language);
        self.remove_organization(caller_key, org_id, locale).await
    }

    /// Remove an organization on behalf of a caller.
    ///
    /// `org_id` is the organization's global id. Returns the result union
    /// for success, unknown organizations and permission denials. Returns
    /// an error when the caller cannot be authenticated or anything
    /// internal fails; nothing is written in that case.
    pub async fn remove_organization(
        &self,
        caller_key: &str,
        org_id: &str,
        locale: Locale,
    ) -> ServiceResult<RemovalResult> {
        let loader = StoreOrgLoader::new(self.store.clone());
        self.remove_organization_with_loader(&loader, caller_key, org_id, locale)
            .await
    }

    /// Remove an organization using a caller-supplied loader.
    #[tracing::instrument(skip(self, loader))]
    pub async fn remove_organization_with_loader(
        &self,
        loader: &dyn OrganizationLoader,
        caller_key: &str,
        org_id: &str,
        locale: Locale,
    ) -> ServiceResult<RemovalResult> {
        let org_key = resolve_org_key(org_id);

        let user = match self.auth.user_required(caller_key).await {
            Ok(user) => user,
            Err(err) if err.is_server_error() => {
                let failure = Failure::CallerLookup(err);
                return Err(self.fail(failure, caller_key, &org_key, locale));
            }
            Err(err) => return Err(err.into()),
        };
        self.auth.verified_required(&user)?;
        debug!(user = %user.key, org = %org_key, "Resolved removal target");

        self.run(loader, &user, &org_key, locale)
            .await
            .map_err(|failure| self.fail(failure, &user.key, &org_key, locale))
    }

    /// Audit an internal failure and hide it behind the generic message.
    fn fail(
        &self,
        failure: Failure,
        user_key: &str,
        org_key: &str,
        locale: Locale,
    ) -> RemovalError {
        self.audit
            .record(AuditLevel::Error, &failure.audit_line(user_key, org_key));
        RemovalError::Failed {
            message: self.localizer.translate(locale, &Message::RemovalFailed),
        }
    }

    async fn run(
        &self,
        loader: &dyn OrganizationLoader,
        user: &User,
        org_key: &str,
        locale: Locale,
    ) -> Result<RemovalResult, Failure> {
        let org = match loader
            .load_org_by_key(org_key)
            .await
            .map_err(Failure::LoadOrganization)?
        {
            Some(org) => org,
            None => {
                self.audit.record(
                    AuditLevel::Warn,
                    &format!(
                        "User: {} attempted to remove org: {}, but there is no org associated with that id.",
                        user.key, org_key
                    ),
                );
                return Ok(self.rejection(400, locale, &Message::UnknownOrganization));
            }
        };

        let permission = self
            .auth
            .check_permission(user, &org.id())
            .await
            .map_err(Failure::PermissionCheck)?;

        if let RemovalDecision::Denied(denial) = RemovalDecision::evaluate(permission, org.verified)
        {
            let (reason, message) = match denial {
                Denial::NotSuperAdmin => ("the user is not a super admin", Message::ContactSuperAdmin),
                Denial::NoPermission => (
                    "the user does not have permission to this organization",
                    Message::ContactOrganizationAdmin,
                ),
            };
            self.audit.record(
                AuditLevel::Warn,
                &format!(
                    "User: {} attempted to remove org: {}, however {}.",
                    user.key, org.key, reason
                ),
            );
            return Ok(self.rejection(denial.status_code(), locale, &message));
        }

        let plan = self.plan(&org).await?;
        debug!(
            org = %org.key,
            owned = plan.owned_domains.len(),
            exclusive = plan.exclusive_domains.len(),
            shared = plan.shared_domains.len(),
            "Planned removal cascade"
        );
        self.execute(&plan).await?;

        info!(org = %org.key, user = %user.key, "Organization removed");
        self.audit.record(
            AuditLevel::Info,
            &format!("User: {} successfully removed org: {}.", user.key, org.key),
        );

        Ok(RemovalResult::OrganizationResult(OrganizationResult {
            status: self.localizer.translate(
                locale,
                &Message::RemovalSucceeded {
                    slug: org.slug(locale),
                },
            ),
            organization: RemovedOrganization {
                name: org.name(locale).to_string(),
            },
        }))
    }

    /// Compute the removal scope for an organization without writing.
    pub async fn plan(&self, org: &Organization) -> Result<RemovalPlan, Failure> {
        let org_id = org.id();
        let owned: Vec<OwnedDomain> = self
            .read(
                CascadeRead::OwnershipInfo,
                ReadQuery::OwnershipInfo {
                    org_id: org_id.clone(),
                },
            )
            .await?;
        let claim_counts: Vec<DomainClaimCount> = self
            .read(
                CascadeRead::DomainClaimCount,
                ReadQuery::DomainClaimCounts {
                    org_id: org_id.clone(),
                },
            )
            .await?;
        Ok(RemovalPlan::new(
            org_id,
            owned,
            claim_counts,
            self.config.recheck_claims,
        ))
    }

    async fn read<T: serde::de::DeserializeOwned>(
        &self,
        read: CascadeRead,
        query: ReadQuery,
    ) -> Result<Vec<T>, Failure> {
        let kind = query.kind();
        let mut cursor = self
            .store
            .query(query)
            .await
            .map_err(|source| Failure::Database { read, source })?;
        collect_rows(cursor.as_mut(), kind)
            .await
            .map_err(|source| Failure::from_read(read, source))
    }

    async fn execute(&self, plan: &RemovalPlan) -> Result<(), Failure> {
        let mut trx = self
            .store
            .begin(&REMOVAL_COLLECTIONS)
            .await
            .map_err(Failure::Begin)?;

        for step in plan.steps() {
            let kind = step.kind();
            if let Err(source) = trx.step(step).await {
                let trx_id = trx.id().to_string();
                if let Err(err) = trx.abort().await {
                    warn!(trx = %trx_id, error = %err, "Failed to abort removal transaction");
                }
                return Err(Failure::Step { step: kind, source });
            }
        }

        trx.commit().await.map_err(Failure::Commit)
    }

    fn rejection(&self, code: u16, locale: Locale, message: &Message<'_>) -> RemovalResult {
        RemovalResult::OrganizationError(OrganizationError {
            code,
            description: self.localizer.translate(locale, message),
        })
    }
}

/// Turn a client-supplied global id into an organization key.
///
/// Ids that do not decode as an organization global id are used as-is, so
/// they resolve to "unknown organization" rather than an error.
pub fn resolve_org_key(org_id: &str) -> String {
    let cleaned = clean_input(org_id).unwrap_or_default();
    match GlobalId::decode(&cleaned) {
        Ok(id) if id.type_name == ORGANIZATION_TYPE => id.key,
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_org::{Permission, OrganizationDetails};
    use tracker_rbac::StaticAuthorization;
    use tracker_store::MemoryGraphStore;

    use crate::audit::MemoryAuditLog;

    #[test]
    fn test_resolve_org_key() {
        assert_eq!(resolve_org_key(&GlobalId::new("Organization", "1").encode()), "1");
        assert_eq!(resolve_org_key("  T3JnYW5pemF0aW9uOjE=\n"), "1");
        assert_eq!(resolve_org_key(&GlobalId::new("Domain", "1").encode()), GlobalId::new("Domain", "1").encode());
        assert_eq!(resolve_org_key("not-an-id"), "not-an-id");
        assert_eq!(resolve_org_key(""), "");
    }

    #[tokio::test]
    async fn test_plan_does_not_write() {
        let store = Arc::new(MemoryGraphStore::new());
        let org = Organization::new("1").with_details(
            Locale::En,
            OrganizationDetails::new("Treasury Board", "tbs", "TBS"),
        );
        store.insert_organization(&org).await.unwrap();
        let before = store.snapshot().await;

        let auth = StaticAuthorization::new()
            .with_user(User::new("1", "admin@gc.ca"))
            .grant("1", "organizations/1", Permission::SuperAdmin);
        let service = OrganizationRemovalService::new(store.clone(), Arc::new(auth))
            .with_audit_log(Arc::new(MemoryAuditLog::new()));

        let plan = service.plan(&org).await.unwrap();
        assert!(plan.exclusive_domains.is_empty());
        assert!(!plan.owns_dmarc_summaries());
        assert_eq!(store.snapshot().await, before);
        assert_eq!(store.stats().transactions_begun, 0);
    }
}
