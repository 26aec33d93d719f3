use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, UserId};
use fieldgate_domain::{AuthorizationContext, GrantScope, GroupMembership, MembershipIndex, Subject};
use tracing::debug;

use crate::{
    DiffAuthorizer, FieldVisibilityResolver, GrantRepository, PermissionOracle, UserRepository,
};

/// Application service that loads subjects and answers hook checks.
#[derive(Clone)]
pub struct AuthorizationService {
    grant_repository: Arc<dyn GrantRepository>,
    user_repository: Arc<dyn UserRepository>,
    oracle: PermissionOracle,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        grant_repository: Arc<dyn GrantRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            grant_repository,
            user_repository,
            oracle: PermissionOracle::new(),
        }
    }

    /// Loads the acting user with memberships and every grant that applies to them.
    pub async fn load_subject(&self, user_id: UserId) -> AppResult<Subject> {
        let identity = self
            .user_repository
            .find_identity(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("user '{user_id}' does not exist")))?;

        let group_ids = self.user_repository.list_group_ids(user_id).await?;
        let group_grants = self
            .grant_repository
            .list_grants_for_groups(&group_ids)
            .await?;
        let user_grants = self.grant_repository.list_grants_for_user(user_id).await?;

        let memberships = group_ids
            .iter()
            .map(|group_id| {
                let grants = group_grants
                    .iter()
                    .filter(|grant| grant.scope() == GrantScope::Group(*group_id))
                    .cloned()
                    .collect();
                GroupMembership::new(*group_id, grants)
            })
            .collect();

        debug!(
            %user_id,
            groups = group_ids.len(),
            grants = group_grants.len() + user_grants.len(),
            "loaded subject"
        );
        Ok(Subject::new(identity, memberships, user_grants))
    }

    /// Builds the membership index `in_group` needs for users other than the subject.
    pub async fn membership_index(&self, user_ids: &[UserId]) -> AppResult<MembershipIndex> {
        self.user_repository.membership_index(user_ids).await
    }

    /// Returns whether the subject holds the hook in the context.
    #[must_use]
    pub fn has_hook(&self, subject: &Subject, hook: &str, context: &AuthorizationContext) -> bool {
        self.oracle.authorize(subject, hook, context)
    }

    /// Ensures the subject holds the hook in the context.
    pub fn require_hook(
        &self,
        subject: &Subject,
        hook: &str,
        context: &AuthorizationContext,
    ) -> AppResult<()> {
        if self.has_hook(subject, hook, context) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is not granted '{hook}'",
            subject.user_id()
        )))
    }

    /// Returns a field visibility resolver sharing this service's oracle.
    #[must_use]
    pub fn visibility_resolver(&self) -> FieldVisibilityResolver {
        FieldVisibilityResolver::new(self.oracle)
    }

    /// Returns a diff authorizer sharing this service's oracle.
    #[must_use]
    pub fn diff_authorizer(&self) -> DiffAuthorizer {
        DiffAuthorizer::new(self.oracle)
    }
}

#[cfg(test)]
mod tests;
