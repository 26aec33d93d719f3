use async_trait::async_trait;
use fieldgate_core::{AppResult, GroupId, UserId, UserIdentity};
use fieldgate_domain::MembershipIndex;

/// Repository port for user accounts and their group memberships.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds the identity of one account.
    async fn find_identity(&self, user_id: UserId) -> AppResult<Option<UserIdentity>>;

    /// Lists groups the user belongs to.
    async fn list_group_ids(&self, user_id: UserId) -> AppResult<Vec<GroupId>>;

    /// Builds a membership index covering the given users.
    async fn membership_index(&self, user_ids: &[UserId]) -> AppResult<MembershipIndex>;

    /// Returns the subset of emails that already belong to an account.
    async fn find_registered_emails(&self, emails: &[String]) -> AppResult<Vec<String>>;
}
