use async_trait::async_trait;
use fieldgate_core::{AppResult, GroupId, UserId};
use fieldgate_domain::HookGrant;

/// Repository port for stored hook grants.
///
/// Conditions are parsed when grants are loaded; a stored condition that does
/// not parse is still returned so the oracle can deny and report it.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Lists grants attached to any of the groups.
    async fn list_grants_for_groups(&self, group_ids: &[GroupId]) -> AppResult<Vec<HookGrant>>;

    /// Lists grants attached directly to one user.
    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<HookGrant>>;
}
