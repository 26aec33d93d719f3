use async_trait::async_trait;
use fieldgate_core::{AppResult, GroupId};
use fieldgate_domain::{Changeset, Group};

/// Repository port for groups.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Lists every group ordered by identifier.
    async fn list_groups(&self) -> AppResult<Vec<Group>>;

    /// Finds one group.
    async fn find_group(&self, group_id: GroupId) -> AppResult<Option<Group>>;

    /// Persists a new group from an approved creation changeset.
    async fn create_group(&self, changeset: &Changeset) -> AppResult<Group>;

    /// Applies an approved changeset in one atomic write.
    async fn apply_changes(&self, group_id: GroupId, changeset: &Changeset) -> AppResult<Group>;

    /// Deletes a group together with its memberships and grants.
    async fn delete_group(&self, group_id: GroupId) -> AppResult<()>;

    /// Sets `title` on every account whose primary group is `group_id` and
    /// returns how many accounts changed.
    async fn update_primary_member_titles(&self, group_id: GroupId, title: &str)
    -> AppResult<u64>;
}
