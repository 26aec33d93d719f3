use async_trait::async_trait;
use fieldgate_core::{AppResult, InvitationId, StudioId, UserId};
use fieldgate_domain::{Changeset, Invitation, Studio, StudioDraft, Task};

/// Repository port for studios.
#[async_trait]
pub trait StudioRepository: Send + Sync {
    /// Finds one studio.
    async fn find_studio(&self, studio_id: StudioId) -> AppResult<Option<Studio>>;

    /// Stores a studio owned by `owner` together with its tasks and
    /// participants in one atomic write.
    async fn create_studio(&self, owner: UserId, draft: &StudioDraft) -> AppResult<Studio>;

    /// Lists the tasks of a studio in session order.
    async fn list_tasks(&self, studio_id: StudioId) -> AppResult<Vec<Task>>;

    /// Lists accounts taking part in a studio.
    async fn list_participants(&self, studio_id: StudioId) -> AppResult<Vec<UserId>>;
}

/// Repository port for studio invitations.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Finds one invitation.
    async fn find_invitation(&self, invitation_id: InvitationId) -> AppResult<Option<Invitation>>;

    /// Lists invitations sent for a studio.
    async fn list_invitations_for_studio(&self, studio_id: StudioId)
    -> AppResult<Vec<Invitation>>;

    /// Persists invitations from approved creation changesets in one atomic write.
    async fn create_invitations(
        &self,
        studio_id: StudioId,
        drafts: &[(String, Changeset)],
    ) -> AppResult<Vec<Invitation>>;

    /// Applies an approved changeset in one atomic write.
    async fn apply_changes(
        &self,
        invitation_id: InvitationId,
        changeset: &Changeset,
    ) -> AppResult<Invitation>;
}
