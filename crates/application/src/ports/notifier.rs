use async_trait::async_trait;
use fieldgate_core::{AppResult, StudioId};

/// Outbound invitation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationNotice {
    /// Recipient address.
    pub email: String,
    /// Studio the recipient is invited to.
    pub studio_id: StudioId,
    /// Studio objective shown in the message.
    pub studio_objective: String,
    /// Acceptance link carrying the invitation token.
    pub acceptance_link: String,
}

/// Port for delivering invitation messages.
#[async_trait]
pub trait InvitationNotifier: Send + Sync {
    /// Sends one invitation.
    async fn send_invitation(&self, notice: &InvitationNotice) -> AppResult<()>;
}
