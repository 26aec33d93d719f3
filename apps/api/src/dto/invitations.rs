use fieldgate_domain::Invitation;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for inviting people to a studio.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/invite-to-studio-request.ts"
)]
pub struct InviteToStudioRequest {
    pub emails: Vec<String>,
}

/// API representation of an invitation. The token is never exposed.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/invitation-response.ts"
)]
pub struct InvitationResponse {
    pub id: i64,
    pub studio_id: i64,
    pub email: String,
    pub locale: String,
    pub title: String,
    pub flag_completed: bool,
    pub flag_evaluated: bool,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id().as_i64(),
            studio_id: invitation.studio_id().as_i64(),
            email: invitation.email().to_owned(),
            locale: invitation.locale().to_owned(),
            title: invitation.title().to_owned(),
            flag_completed: invitation.flag_completed(),
            flag_evaluated: invitation.flag_evaluated(),
        }
    }
}
