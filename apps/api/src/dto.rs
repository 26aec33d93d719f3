mod common;
mod forms;
mod groups;
mod invitations;
mod studios;

pub use common::HealthResponse;
pub use forms::ResourceFormResponse;
pub use groups::{GrantResponse, GroupResponse, GroupTitlesRequest, GroupTitlesResponse};
pub use invitations::{InvitationResponse, InviteToStudioRequest};
pub use studios::{DefineStudioRequest, StudioResponse};
