use fieldgate_application::{AuthorizationService, GroupService, InvitationService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub group_service: GroupService,
    pub invitation_service: InvitationService,
    pub storage_backend: &'static str,
}
