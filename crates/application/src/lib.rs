//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod diff_authorizer;
mod field_visibility;
mod group_service;
mod invitation_service;
mod permission_oracle;
mod ports;
mod resource_form;

#[cfg(test)]
mod test_support;

pub use authorization_service::AuthorizationService;
pub use diff_authorizer::DiffAuthorizer;
pub use field_visibility::FieldVisibilityResolver;
pub use group_service::{GROUP_CREATE_FIELDS, GROUP_EDIT_FIELDS, GroupFormMode, GroupService};
pub use invitation_service::{InvitationService, InvitationServicePorts, StudioDefinition};
pub use permission_oracle::PermissionOracle;
pub use ports::{
    AuditEvent, AuditRepository, GrantRepository, GroupRepository, InvitationNotice,
    InvitationNotifier, InvitationRepository, StudioRepository, UserRepository,
};
pub use resource_form::ResourceForm;
