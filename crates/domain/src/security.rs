use serde::{Deserialize, Serialize};

/// Hook names checked by application use-cases.
pub mod hooks {
    /// Allows listing groups and opening the group edit form.
    pub const URI_GROUPS: &str = "uri_groups";
    /// Allows creating groups.
    pub const CREATE_GROUP: &str = "create_group";
    /// Allows deleting a group.
    pub const DELETE_GROUP: &str = "delete_group";
    /// Allows listing grants attached to a group.
    pub const URI_AUTHORIZATION_SETTINGS: &str = "uri_authorization_settings";
    /// Allows defining studios and inviting participants to them.
    pub const URI_ANALIST: &str = "uri_analist";
    /// Allows setting the title of every member of a primary group at once.
    pub const URI_GROUP_TITLES: &str = "uri_group_titles";
    /// Hook family noun for group settings.
    pub const GROUP_SETTING: &str = "group_setting";
    /// Hook family noun for invitation settings.
    pub const INVITATION_SETTING: &str = "invitation_setting";
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a group is created.
    GroupCreated,
    /// Emitted when group settings change.
    GroupUpdated,
    /// Emitted when a group is deleted.
    GroupDeleted,
    /// Emitted when the members of a primary group receive a new title.
    GroupTitlesUpdated,
    /// Emitted when a studio is defined.
    StudioCreated,
    /// Emitted when a participant is invited to a studio.
    InvitationCreated,
    /// Emitted when invitation settings change.
    InvitationUpdated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupCreated => "group.created",
            Self::GroupUpdated => "group.updated",
            Self::GroupDeleted => "group.deleted",
            Self::GroupTitlesUpdated => "group.titles_updated",
            Self::StudioCreated => "studio.created",
            Self::InvitationCreated => "invitation.created",
            Self::InvitationUpdated => "invitation.updated",
        }
    }
}
