use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, GroupId, UserId};
use fieldgate_domain::{
    AuditAction, AuthorizationContext, Group, HookFamily, HookGrant, RegisteredResource,
    ResourceSnapshot, Subject, UniqueValueConstraint, hooks,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, GrantRepository, GroupRepository,
    ResourceForm,
};

mod forms;
mod mutations;
mod submission;


/// Fields offered on the group creation form.
pub const GROUP_CREATE_FIELDS: [&str; 6] = [
    "name",
    "new_user_title",
    "landing_page",
    "theme",
    "is_default",
    "icon",
];

/// Fields offered on the group edit form.
pub const GROUP_EDIT_FIELDS: [&str; 5] =
    ["name", "new_user_title", "landing_page", "theme", "is_default"];

/// Which group form to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFormMode {
    /// Blank form with creation defaults.
    Create,
    /// Form pre-filled from an existing group.
    Edit(GroupId),
}

/// Application service for group administration.
#[derive(Clone)]
pub struct GroupService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn GroupRepository>,
    grant_repository: Arc<dyn GrantRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl GroupService {
    /// Creates a new group service from repository implementations.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn GroupRepository>,
        grant_repository: Arc<dyn GrantRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            grant_repository,
            audit_repository,
        }
    }

    /// Lists every group.
    pub async fn list_groups(&self, actor: &Subject) -> AppResult<Vec<Group>> {
        self.authorization_service
            .require_hook(actor, hooks::URI_GROUPS, &AuthorizationContext::new())?;

        self.repository.list_groups().await
    }

    /// Returns one group.
    pub async fn get_group(&self, actor: &Subject, group_id: GroupId) -> AppResult<Group> {
        let group = self.load_group(group_id).await?;
        self.authorization_service.require_hook(
            actor,
            hooks::URI_GROUPS,
            &AuthorizationContext::new().with_resource(&group.snapshot()),
        )?;

        Ok(group)
    }

    /// Lists grants attached to a group.
    pub async fn list_group_grants(
        &self,
        actor: &Subject,
        group_id: GroupId,
    ) -> AppResult<Vec<HookGrant>> {
        let group = self.load_group(group_id).await?;
        self.authorization_service.require_hook(
            actor,
            hooks::URI_AUTHORIZATION_SETTINGS,
            &AuthorizationContext::new().with_resource(&group.snapshot()),
        )?;

        self.grant_repository
            .list_grants_for_groups(&[group.id()])
            .await
    }

    fn hook_family() -> HookFamily {
        HookFamily::prefixed(hooks::GROUP_SETTING)
    }

    async fn load_group(&self, group_id: GroupId) -> AppResult<Group> {
        self.repository
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))
    }

    async fn name_constraint(&self, except: Option<GroupId>) -> AppResult<UniqueValueConstraint> {
        let taken = self
            .repository
            .list_groups()
            .await?
            .into_iter()
            .filter(|group| Some(group.id()) != except)
            .map(|group| Value::String(group.name().to_owned()))
            .collect();

        Ok(UniqueValueConstraint::new("name", taken, "group name"))
    }

    async fn append_audit(
        &self,
        actor: UserId,
        action: AuditAction,
        group_id: GroupId,
        detail: String,
    ) -> AppResult<()> {
        info!(%actor, action = action.as_str(), %group_id, "{detail}");
        self.audit_repository
            .append_event(AuditEvent {
                actor,
                action,
                resource_type: Group::RESOURCE_TYPE.to_owned(),
                resource_id: group_id.to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn creation_snapshot() -> ResourceSnapshot {
    let defaults: Map<String, Value> = Group::fields()
        .iter()
        .filter_map(|spec| {
            spec.creation_default()
                .map(|value| (spec.name().to_owned(), value))
        })
        .collect();

    ResourceSnapshot::from_values(Group::RESOURCE_TYPE, "", Group::fields(), &defaults)
}
