use fieldgate_core::NonEmptyString;
use fieldgate_domain::FieldChange;

use super::submission::normalize_submission;
use super::*;

impl GroupService {
    /// Creates a group. Fields the actor may not set receive their defaults.
    pub async fn create_group(
        &self,
        actor: &Subject,
        submitted: Map<String, Value>,
    ) -> AppResult<Group> {
        let context = AuthorizationContext::new();
        self.authorization_service
            .require_hook(actor, hooks::CREATE_GROUP, &context)?;

        let mut submitted = normalize_submission(submitted)?;
        submitted.remove("can_delete");

        let unique_name = self.name_constraint(None).await?;
        let mut changeset = self
            .authorization_service
            .diff_authorizer()
            .authorize_creation(
                actor,
                Group::RESOURCE_TYPE,
                Group::fields(),
                &submitted,
                &Self::hook_family(),
                &[&unique_name],
                &context,
            )?;
        changeset.push(FieldChange::new("can_delete", None, Value::Bool(true)));

        let group = self.repository.create_group(&changeset).await?;
        self.append_audit(
            actor.user_id(),
            AuditAction::GroupCreated,
            group.id(),
            format!("created group '{}'", group.name()),
        )
        .await?;

        Ok(group)
    }

    /// Applies the authorized changes of a submission to a group.
    pub async fn update_group(
        &self,
        actor: &Subject,
        group_id: GroupId,
        submitted: Map<String, Value>,
    ) -> AppResult<Group> {
        let group = self.load_group(group_id).await?;
        let submitted = normalize_submission(submitted)?;
        let unique_name = self.name_constraint(Some(group_id)).await?;

        let changeset = self
            .authorization_service
            .diff_authorizer()
            .authorize_update(
                actor,
                &group.snapshot(),
                &submitted,
                &Self::hook_family(),
                &[&unique_name],
                &AuthorizationContext::new(),
            )?;

        if changeset.is_empty() {
            info!(%group_id, "group update submitted without changes");
            return Ok(group);
        }

        let updated = self.repository.apply_changes(group_id, &changeset).await?;
        self.append_audit(
            actor.user_id(),
            AuditAction::GroupUpdated,
            group_id,
            format!(
                "updated group '{}' fields: {}",
                updated.name(),
                changeset.fields().join(", ")
            ),
        )
        .await?;

        Ok(updated)
    }

    /// Deletes a group with its memberships and grants.
    pub async fn delete_group(&self, actor: &Subject, group_id: GroupId) -> AppResult<()> {
        let group = self.load_group(group_id).await?;
        self.authorization_service.require_hook(
            actor,
            hooks::DELETE_GROUP,
            &AuthorizationContext::new().with_resource(&group.snapshot()),
        )?;

        if !group.can_delete() || group.is_default_primary() {
            return Err(AppError::Conflict(format!(
                "group '{}' cannot be deleted",
                group.name()
            )));
        }

        self.repository.delete_group(group_id).await?;
        self.append_audit(
            actor.user_id(),
            AuditAction::GroupDeleted,
            group_id,
            format!("deleted group '{}'", group.name()),
        )
        .await
    }

    /// Gives every account whose primary group is `group_id` the same title.
    /// Returns the number of accounts that were updated.
    pub async fn update_group_titles(
        &self,
        actor: &Subject,
        group_id: GroupId,
        title: &str,
    ) -> AppResult<u64> {
        let group = self.load_group(group_id).await?;
        self.authorization_service.require_hook(
            actor,
            hooks::URI_GROUP_TITLES,
            &AuthorizationContext::new().with_resource(&group.snapshot()),
        )?;

        let title = NonEmptyString::new(title.trim())
            .map_err(|_| AppError::Validation("title is required".to_owned()))?;
        let updated = self
            .repository
            .update_primary_member_titles(group_id, title.as_str())
            .await?;
        self.append_audit(
            actor.user_id(),
            AuditAction::GroupTitlesUpdated,
            group_id,
            format!(
                "set title '{title}' on {updated} member(s) of group '{}'",
                group.name()
            ),
        )
        .await?;

        Ok(updated)
    }
}
