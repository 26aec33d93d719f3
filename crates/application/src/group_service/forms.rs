use super::*;

impl GroupService {
    /// Renders the create or edit form with a classification for each field.
    pub async fn group_form(&self, actor: &Subject, mode: GroupFormMode) -> AppResult<ResourceForm> {
        let resolver = self.authorization_service.visibility_resolver();

        match mode {
            GroupFormMode::Create => {
                let context = AuthorizationContext::new();
                self.authorization_service
                    .require_hook(actor, hooks::CREATE_GROUP, &context)?;

                let visibility = resolver.classify(
                    actor,
                    &GROUP_CREATE_FIELDS,
                    &Self::hook_family(),
                    &context,
                );
                Ok(ResourceForm::from_snapshot(
                    &creation_snapshot(),
                    None,
                    visibility,
                ))
            }
            GroupFormMode::Edit(group_id) => {
                let group = self.load_group(group_id).await?;
                let snapshot = group.snapshot();
                let context = AuthorizationContext::new().with_resource(&snapshot);
                self.authorization_service
                    .require_hook(actor, hooks::URI_GROUPS, &context)?;

                let visibility =
                    resolver.classify(actor, &GROUP_EDIT_FIELDS, &Self::hook_family(), &context);
                Ok(ResourceForm::from_snapshot(
                    &snapshot,
                    Some(group.resource_id()),
                    visibility,
                ))
            }
        }
    }
}
