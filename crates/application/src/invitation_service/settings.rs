use super::*;

const IGNORED_KEYS: [&str; 1] = ["csrf_token"];

impl InvitationService {
    /// Renders the invitation settings form with a classification for each field.
    pub async fn invitation_form(
        &self,
        actor: &Subject,
        invitation_id: InvitationId,
    ) -> AppResult<ResourceForm> {
        let invitation = self.load_invitation(invitation_id).await?;
        let studio = self.load_studio(invitation.studio_id()).await?;
        let snapshot = invitation.snapshot();
        let context = self
            .studio_context(&studio)
            .await?
            .with_resource(&snapshot);

        let candidates: Vec<&str> = Invitation::fields()
            .iter()
            .map(|spec| spec.name())
            .collect();
        let visibility = self.authorization_service.visibility_resolver().classify(
            actor,
            &candidates,
            &Self::hook_family(),
            &context,
        );

        Ok(ResourceForm::from_snapshot(
            &snapshot,
            Some(invitation.resource_id()),
            visibility,
        ))
    }

    /// Returns the invitation values the actor may see.
    pub async fn view_invitation(
        &self,
        actor: &Subject,
        invitation_id: InvitationId,
    ) -> AppResult<Map<String, Value>> {
        let form = self.invitation_form(actor, invitation_id).await?;
        if form.values.is_empty() {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not view invitation '{invitation_id}'",
                actor.user_id()
            )));
        }

        Ok(form.values)
    }

    /// Applies the authorized changes of a submission to an invitation.
    pub async fn update_invitation(
        &self,
        actor: &Subject,
        invitation_id: InvitationId,
        mut submitted: Map<String, Value>,
    ) -> AppResult<Invitation> {
        for key in IGNORED_KEYS {
            submitted.remove(key);
        }
        normalize_email_value(&mut submitted)?;

        let invitation = self.load_invitation(invitation_id).await?;
        let studio = self.load_studio(invitation.studio_id()).await?;
        let context = self.studio_context(&studio).await?;

        let mut taken: Vec<String> = self
            .invitation_repository
            .list_invitations_for_studio(studio.id())
            .await?
            .into_iter()
            .filter(|other| other.id() != invitation_id)
            .map(|other| other.email().to_owned())
            .collect();
        if let Some(Value::String(email)) = submitted.get("email") {
            taken.extend(
                self.user_repository
                    .find_registered_emails(std::slice::from_ref(email))
                    .await?,
            );
        }
        let unique_email = email_constraint(taken);

        let changeset = self
            .authorization_service
            .diff_authorizer()
            .authorize_update(
                actor,
                &invitation.snapshot(),
                &submitted,
                &Self::hook_family(),
                &[&unique_email],
                &context,
            )?;

        if changeset.is_empty() {
            info!(%invitation_id, "invitation update submitted without changes");
            return Ok(invitation);
        }

        let updated = self
            .invitation_repository
            .apply_changes(invitation_id, &changeset)
            .await?;
        self.append_audit(
            actor.user_id(),
            AuditAction::InvitationUpdated,
            &updated,
            format!("updated invitation fields: {}", changeset.fields().join(", ")),
        )
        .await?;

        Ok(updated)
    }
}
