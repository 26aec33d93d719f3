use uuid::Uuid;

use super::*;

impl InvitationService {
    /// Invites participants to a studio.
    ///
    /// Every address is checked before anything is stored: an address that
    /// already belongs to an account or was already invited to the studio
    /// rejects the whole request. Once stored, an invitation whose notice
    /// cannot be sent is still kept and audited.
    pub async fn invite_to_studio(
        &self,
        actor: &Subject,
        studio_id: StudioId,
        emails: Vec<String>,
    ) -> AppResult<Vec<Invitation>> {
        let studio = self.load_studio(studio_id).await?;
        let context = self.studio_context(&studio).await?;
        self.authorization_service
            .require_hook(actor, hooks::URI_ANALIST, &context)?;

        let mut addresses: Vec<String> = Vec::with_capacity(emails.len());
        for email in emails {
            let address = String::from(EmailAddress::new(email)?);
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }
        if addresses.is_empty() {
            return Err(AppError::Validation(
                "at least one email address is required".to_owned(),
            ));
        }

        let mut taken: Vec<String> = self
            .invitation_repository
            .list_invitations_for_studio(studio_id)
            .await?
            .into_iter()
            .map(|invitation| invitation.email().to_owned())
            .collect();
        taken.extend(
            self.user_repository
                .find_registered_emails(&addresses)
                .await?,
        );
        let unique_email = email_constraint(taken);

        let authorizer = self.authorization_service.diff_authorizer();
        let family = Self::hook_family();
        let mut drafts = Vec::with_capacity(addresses.len());
        for address in &addresses {
            let mut submitted = Map::new();
            submitted.insert("email".to_owned(), Value::String(address.clone()));

            let changeset = authorizer.authorize_creation(
                actor,
                Invitation::RESOURCE_TYPE,
                Invitation::fields(),
                &submitted,
                &family,
                &[&unique_email],
                &context,
            )?;
            drafts.push((Uuid::new_v4().simple().to_string(), changeset));
        }

        let invitations = self
            .invitation_repository
            .create_invitations(studio_id, &drafts)
            .await?;

        for invitation in &invitations {
            let notice = InvitationNotice {
                email: invitation.email().to_owned(),
                studio_id,
                studio_objective: studio.objective().to_owned(),
                acceptance_link: self.acceptance_link(invitation.token()),
            };
            // The invitation is stored either way; a failed delivery is only recorded.
            let delivery = match self.notifier.send_invitation(&notice).await {
                Ok(()) => "",
                Err(error) => {
                    warn!(
                        %studio_id,
                        invitation_id = %invitation.id(),
                        error = %error,
                        "invitation notice could not be delivered"
                    );
                    " (notice not delivered)"
                }
            };
            self.append_audit(
                actor.user_id(),
                AuditAction::InvitationCreated,
                invitation,
                format!(
                    "invited '{}' to studio '{studio_id}'{delivery}",
                    invitation.email()
                ),
            )
            .await?;
        }

        Ok(invitations)
    }
}
