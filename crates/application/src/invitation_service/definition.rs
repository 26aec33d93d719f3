use super::*;

impl InvitationService {
    /// Defines a studio owned by the actor with its ordered tasks and
    /// participating accounts, then invites `invitees` to it.
    ///
    /// Participants must be existing accounts and invitees must not be. Both
    /// are checked before the studio is stored.
    pub async fn define_studio(
        &self,
        actor: &Subject,
        draft: StudioDraft,
        invitees: Vec<String>,
    ) -> AppResult<StudioDefinition> {
        let prospective = draft.to_studio(StudioId::new(0), actor.user_id());
        let context = self.studio_context(&prospective).await?;
        self.authorization_service
            .require_hook(actor, hooks::URI_ANALIST, &context)?;

        for participant in draft.participants() {
            if self
                .user_repository
                .find_identity(*participant)
                .await?
                .is_none()
            {
                return Err(AppError::Validation(format!(
                    "participant '{participant}' is not a registered user"
                )));
            }
        }

        let addresses = invitees
            .into_iter()
            .map(|email| EmailAddress::new(email).map(String::from))
            .collect::<AppResult<Vec<_>>>()?;
        if let Some(registered) = self
            .user_repository
            .find_registered_emails(&addresses)
            .await?
            .first()
        {
            return Err(AppError::Conflict(format!(
                "email address '{registered}' already belongs to a user"
            )));
        }

        let studio = self
            .studio_repository
            .create_studio(actor.user_id(), &draft)
            .await?;
        self.append_studio_audit(
            actor.user_id(),
            &studio,
            format!(
                "defined studio '{}' with {} task(s) and {} participant(s)",
                studio.objective(),
                draft.tasks().len(),
                draft.participants().len()
            ),
        )
        .await?;

        let invitations = if addresses.is_empty() {
            Vec::new()
        } else {
            self.invite_to_studio(actor, studio.id(), addresses).await?
        };

        let mut definition = self.load_definition(studio).await?;
        definition.invitations = invitations;
        Ok(definition)
    }

    /// Returns a studio with its tasks and participants.
    pub async fn studio_definition(
        &self,
        actor: &Subject,
        studio_id: StudioId,
    ) -> AppResult<StudioDefinition> {
        let studio = self.load_studio(studio_id).await?;
        let context = self.studio_context(&studio).await?;
        self.authorization_service
            .require_hook(actor, hooks::URI_ANALIST, &context)?;

        let mut definition = self.load_definition(studio).await?;
        definition.invitations = self
            .invitation_repository
            .list_invitations_for_studio(studio_id)
            .await?;
        Ok(definition)
    }

    async fn load_definition(&self, studio: Studio) -> AppResult<StudioDefinition> {
        let tasks = self.studio_repository.list_tasks(studio.id()).await?;
        let participants = self
            .studio_repository
            .list_participants(studio.id())
            .await?;

        Ok(StudioDefinition {
            studio,
            tasks,
            participants,
            invitations: Vec::new(),
        })
    }

    async fn append_studio_audit(
        &self,
        actor: UserId,
        studio: &Studio,
        detail: String,
    ) -> AppResult<()> {
        info!(
            %actor,
            action = AuditAction::StudioCreated.as_str(),
            studio_id = %studio.id(),
            "{detail}"
        );
        self.audit_repository
            .append_event(AuditEvent {
                actor,
                action: AuditAction::StudioCreated,
                resource_type: Studio::RESOURCE_TYPE.to_owned(),
                resource_id: studio.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}
