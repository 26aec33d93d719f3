use super::*;

#[async_trait]
impl StudioRepository for InMemoryRepository {
    async fn find_studio(&self, studio_id: StudioId) -> AppResult<Option<Studio>> {
        Ok(self.state.read().await.studios.get(&studio_id).cloned())
    }

    async fn create_studio(&self, owner: UserId, draft: &StudioDraft) -> AppResult<Studio> {
        let mut state = self.state.write().await;
        for user_id in std::iter::once(&owner).chain(draft.participants()) {
            if !state.users.contains_key(user_id) {
                return Err(AppError::Validation(format!(
                    "user '{user_id}' does not exist"
                )));
            }
        }

        let studio_id = StudioId::new(
            state
                .studios
                .keys()
                .next_back()
                .map(|studio_id| studio_id.as_i64() + 1)
                .unwrap_or(1),
        );
        let mut next_task_id = state
            .tasks
            .keys()
            .next_back()
            .map(|task_id| task_id.as_i64() + 1)
            .unwrap_or(1);

        let studio = draft.to_studio(studio_id, owner);
        state.studios.insert(studio_id, studio.clone());
        for (task, position) in draft.tasks().iter().zip(0..) {
            let task = task.to_task(TaskId::new(next_task_id), studio_id, position);
            state.tasks.insert(task.id(), task);
            next_task_id += 1;
        }
        state.participants.extend(
            draft
                .participants()
                .iter()
                .map(|user_id| (studio_id, *user_id)),
        );

        Ok(studio)
    }

    async fn list_tasks(&self, studio_id: StudioId) -> AppResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.studio_id() == studio_id)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::position);

        Ok(tasks)
    }

    async fn list_participants(&self, studio_id: StudioId) -> AppResult<Vec<UserId>> {
        let state = self.state.read().await;

        Ok(state
            .participants
            .iter()
            .filter(|(studio, _)| *studio == studio_id)
            .map(|(_, user_id)| *user_id)
            .collect())
    }
}

#[async_trait]
impl InvitationRepository for InMemoryRepository {
    async fn find_invitation(&self, invitation_id: InvitationId) -> AppResult<Option<Invitation>> {
        Ok(self
            .state
            .read()
            .await
            .invitations
            .get(&invitation_id)
            .cloned())
    }

    async fn list_invitations_for_studio(
        &self,
        studio_id: StudioId,
    ) -> AppResult<Vec<Invitation>> {
        let state = self.state.read().await;

        Ok(state
            .invitations
            .values()
            .filter(|invitation| invitation.studio_id() == studio_id)
            .cloned()
            .collect())
    }

    async fn create_invitations(
        &self,
        studio_id: StudioId,
        drafts: &[(String, Changeset)],
    ) -> AppResult<Vec<Invitation>> {
        let mut state = self.state.write().await;
        if !state.studios.contains_key(&studio_id) {
            return Err(AppError::NotFound(format!(
                "studio '{studio_id}' does not exist"
            )));
        }

        let mut next_id = state
            .invitations
            .keys()
            .next_back()
            .map(|invitation_id| invitation_id.as_i64() + 1)
            .unwrap_or(1);
        let mut created = Vec::with_capacity(drafts.len());
        for (token, changeset) in drafts {
            let invitation = Invitation::from_changeset(
                InvitationId::new(next_id),
                studio_id,
                token.as_str(),
                changeset,
            )?;
            let duplicate = state
                .invitations
                .values()
                .chain(created.iter())
                .any(|existing: &Invitation| {
                    existing.studio_id() == studio_id && existing.email() == invitation.email()
                });
            if duplicate {
                return Err(AppError::Conflict(format!(
                    "'{}' is already invited to studio '{studio_id}'",
                    invitation.email()
                )));
            }

            created.push(invitation);
            next_id += 1;
        }

        for invitation in &created {
            state.invitations.insert(invitation.id(), invitation.clone());
        }

        Ok(created)
    }

    async fn apply_changes(
        &self,
        invitation_id: InvitationId,
        changeset: &Changeset,
    ) -> AppResult<Invitation> {
        let mut state = self.state.write().await;
        let updated = state
            .invitations
            .get(&invitation_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("invitation '{invitation_id}' does not exist"))
            })?
            .with_changes(changeset)?;

        state.invitations.insert(invitation_id, updated.clone());
        Ok(updated)
    }
}
