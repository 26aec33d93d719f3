use super::*;

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.state.read().await.groups.values().cloned().collect())
    }

    async fn find_group(&self, group_id: GroupId) -> AppResult<Option<Group>> {
        Ok(self.state.read().await.groups.get(&group_id).cloned())
    }

    async fn create_group(&self, changeset: &Changeset) -> AppResult<Group> {
        let mut state = self.state.write().await;
        let next_id = state
            .groups
            .keys()
            .next_back()
            .map(|group_id| group_id.as_i64() + 1)
            .unwrap_or(1);
        let group = Group::from_changeset(GroupId::new(next_id), changeset)?;

        if state
            .groups
            .values()
            .any(|existing| existing.name() == group.name())
        {
            return Err(AppError::Conflict(format!(
                "group name '{}' is already in use",
                group.name()
            )));
        }

        state.groups.insert(group.id(), group.clone());
        Ok(group)
    }

    async fn apply_changes(&self, group_id: GroupId, changeset: &Changeset) -> AppResult<Group> {
        let mut state = self.state.write().await;
        let updated = state
            .groups
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))?
            .with_changes(changeset)?;

        if state
            .groups
            .values()
            .any(|existing| existing.id() != group_id && existing.name() == updated.name())
        {
            return Err(AppError::Conflict(format!(
                "group name '{}' is already in use",
                updated.name()
            )));
        }

        state.groups.insert(group_id, updated.clone());
        Ok(updated)
    }

    async fn delete_group(&self, group_id: GroupId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.groups.remove(&group_id).is_none() {
            return Err(AppError::NotFound(format!(
                "group '{group_id}' does not exist"
            )));
        }

        state
            .memberships
            .retain(|(_, member_group)| *member_group != group_id);
        state
            .grants
            .retain(|grant| grant.scope() != GrantScope::Group(group_id));

        let fallback = state
            .groups
            .values()
            .find(|group| group.is_default_primary())
            .map(Group::id);
        if let Some(fallback) = fallback {
            for identity in state.users.values_mut() {
                if identity.primary_group_id() == group_id {
                    *identity = UserIdentity::new(
                        identity.user_id(),
                        identity.user_name(),
                        identity.display_name(),
                        identity.email(),
                        fallback,
                    );
                }
            }
        }

        Ok(())
    }

    async fn update_primary_member_titles(
        &self,
        group_id: GroupId,
        title: &str,
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let members: Vec<UserId> = state
            .users
            .values()
            .filter(|identity| identity.primary_group_id() == group_id)
            .map(UserIdentity::user_id)
            .collect();

        for user_id in &members {
            state.user_titles.insert(*user_id, title.to_owned());
        }

        Ok(members.len() as u64)
    }
}
