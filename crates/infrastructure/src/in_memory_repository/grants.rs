use super::*;

#[async_trait]
impl GrantRepository for InMemoryRepository {
    async fn list_grants_for_groups(&self, group_ids: &[GroupId]) -> AppResult<Vec<HookGrant>> {
        let state = self.state.read().await;

        Ok(state
            .grants
            .iter()
            .filter(|grant| {
                matches!(grant.scope(), GrantScope::Group(group_id) if group_ids.contains(&group_id))
            })
            .cloned()
            .collect())
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<HookGrant>> {
        let state = self.state.read().await;

        Ok(state
            .grants
            .iter()
            .filter(|grant| grant.scope() == GrantScope::User(user_id))
            .cloned()
            .collect())
    }
}
