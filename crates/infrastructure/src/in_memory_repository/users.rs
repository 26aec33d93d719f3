use super::*;

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_identity(&self, user_id: UserId) -> AppResult<Option<UserIdentity>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn list_group_ids(&self, user_id: UserId) -> AppResult<Vec<GroupId>> {
        let state = self.state.read().await;

        Ok(state
            .memberships
            .iter()
            .filter(|(member, _)| *member == user_id)
            .map(|(_, group_id)| *group_id)
            .collect())
    }

    async fn membership_index(&self, user_ids: &[UserId]) -> AppResult<MembershipIndex> {
        let state = self.state.read().await;
        let mut index = MembershipIndex::new();

        for (user_id, group_id) in &state.memberships {
            if user_ids.contains(user_id) {
                index.insert(*user_id, [*group_id]);
            }
        }

        Ok(index)
    }

    async fn find_registered_emails(&self, emails: &[String]) -> AppResult<Vec<String>> {
        let state = self.state.read().await;

        Ok(state
            .users
            .values()
            .map(|identity| identity.email().to_lowercase())
            .filter(|email| emails.contains(email))
            .collect())
    }
}
