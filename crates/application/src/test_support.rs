use std::collections::BTreeMap;

use async_trait::async_trait;
use fieldgate_core::{
    AppError, AppResult, GroupId, InvitationId, StudioId, TaskId, UserId, UserIdentity,
};
use fieldgate_domain::{
    Changeset, GrantScope, Group, GroupMembership, HookGrant, Invitation, MembershipIndex,
    RegisteredResource, Studio, StudioDraft, Subject, Task,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditRepository, GrantRepository, GroupRepository, InvitationNotice,
    InvitationNotifier, InvitationRepository, StudioRepository, UserRepository,
};

pub(crate) fn group_grant(group_id: i64, hook: &str, condition: &str) -> HookGrant {
    match HookGrant::new(0, GrantScope::Group(GroupId::new(group_id)), hook, condition) {
        Ok(grant) => grant,
        Err(error) => panic!("invalid test grant: {error}"),
    }
}

pub(crate) fn user_grant(user_id: i64, hook: &str, condition: &str) -> HookGrant {
    match HookGrant::new(0, GrantScope::User(UserId::new(user_id)), hook, condition) {
        Ok(grant) => grant,
        Err(error) => panic!("invalid test grant: {error}"),
    }
}

pub(crate) fn identity(user_id: i64, primary_group_id: i64) -> UserIdentity {
    UserIdentity::new(
        UserId::new(user_id),
        format!("user{user_id}"),
        format!("User {user_id}"),
        format!("user{user_id}@example.com"),
        GroupId::new(primary_group_id),
    )
}

pub(crate) fn subject_with(
    user_id: i64,
    memberships: Vec<(i64, Vec<HookGrant>)>,
    user_grants: Vec<HookGrant>,
) -> Subject {
    let primary = memberships.first().map(|(group_id, _)| *group_id).unwrap_or(1);
    Subject::new(
        identity(user_id, primary),
        memberships
            .into_iter()
            .map(|(group_id, grants)| GroupMembership::new(GroupId::new(group_id), grants))
            .collect(),
        user_grants,
    )
}

pub(crate) struct FakeGrantRepository {
    grants: Mutex<Vec<HookGrant>>,
}

impl FakeGrantRepository {
    pub(crate) fn new(grants: Vec<HookGrant>) -> Self {
        Self {
            grants: Mutex::new(grants),
        }
    }
}

#[async_trait]
impl GrantRepository for FakeGrantRepository {
    async fn list_grants_for_groups(&self, group_ids: &[GroupId]) -> AppResult<Vec<HookGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| {
                matches!(grant.scope(), GrantScope::Group(group_id) if group_ids.contains(&group_id))
            })
            .cloned()
            .collect())
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<HookGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| grant.scope() == GrantScope::User(user_id))
            .cloned()
            .collect())
    }
}

pub(crate) struct FakeUserRepository {
    users: BTreeMap<UserId, (UserIdentity, Vec<GroupId>)>,
}

impl FakeUserRepository {
    /// Admin (1) in group 2, analyst (12) in group 4, plain user (13) in group 1.
    pub(crate) fn seeded() -> Self {
        let users = [(1, 2), (12, 4), (13, 1)]
            .into_iter()
            .map(|(user_id, group_id)| {
                (
                    UserId::new(user_id),
                    (identity(user_id, group_id), vec![GroupId::new(group_id)]),
                )
            })
            .collect();

        Self { users }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_identity(&self, user_id: UserId) -> AppResult<Option<UserIdentity>> {
        Ok(self.users.get(&user_id).map(|(identity, _)| identity.clone()))
    }

    async fn list_group_ids(&self, user_id: UserId) -> AppResult<Vec<GroupId>> {
        Ok(self
            .users
            .get(&user_id)
            .map(|(_, groups)| groups.clone())
            .unwrap_or_default())
    }

    async fn membership_index(&self, user_ids: &[UserId]) -> AppResult<MembershipIndex> {
        let mut index = MembershipIndex::new();
        for user_id in user_ids {
            if let Some((_, groups)) = self.users.get(user_id) {
                index.insert(*user_id, groups.iter().copied());
            }
        }
        Ok(index)
    }

    async fn find_registered_emails(&self, emails: &[String]) -> AppResult<Vec<String>> {
        Ok(self
            .users
            .values()
            .map(|(identity, _)| identity.email().to_owned())
            .filter(|email| emails.contains(email))
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeGroupRepository {
    pub(crate) groups: Mutex<BTreeMap<GroupId, Group>>,
    /// Primary group and title of each account.
    pub(crate) member_titles: Mutex<BTreeMap<UserId, (GroupId, String)>>,
}

impl FakeGroupRepository {
    pub(crate) fn with_groups(groups: Vec<Group>) -> Self {
        Self {
            groups: Mutex::new(groups.into_iter().map(|group| (group.id(), group)).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn with_member(mut self, user_id: i64, primary_group_id: i64, title: &str) -> Self {
        self.member_titles.get_mut().insert(
            UserId::new(user_id),
            (GroupId::new(primary_group_id), title.to_owned()),
        );
        self
    }
}

#[async_trait]
impl GroupRepository for FakeGroupRepository {
    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.groups.lock().await.values().cloned().collect())
    }

    async fn find_group(&self, group_id: GroupId) -> AppResult<Option<Group>> {
        Ok(self.groups.lock().await.get(&group_id).cloned())
    }

    async fn create_group(&self, changeset: &Changeset) -> AppResult<Group> {
        let mut groups = self.groups.lock().await;
        let next_id = groups
            .keys()
            .next_back()
            .map(|group_id| group_id.as_i64() + 1)
            .unwrap_or(1);
        let group = Group::from_changeset(GroupId::new(next_id), changeset)?;
        groups.insert(group.id(), group.clone());
        Ok(group)
    }

    async fn apply_changes(&self, group_id: GroupId, changeset: &Changeset) -> AppResult<Group> {
        let mut groups = self.groups.lock().await;
        let group = groups
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))?
            .with_changes(changeset)?;
        groups.insert(group_id, group.clone());
        Ok(group)
    }

    async fn delete_group(&self, group_id: GroupId) -> AppResult<()> {
        self.groups.lock().await.remove(&group_id);
        Ok(())
    }

    async fn update_primary_member_titles(
        &self,
        group_id: GroupId,
        title: &str,
    ) -> AppResult<u64> {
        let mut updated = 0;
        for (primary, current) in self.member_titles.lock().await.values_mut() {
            if *primary == group_id {
                *current = title.to_owned();
                updated += 1;
            }
        }
        Ok(updated)
    }
}

pub(crate) struct FakeStudioRepository {
    pub(crate) studios: Mutex<Vec<Studio>>,
    pub(crate) tasks: Mutex<Vec<Task>>,
    pub(crate) participants: Mutex<Vec<(StudioId, UserId)>>,
}

impl FakeStudioRepository {
    /// Studio 164 owned by the analyst (12).
    pub(crate) fn seeded() -> Self {
        Self {
            studios: Mutex::new(vec![Studio::new(
                StudioId::new(164),
                UserId::new(12),
                "Checkout usability",
                "Buy one item",
                "",
                "https://shop.example.com",
                true,
                false,
            )]),
            tasks: Mutex::new(Vec::new()),
            participants: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StudioRepository for FakeStudioRepository {
    async fn find_studio(&self, studio_id: StudioId) -> AppResult<Option<Studio>> {
        Ok(self
            .studios
            .lock()
            .await
            .iter()
            .find(|studio| studio.id() == studio_id)
            .cloned())
    }

    async fn create_studio(&self, owner: UserId, draft: &StudioDraft) -> AppResult<Studio> {
        let mut studios = self.studios.lock().await;
        let next_id = studios
            .iter()
            .map(|studio| studio.id().as_i64() + 1)
            .max()
            .unwrap_or(1);
        let studio = draft.to_studio(StudioId::new(next_id), owner);

        let mut tasks = self.tasks.lock().await;
        for (task, position) in draft.tasks().iter().zip(0..) {
            let task_id = TaskId::new((tasks.len() + 1) as i64);
            tasks.push(task.to_task(task_id, studio.id(), position));
        }
        self.participants.lock().await.extend(
            draft
                .participants()
                .iter()
                .map(|user_id| (studio.id(), *user_id)),
        );

        studios.push(studio.clone());
        Ok(studio)
    }

    async fn list_tasks(&self, studio_id: StudioId) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .await
            .iter()
            .filter(|task| task.studio_id() == studio_id)
            .cloned()
            .collect())
    }

    async fn list_participants(&self, studio_id: StudioId) -> AppResult<Vec<UserId>> {
        Ok(self
            .participants
            .lock()
            .await
            .iter()
            .filter(|(studio, _)| *studio == studio_id)
            .map(|(_, user_id)| *user_id)
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeInvitationRepository {
    pub(crate) invitations: Mutex<Vec<Invitation>>,
}

#[async_trait]
impl InvitationRepository for FakeInvitationRepository {
    async fn find_invitation(&self, invitation_id: InvitationId) -> AppResult<Option<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .await
            .iter()
            .find(|invitation| invitation.id() == invitation_id)
            .cloned())
    }

    async fn list_invitations_for_studio(
        &self,
        studio_id: StudioId,
    ) -> AppResult<Vec<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .await
            .iter()
            .filter(|invitation| invitation.studio_id() == studio_id)
            .cloned()
            .collect())
    }

    async fn create_invitations(
        &self,
        studio_id: StudioId,
        drafts: &[(String, Changeset)],
    ) -> AppResult<Vec<Invitation>> {
        let mut invitations = self.invitations.lock().await;
        let mut created = Vec::with_capacity(drafts.len());
        for (token, changeset) in drafts {
            let id = InvitationId::new((invitations.len() + created.len() + 1) as i64);
            created.push(Invitation::from_changeset(
                id,
                studio_id,
                token.as_str(),
                changeset,
            )?);
        }
        invitations.extend(created.iter().cloned());
        Ok(created)
    }

    async fn apply_changes(
        &self,
        invitation_id: InvitationId,
        changeset: &Changeset,
    ) -> AppResult<Invitation> {
        let mut invitations = self.invitations.lock().await;
        let invitation = invitations
            .iter_mut()
            .find(|invitation| invitation.id() == invitation_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("invitation '{invitation_id}' does not exist"))
            })?;
        *invitation = invitation.with_changes(changeset)?;
        Ok(invitation.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeInvitationNotifier {
    pub(crate) notices: Mutex<Vec<InvitationNotice>>,
    attempts: Mutex<usize>,
    failing_attempt: Option<usize>,
}

impl FakeInvitationNotifier {
    /// Fails the given 1-based delivery attempt and accepts every other one.
    pub(crate) fn failing_on(attempt: usize) -> Self {
        Self {
            failing_attempt: Some(attempt),
            ..Self::default()
        }
    }
}

#[async_trait]
impl InvitationNotifier for FakeInvitationNotifier {
    async fn send_invitation(&self, notice: &InvitationNotice) -> AppResult<()> {
        let mut attempts = self.attempts.lock().await;
        *attempts += 1;
        if self.failing_attempt == Some(*attempts) {
            return Err(AppError::Internal(format!(
                "mail transport refused '{}'",
                notice.email
            )));
        }

        self.notices.lock().await.push(notice.clone());
        Ok(())
    }
}
