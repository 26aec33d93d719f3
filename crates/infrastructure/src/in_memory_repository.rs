use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fieldgate_application::{
    AuditEvent, AuditRepository, GrantRepository, GroupRepository, InvitationRepository,
    StudioRepository, UserRepository,
};
use fieldgate_core::{
    AppError, AppResult, GroupId, InvitationId, StudioId, TaskId, UserId, UserIdentity,
};
use fieldgate_domain::{
    Changeset, GrantScope, Group, HookGrant, Invitation, MembershipIndex, RegisteredResource,
    Studio, StudioDraft, Task,
};
use tokio::sync::RwLock;

use crate::seed;

mod audit;
mod grants;
mod groups;
mod studios;
mod users;


/// Audit event with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAuditEvent {
    /// Stored event.
    pub event: AuditEvent,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct AdminState {
    groups: BTreeMap<GroupId, Group>,
    users: BTreeMap<UserId, UserIdentity>,
    user_titles: BTreeMap<UserId, String>,
    memberships: BTreeSet<(UserId, GroupId)>,
    grants: Vec<HookGrant>,
    studios: BTreeMap<StudioId, Studio>,
    tasks: BTreeMap<TaskId, Task>,
    participants: Vec<(StudioId, UserId)>,
    invitations: BTreeMap<InvitationId, Invitation>,
    audit_events: Vec<RecordedAuditEvent>,
}

/// In-memory implementation of every repository port.
///
/// All state lives behind one lock, so each mutation is applied in a single
/// write critical section.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<AdminState>,
}

impl InMemoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the default groups, accounts, grants and studio.
    pub fn seeded() -> AppResult<Self> {
        let state = AdminState {
            groups: seed::groups()?
                .into_iter()
                .map(|group| (group.id(), group))
                .collect(),
            users: seed::users()
                .into_iter()
                .map(|identity| (identity.user_id(), identity))
                .collect(),
            user_titles: seed::user_titles()
                .into_iter()
                .map(|(user_id, title)| (user_id, title.to_owned()))
                .collect(),
            memberships: seed::memberships().into_iter().collect(),
            grants: seed::group_grants()?,
            studios: seed::studios()
                .into_iter()
                .map(|studio| (studio.id(), studio))
                .collect(),
            tasks: BTreeMap::new(),
            participants: Vec::new(),
            invitations: BTreeMap::new(),
            audit_events: Vec::new(),
        };

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Returns recorded audit events in append order.
    pub async fn audit_events(&self) -> Vec<RecordedAuditEvent> {
        self.state.read().await.audit_events.clone()
    }

    /// Returns the title shown for an account.
    pub async fn user_title(&self, user_id: UserId) -> Option<String> {
        self.state.read().await.user_titles.get(&user_id).cloned()
    }
}
