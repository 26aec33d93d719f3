use std::collections::{BTreeMap, BTreeSet};

use fieldgate_core::{GroupId, UserId, UserIdentity};
use serde_json::{Value, json};

use crate::grant::HookGrant;

/// Group membership of the acting user with the grants attached to the group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembership {
    group_id: GroupId,
    grants: Vec<HookGrant>,
}

impl GroupMembership {
    /// Creates a membership entry.
    #[must_use]
    pub fn new(group_id: GroupId, grants: Vec<HookGrant>) -> Self {
        Self { group_id, grants }
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns grants attached to the group.
    #[must_use]
    pub fn grants(&self) -> &[HookGrant] {
        self.grants.as_slice()
    }
}

/// Acting principal, loaded once per request and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    identity: UserIdentity,
    memberships: Vec<GroupMembership>,
    user_grants: Vec<HookGrant>,
}

impl Subject {
    /// Creates a subject from its identity, memberships and personal grants.
    #[must_use]
    pub fn new(
        identity: UserIdentity,
        memberships: Vec<GroupMembership>,
        user_grants: Vec<HookGrant>,
    ) -> Self {
        Self {
            identity,
            memberships,
            user_grants,
        }
    }

    /// Returns the account identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.identity.user_id()
    }

    /// Returns group memberships.
    #[must_use]
    pub fn memberships(&self) -> &[GroupMembership] {
        self.memberships.as_slice()
    }

    /// Returns grants attached directly to the account.
    #[must_use]
    pub fn user_grants(&self) -> &[HookGrant] {
        self.user_grants.as_slice()
    }

    /// Returns whether the subject belongs to the group.
    #[must_use]
    pub fn is_member_of(&self, group_id: GroupId) -> bool {
        self.memberships
            .iter()
            .any(|membership| membership.group_id == group_id)
    }

    /// Iterates every grant, group-scoped first, whose hook matches.
    pub fn grants_for_hook<'a>(&'a self, hook: &'a str) -> impl Iterator<Item = &'a HookGrant> {
        self.memberships
            .iter()
            .flat_map(|membership| membership.grants.iter())
            .chain(self.user_grants.iter())
            .filter(move |grant| grant.hook() == hook)
    }

    /// Returns the facts bound to `self` in condition expressions.
    #[must_use]
    pub fn facts(&self) -> Value {
        let groups: Vec<i64> = self
            .memberships
            .iter()
            .map(|membership| membership.group_id.as_i64())
            .collect();

        json!({
            "id": self.identity.user_id().as_i64(),
            "user_name": self.identity.user_name(),
            "display_name": self.identity.display_name(),
            "email": self.identity.email(),
            "primary_group_id": self.identity.primary_group_id().as_i64(),
            "groups": groups,
        })
    }
}

/// Group memberships of users other than the subject, used by `in_group`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    groups_by_user: BTreeMap<UserId, BTreeSet<GroupId>>,
}

impl MembershipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the group memberships of one user.
    pub fn insert(&mut self, user_id: UserId, group_ids: impl IntoIterator<Item = GroupId>) {
        self.groups_by_user
            .entry(user_id)
            .or_default()
            .extend(group_ids);
    }

    /// Returns a copy of the index with the user's memberships recorded.
    #[must_use]
    pub fn with_user(
        mut self,
        user_id: UserId,
        group_ids: impl IntoIterator<Item = GroupId>,
    ) -> Self {
        self.insert(user_id, group_ids);
        self
    }

    /// Returns whether the user is known to belong to the group.
    #[must_use]
    pub fn is_member(&self, user_id: UserId, group_id: GroupId) -> bool {
        self.groups_by_user
            .get(&user_id)
            .is_some_and(|groups| groups.contains(&group_id))
    }

    /// Returns the groups recorded for a user.
    #[must_use]
    pub fn groups_of(&self, user_id: UserId) -> Vec<GroupId> {
        self.groups_by_user
            .get(&user_id)
            .map(|groups| groups.iter().copied().collect())
            .unwrap_or_default()
    }
}
