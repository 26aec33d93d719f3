use std::collections::BTreeMap;

use fieldgate_core::{GroupId, UserId};
use serde_json::Value;

use crate::condition::FactSource;
use crate::resource::ResourceSnapshot;
use crate::subject::{MembershipIndex, Subject};

/// Fact name bound to the acting subject.
pub const SELF_FACT: &str = "self";
/// Fact name bound to the field under consideration.
pub const PROPERTY_FACT: &str = "property";
/// Fact name bound to the target resource.
pub const RESOURCE_FACT: &str = "resource";

/// Open fact mapping supplied with one authorization query.
///
/// `self` is never stored here; it is always derived from the subject being
/// authorized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorizationContext {
    facts: BTreeMap<String, Value>,
    memberships: MembershipIndex,
}

impl AuthorizationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one fact.
    #[must_use]
    pub fn with_fact(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if name != SELF_FACT {
            self.facts.insert(name, value);
        }
        self
    }

    /// Binds `property` to a field name.
    #[must_use]
    pub fn with_property(self, field: &str) -> Self {
        self.with_fact(PROPERTY_FACT, Value::String(field.to_owned()))
    }

    /// Binds the resource both as `resource` and under its type name, e.g. `group`.
    #[must_use]
    pub fn with_resource(self, resource: &ResourceSnapshot) -> Self {
        let facts = resource.facts();
        self.with_fact(resource.resource_type(), facts.clone())
            .with_fact(RESOURCE_FACT, facts)
    }

    /// Supplies memberships of users other than the subject for `in_group`.
    #[must_use]
    pub fn with_memberships(mut self, memberships: MembershipIndex) -> Self {
        self.memberships = memberships;
        self
    }

    /// Returns one fact by name.
    #[must_use]
    pub fn fact(&self, name: &str) -> Option<&Value> {
        self.facts.get(name)
    }

    /// Returns the membership index.
    #[must_use]
    pub fn memberships(&self) -> &MembershipIndex {
        &self.memberships
    }

    /// Binds the context to a subject for condition evaluation.
    #[must_use]
    pub fn scope_for<'a>(&'a self, subject: &'a Subject) -> EvaluationScope<'a> {
        EvaluationScope {
            subject,
            subject_facts: subject.facts(),
            context: self,
        }
    }
}

/// Facts visible to one condition evaluation: `self` plus the context.
#[derive(Debug)]
pub struct EvaluationScope<'a> {
    subject: &'a Subject,
    subject_facts: Value,
    context: &'a AuthorizationContext,
}

impl FactSource for EvaluationScope<'_> {
    fn fact(&self, name: &str) -> Option<&Value> {
        if name == SELF_FACT {
            return Some(&self.subject_facts);
        }

        self.context.fact(name)
    }

    fn is_member(&self, user_id: UserId, group_id: GroupId) -> bool {
        if user_id == self.subject.user_id() {
            return self.subject.is_member_of(group_id);
        }

        self.context.memberships.is_member(user_id, group_id)
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::{GroupId, UserId, UserIdentity};
    use serde_json::json;

    use crate::condition::FactSource;
    use crate::subject::{GroupMembership, MembershipIndex, Subject};

    use super::AuthorizationContext;

    fn subject() -> Subject {
        Subject::new(
            UserIdentity::new(UserId::new(1), "admin", "Admin", "admin@example.com", GroupId::new(2)),
            vec![GroupMembership::new(GroupId::new(2), Vec::new())],
            Vec::new(),
        )
    }

    #[test]
    fn self_fact_cannot_be_overridden() {
        let subject = subject();
        let context = AuthorizationContext::new().with_fact("self", json!({"id": 99}));
        let scope = context.scope_for(&subject);

        assert_eq!(scope.fact("self").map(|facts| facts["id"].clone()), Some(json!(1)));
    }

    #[test]
    fn membership_lookup_prefers_subject_for_itself() {
        let subject = subject();
        let context = AuthorizationContext::new()
            .with_memberships(MembershipIndex::new().with_user(UserId::new(5), [GroupId::new(1)]));
        let scope = context.scope_for(&subject);

        assert!(scope.is_member(UserId::new(1), GroupId::new(2)));
        assert!(scope.is_member(UserId::new(5), GroupId::new(1)));
        assert!(!scope.is_member(UserId::new(5), GroupId::new(2)));
    }
}
