use std::fmt::{Display, Formatter};

use fieldgate_core::{AppResult, GroupId, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

use crate::condition::{Condition, ConditionParseError};

/// Principal a grant is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GrantScope {
    /// Grant applies to every member of the group.
    Group(GroupId),
    /// Grant applies to one user account.
    User(UserId),
}

impl Display for GrantScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group(group_id) => write!(formatter, "group:{group_id}"),
            Self::User(user_id) => write!(formatter, "user:{user_id}"),
        }
    }
}

/// One stored hook grant with its condition parsed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct HookGrant {
    grant_id: i64,
    scope: GrantScope,
    hook: NonEmptyString,
    source: String,
    condition: Result<Condition, ConditionParseError>,
}

impl HookGrant {
    /// Creates a grant and parses its condition.
    ///
    /// A condition that fails to parse does not make construction fail: the
    /// grant is kept and denies every request it is consulted for.
    pub fn new(
        grant_id: i64,
        scope: GrantScope,
        hook: impl Into<String>,
        condition_source: impl Into<String>,
    ) -> AppResult<Self> {
        let source = condition_source.into();
        let condition = Condition::parse(source.as_str());

        Ok(Self {
            grant_id,
            scope,
            hook: NonEmptyString::new(hook)?,
            source,
            condition,
        })
    }

    /// Returns the stored grant identifier.
    #[must_use]
    pub fn grant_id(&self) -> i64 {
        self.grant_id
    }

    /// Returns the principal the grant is attached to.
    #[must_use]
    pub fn scope(&self) -> GrantScope {
        self.scope
    }

    /// Returns the hook name.
    #[must_use]
    pub fn hook(&self) -> &str {
        self.hook.as_str()
    }

    /// Returns the raw condition expression.
    #[must_use]
    pub fn condition_source(&self) -> &str {
        self.source.as_str()
    }

    /// Returns the parsed condition or the configuration defect that prevented parsing.
    pub fn condition(&self) -> Result<&Condition, &ConditionParseError> {
        self.condition.as_ref()
    }
}

/// Pair of hooks guarding edits and reads of one resource's settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookFamily {
    update_hook: String,
    view_hook: String,
}

impl HookFamily {
    /// Creates a family from explicit hook names.
    #[must_use]
    pub fn new(update_hook: impl Into<String>, view_hook: impl Into<String>) -> Self {
        Self {
            update_hook: update_hook.into(),
            view_hook: view_hook.into(),
        }
    }

    /// Builds `{base}_update` and `{base}_view`.
    #[must_use]
    pub fn suffixed(base: &str) -> Self {
        Self::new(format!("{base}_update"), format!("{base}_view"))
    }

    /// Builds `update_{noun}` and `view_{noun}`, the naming used by stored grants
    /// such as `update_group_setting`.
    #[must_use]
    pub fn prefixed(noun: &str) -> Self {
        Self::new(format!("update_{noun}"), format!("view_{noun}"))
    }

    /// Returns the hook that allows editing a field.
    #[must_use]
    pub fn update_hook(&self) -> &str {
        self.update_hook.as_str()
    }

    /// Returns the hook that allows reading a field.
    #[must_use]
    pub fn view_hook(&self) -> &str {
        self.view_hook.as_str()
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::GroupId;

    use super::{GrantScope, HookFamily, HookGrant};

    #[test]
    fn grant_keeps_unparseable_condition_as_defect() {
        let grant = HookGrant::new(1, GrantScope::Group(GroupId::new(2)), "uri_groups", "always(");
        assert!(grant.is_ok());
        assert!(grant.is_ok_and(|grant| grant.condition().is_err()));
    }

    #[test]
    fn grant_rejects_empty_hook() {
        let grant = HookGrant::new(1, GrantScope::Group(GroupId::new(2)), " ", "always()");
        assert!(grant.is_err());
    }

    #[test]
    fn hook_family_naming_forms() {
        let suffixed = HookFamily::suffixed("group_setting");
        assert_eq!(suffixed.update_hook(), "group_setting_update");
        assert_eq!(suffixed.view_hook(), "group_setting_view");

        let prefixed = HookFamily::prefixed("group_setting");
        assert_eq!(prefixed.update_hook(), "update_group_setting");
        assert_eq!(prefixed.view_hook(), "view_group_setting");
    }
}
