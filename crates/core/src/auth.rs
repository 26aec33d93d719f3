use serde::{Deserialize, Serialize};

use crate::{GroupId, UserId};

/// Account information for the acting user, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    user_name: String,
    display_name: String,
    email: String,
    primary_group_id: GroupId,
}

impl UserIdentity {
    /// Creates a user identity from stored account data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        user_name: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        primary_group_id: GroupId,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            display_name: display_name.into(),
            email: email.into(),
            primary_group_id,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the account email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the primary group of the account.
    #[must_use]
    pub fn primary_group_id(&self) -> GroupId {
        self.primary_group_id
    }
}
