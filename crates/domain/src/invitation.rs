use fieldgate_core::{AppError, AppResult, InvitationId, StudioId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::changeset::Changeset;
use crate::resource::{FieldSpec, RegisteredResource, flag_field, text_field, unknown_field};
use crate::value::FieldKind;

const INVITATION_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("email", FieldKind::Text),
    FieldSpec::new("locale", FieldKind::Text).with_default("en_US"),
    FieldSpec::new("title", FieldKind::Text).with_default("New User"),
    FieldSpec::new("flag_completed", FieldKind::Flag).with_default("0"),
    FieldSpec::new("flag_evaluated", FieldKind::Flag).with_default("0"),
];

/// Invitation of one participant to a studio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    studio_id: StudioId,
    token: String,
    email: String,
    locale: String,
    title: String,
    flag_completed: bool,
    flag_evaluated: bool,
}

impl Invitation {
    /// Builds an invitation from an approved creation changeset.
    pub fn from_changeset(
        id: InvitationId,
        studio_id: StudioId,
        token: impl Into<String>,
        changeset: &Changeset,
    ) -> AppResult<Self> {
        let email = changeset
            .get("email")
            .ok_or_else(|| AppError::Validation("invitation email is required".to_owned()))
            .and_then(|value| text_field("email", value))?;

        let invitation = Self {
            id,
            studio_id,
            token: token.into(),
            email,
            locale: "en_US".to_owned(),
            title: "New User".to_owned(),
            flag_completed: false,
            flag_evaluated: false,
        };

        invitation.with_changes(changeset)
    }

    /// Restores an invitation from stored columns.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_stored(
        id: InvitationId,
        studio_id: StudioId,
        token: String,
        email: String,
        locale: String,
        title: String,
        flag_completed: bool,
        flag_evaluated: bool,
    ) -> Self {
        Self {
            id,
            studio_id,
            token,
            email,
            locale,
            title,
            flag_completed,
            flag_evaluated,
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the studio the participant is invited to.
    #[must_use]
    pub fn studio_id(&self) -> StudioId {
        self.studio_id
    }

    /// Returns the acceptance token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the invitee email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the invitee locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.locale.as_str()
    }

    /// Returns the title the invitee account receives.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns whether the invitee completed the studio.
    #[must_use]
    pub fn flag_completed(&self) -> bool {
        self.flag_completed
    }

    /// Returns whether the analyst evaluated the session.
    #[must_use]
    pub fn flag_evaluated(&self) -> bool {
        self.flag_evaluated
    }
}

impl RegisteredResource for Invitation {
    const RESOURCE_TYPE: &'static str = "invitation";

    fn fields() -> &'static [FieldSpec] {
        &INVITATION_FIELDS
    }

    fn resource_id(&self) -> String {
        self.id.to_string()
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "email" => Some(Value::from(self.email.as_str())),
            "locale" => Some(Value::from(self.locale.as_str())),
            "title" => Some(Value::from(self.title.as_str())),
            "flag_completed" => Some(Value::Bool(self.flag_completed)),
            "flag_evaluated" => Some(Value::Bool(self.flag_evaluated)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, field: &str, value: Value) -> AppResult<()> {
        match field {
            "email" => self.email = text_field(field, &value)?,
            "locale" => self.locale = text_field(field, &value)?,
            "title" => self.title = text_field(field, &value)?,
            "flag_completed" => self.flag_completed = flag_field(field, &value)?,
            "flag_evaluated" => self.flag_evaluated = flag_field(field, &value)?,
            _ => return Err(unknown_field(Self::RESOURCE_TYPE, field)),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::{InvitationId, StudioId};
    use serde_json::json;

    use crate::changeset::{Changeset, FieldChange};

    use super::Invitation;

    #[test]
    fn creation_keeps_unset_fields_at_defaults() {
        let mut changeset = Changeset::new();
        changeset.push(FieldChange::new("email", None, json!("guest@example.com")));
        changeset.push(FieldChange::new("flag_completed", None, json!("1")));

        let invitation = Invitation::from_changeset(
            InvitationId::new(1),
            StudioId::new(164),
            "token-1",
            &changeset,
        );

        match invitation {
            Ok(invitation) => {
                assert_eq!(invitation.email(), "guest@example.com");
                assert_eq!(invitation.locale(), "en_US");
                assert!(invitation.flag_completed());
                assert!(!invitation.flag_evaluated());
            }
            Err(error) => panic!("unexpected error: {error}"),
        }
    }
}
