use fieldgate_core::{AppError, AppResult, GroupId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::changeset::Changeset;
use crate::resource::{
    FieldSpec, RegisteredResource, flag_field, integer_field, text_field, unknown_field,
};
use crate::value::FieldKind;

/// `is_default` value of a group new users are not placed in.
pub const GROUP_NOT_DEFAULT: i64 = 0;
/// `is_default` value of a group new users join.
pub const GROUP_DEFAULT: i64 = 1;
/// `is_default` value of the group new users get as their primary group.
pub const GROUP_DEFAULT_PRIMARY: i64 = 2;

const GROUP_FIELDS: [FieldSpec; 7] = [
    FieldSpec::new("name", FieldKind::Text),
    FieldSpec::new("new_user_title", FieldKind::Text).with_default("New User"),
    FieldSpec::new("landing_page", FieldKind::Text).with_default("dashboard"),
    FieldSpec::new("theme", FieldKind::Text).with_default("default"),
    FieldSpec::new("is_default", FieldKind::Integer).with_default("0"),
    FieldSpec::new("icon", FieldKind::Text).with_default("fa fa-user"),
    FieldSpec::new("can_delete", FieldKind::Flag).with_default("1"),
];

/// User group with its presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
    is_default: i64,
    can_delete: bool,
    theme: String,
    landing_page: String,
    new_user_title: String,
    icon: String,
}

impl Group {
    /// Creates a group with every optional setting at its creation default.
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_default: GROUP_NOT_DEFAULT,
            can_delete: true,
            theme: "default".to_owned(),
            landing_page: "dashboard".to_owned(),
            new_user_title: "New User".to_owned(),
            icon: "fa fa-user".to_owned(),
        }
    }

    /// Builds a group from an approved creation changeset.
    pub fn from_changeset(id: GroupId, changeset: &Changeset) -> AppResult<Self> {
        let name = changeset
            .get("name")
            .ok_or_else(|| AppError::Validation("group name is required".to_owned()))
            .and_then(|value| text_field("name", value))?;

        Self::new(id, name).with_changes(changeset)
    }

    /// Restores a group from stored columns.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_stored(
        id: GroupId,
        name: String,
        is_default: i64,
        can_delete: bool,
        theme: String,
        landing_page: String,
        new_user_title: String,
        icon: String,
    ) -> Self {
        Self {
            id,
            name,
            is_default,
            can_delete,
            theme,
            landing_page,
            new_user_title,
            icon,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the unique group name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the default level (see [`GROUP_DEFAULT_PRIMARY`]).
    #[must_use]
    pub fn is_default(&self) -> i64 {
        self.is_default
    }

    /// Returns true for the group new users receive as primary group.
    #[must_use]
    pub fn is_default_primary(&self) -> bool {
        self.is_default == GROUP_DEFAULT_PRIMARY
    }

    /// Returns whether the group may be deleted.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    /// Returns the theme name.
    #[must_use]
    pub fn theme(&self) -> &str {
        self.theme.as_str()
    }

    /// Returns the page members land on after sign-in.
    #[must_use]
    pub fn landing_page(&self) -> &str {
        self.landing_page.as_str()
    }

    /// Returns the title given to new members.
    #[must_use]
    pub fn new_user_title(&self) -> &str {
        self.new_user_title.as_str()
    }

    /// Returns the icon class.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_str()
    }
}

impl RegisteredResource for Group {
    const RESOURCE_TYPE: &'static str = "group";

    fn fields() -> &'static [FieldSpec] {
        &GROUP_FIELDS
    }

    fn resource_id(&self) -> String {
        self.id.to_string()
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::from(self.name.as_str())),
            "new_user_title" => Some(Value::from(self.new_user_title.as_str())),
            "landing_page" => Some(Value::from(self.landing_page.as_str())),
            "theme" => Some(Value::from(self.theme.as_str())),
            "is_default" => Some(Value::from(self.is_default)),
            "icon" => Some(Value::from(self.icon.as_str())),
            "can_delete" => Some(Value::Bool(self.can_delete)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, field: &str, value: Value) -> AppResult<()> {
        match field {
            "name" => self.name = text_field(field, &value)?,
            "new_user_title" => self.new_user_title = text_field(field, &value)?,
            "landing_page" => self.landing_page = text_field(field, &value)?,
            "theme" => self.theme = text_field(field, &value)?,
            "is_default" => self.is_default = integer_field(field, &value)?,
            "icon" => self.icon = text_field(field, &value)?,
            "can_delete" => self.can_delete = flag_field(field, &value)?,
            _ => return Err(unknown_field(Self::RESOURCE_TYPE, field)),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::GroupId;
    use serde_json::json;

    use crate::changeset::{Changeset, FieldChange};
    use crate::resource::RegisteredResource;

    use super::{GROUP_DEFAULT_PRIMARY, Group};

    #[test]
    fn snapshot_lists_registry_fields_in_order() {
        let group = Group::new(GroupId::new(3), "Alpha");
        let snapshot = group.snapshot();
        let names: Vec<&str> = snapshot
            .fields()
            .iter()
            .map(|field| field.spec().name())
            .collect();

        assert_eq!(
            names,
            vec![
                "name",
                "new_user_title",
                "landing_page",
                "theme",
                "is_default",
                "icon",
                "can_delete"
            ]
        );
        assert_eq!(snapshot.value("can_delete"), Some(&json!(true)));
    }

    #[test]
    fn with_changes_leaves_original_untouched() {
        let group = Group::new(GroupId::new(3), "Alpha");
        let mut changeset = Changeset::new();
        changeset.push(FieldChange::new("theme", Some(json!("default")), json!("nyx")));
        changeset.push(FieldChange::new(
            "is_default",
            Some(json!(0)),
            json!(GROUP_DEFAULT_PRIMARY),
        ));

        let updated = group.with_changes(&changeset);
        assert!(updated.is_ok());
        let updated = updated.unwrap_or_else(|_| group.clone());
        assert_eq!(updated.theme(), "nyx");
        assert!(updated.is_default_primary());
        assert_eq!(group.theme(), "default");
    }

    #[test]
    fn from_changeset_requires_name() {
        let mut changeset = Changeset::new();
        changeset.push(FieldChange::new("theme", None, json!("nyx")));

        assert!(Group::from_changeset(GroupId::new(9), &changeset).is_err());
    }

    #[test]
    fn unknown_field_write_is_rejected() {
        let mut group = Group::new(GroupId::new(3), "Alpha");
        assert!(group.set_field_value("unknownField", json!("x")).is_err());
        assert_eq!(group.field_value("unknownField"), None);
    }
}
