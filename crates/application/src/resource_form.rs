use fieldgate_domain::{FieldClassification, FieldVisibility, ResourceSnapshot};
use serde_json::{Map, Value};

/// Form metadata rendered for one subject: values plus per-field classification.
///
/// Hidden fields carry no value; the form never discloses what the subject
/// may not view.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceForm {
    /// Resource type name.
    pub resource_type: &'static str,
    /// Resource identifier, absent for creation forms.
    pub resource_id: Option<String>,
    /// Current or default values of visible fields.
    pub values: Map<String, Value>,
    /// Classification of every candidate field.
    pub visibility: FieldVisibility,
}

impl ResourceForm {
    /// Builds a form from a snapshot, keeping values of editable and read-only fields.
    #[must_use]
    pub fn from_snapshot(
        snapshot: &ResourceSnapshot,
        resource_id: Option<String>,
        visibility: FieldVisibility,
    ) -> Self {
        let values = snapshot
            .fields()
            .iter()
            .filter(|field| {
                matches!(
                    visibility.get(field.spec().name()),
                    Some(FieldClassification::Editable | FieldClassification::ReadOnly)
                )
            })
            .map(|field| (field.spec().name().to_owned(), field.value().clone()))
            .collect();

        Self {
            resource_type: snapshot.resource_type(),
            resource_id,
            values,
            visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::GroupId;
    use fieldgate_domain::{FieldClassification, FieldVisibility, Group, RegisteredResource};
    use serde_json::json;

    use super::ResourceForm;

    #[test]
    fn hidden_and_unclassified_fields_are_redacted() {
        let group = Group::new(GroupId::new(3), "Alpha");
        let mut visibility = FieldVisibility::new();
        visibility.insert("name", FieldClassification::Editable);
        visibility.insert("theme", FieldClassification::ReadOnly);
        visibility.insert("icon", FieldClassification::Hidden);

        let form = ResourceForm::from_snapshot(&group.snapshot(), Some("3".to_owned()), visibility);

        assert_eq!(form.values.get("name"), Some(&json!("Alpha")));
        assert_eq!(form.values.get("theme"), Some(&json!("default")));
        assert!(!form.values.contains_key("icon"));
        assert!(!form.values.contains_key("can_delete"));
    }
}
