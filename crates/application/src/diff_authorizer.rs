use fieldgate_domain::{
    AuthorizationContext, ChangeConstraint, Changeset, DenialReason, FieldChange, FieldSpec,
    HookFamily, ResourceSnapshot, Subject, loosely_equal,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::PermissionOracle;

/// Turns a submitted key/value mapping into an approved changeset or a denial.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffAuthorizer {
    oracle: PermissionOracle,
}

impl DiffAuthorizer {
    /// Creates an authorizer backed by the given oracle.
    #[must_use]
    pub fn new(oracle: PermissionOracle) -> Self {
        Self { oracle }
    }

    /// Authorizes changes to an existing resource.
    ///
    /// Checks run in a fixed order: every key must be a registered field,
    /// unchanged values are dropped after coercion, constraints run on the
    /// remaining changes, then each change is authorized with the update hook.
    /// Any failure rejects the whole submission.
    pub fn authorize_update(
        &self,
        subject: &Subject,
        resource: &ResourceSnapshot,
        submitted: &Map<String, Value>,
        family: &HookFamily,
        constraints: &[&dyn ChangeConstraint],
        context: &AuthorizationContext,
    ) -> Result<Changeset, DenialReason> {
        for field in submitted.keys() {
            if resource.field(field).is_none() {
                return Err(DenialReason::NoSuchField {
                    resource_type: resource.resource_type().to_owned(),
                    field: field.clone(),
                });
            }
        }

        let mut changeset = Changeset::new();
        for (field, value) in submitted {
            let Some(current) = resource.field(field) else {
                continue;
            };
            let coerced = current
                .spec()
                .coerce(value)
                .map_err(|message| DenialReason::InvalidValue {
                    field: field.clone(),
                    message,
                })?;

            if loosely_equal(current.value(), &coerced) {
                continue;
            }

            changeset.push(FieldChange::new(
                field.as_str(),
                Some(current.value().clone()),
                coerced,
            ));
        }

        for constraint in constraints {
            constraint.check(Some(resource), &changeset)?;
        }

        let resource_context = context.clone().with_resource(resource);
        for change in changeset.changes() {
            let field_context = resource_context.clone().with_property(change.field());
            if !self
                .oracle
                .authorize(subject, family.update_hook(), &field_context)
            {
                debug!(
                    resource_type = resource.resource_type(),
                    resource_id = resource.resource_id(),
                    field = change.field(),
                    "field change denied"
                );
                return Err(DenialReason::Unauthorized {
                    field: change.field().to_owned(),
                });
            }
        }

        debug!(
            resource_type = resource.resource_type(),
            resource_id = resource.resource_id(),
            changed = changeset.len(),
            "changeset approved"
        );
        Ok(changeset)
    }

    /// Authorizes the initial values of a resource about to be created.
    ///
    /// Fields the subject may not set, or did not submit, receive their
    /// creation default. Fields without a default are required and are taken
    /// as submitted. Creation never fails with [`DenialReason::Unauthorized`].
    pub fn authorize_creation(
        &self,
        subject: &Subject,
        resource_type: &str,
        fields: &[FieldSpec],
        submitted: &Map<String, Value>,
        family: &HookFamily,
        constraints: &[&dyn ChangeConstraint],
        context: &AuthorizationContext,
    ) -> Result<Changeset, DenialReason> {
        let mut pending = Changeset::new();
        for (field, value) in submitted {
            let Some(spec) = fields.iter().find(|spec| spec.name() == field) else {
                return Err(DenialReason::NoSuchField {
                    resource_type: resource_type.to_owned(),
                    field: field.clone(),
                });
            };
            let coerced = spec
                .coerce(value)
                .map_err(|message| DenialReason::InvalidValue {
                    field: field.clone(),
                    message,
                })?;
            pending.push(FieldChange::new(field.as_str(), None, coerced));
        }

        for constraint in constraints {
            constraint.check(None, &pending)?;
        }

        let mut changeset = Changeset::new();
        for spec in fields {
            let submitted_value = pending.get(spec.name());
            let value = match (submitted_value, spec.creation_default()) {
                (Some(value), None) => value.clone(),
                (None, None) => {
                    return Err(DenialReason::InvalidValue {
                        field: spec.name().to_owned(),
                        message: "a value is required".to_owned(),
                    });
                }
                (Some(value), Some(default)) => {
                    let field_context = context.clone().with_property(spec.name());
                    if self
                        .oracle
                        .authorize(subject, family.update_hook(), &field_context)
                    {
                        value.clone()
                    } else {
                        debug!(
                            resource_type,
                            field = spec.name(),
                            "creation value replaced by default"
                        );
                        default
                    }
                }
                (None, Some(default)) => default,
            };

            changeset.push(FieldChange::new(spec.name(), None, value));
        }

        Ok(changeset)
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::GroupId;
    use fieldgate_domain::{
        AuthorizationContext, DenialReason, Group, HookFamily, RegisteredResource,
        UniqueValueConstraint,
    };
    use serde_json::{Map, Value, json};

    use crate::test_support::{group_grant, subject_with};

    use super::DiffAuthorizer;

    fn submission(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn family() -> HookFamily {
        HookFamily::prefixed("group_setting")
    }

    #[test]
    fn unknown_field_rejects_before_change_detection() {
        let subject = subject_with(
            1,
            vec![(2, vec![group_grant(2, "update_group_setting", "always()")])],
            Vec::new(),
        );
        let group = Group::new(GroupId::new(3), "Alpha");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "name": "Beta", "unknownField": "x" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        assert_eq!(
            result,
            Err(DenialReason::NoSuchField {
                resource_type: "group".to_owned(),
                field: "unknownField".to_owned(),
            })
        );
    }

    #[test]
    fn unchanged_values_produce_empty_changeset_without_grants() {
        let subject = subject_with(13, vec![(1, Vec::new())], Vec::new());
        let group = Group::new(GroupId::new(3), "Alpha");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "name": "Alpha", "is_default": "0", "can_delete": "1" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        match result {
            Ok(changeset) => assert!(changeset.is_empty()),
            Err(reason) => panic!("unexpected denial: {reason}"),
        }
    }

    #[test]
    fn one_denied_field_rejects_whole_submission() {
        let subject = subject_with(
            1,
            vec![(
                2,
                vec![group_grant(
                    2,
                    "update_group_setting",
                    r#"in(property, ["name","icon"])"#,
                )],
            )],
            Vec::new(),
        );
        let group = Group::new(GroupId::new(3), "Alpha");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "name": "Beta", "theme": "nyx" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        assert_eq!(
            result,
            Err(DenialReason::Unauthorized {
                field: "theme".to_owned()
            })
        );
    }

    #[test]
    fn changes_record_previous_values() {
        let subject = subject_with(
            1,
            vec![(2, vec![group_grant(2, "update_group_setting", "always()")])],
            Vec::new(),
        );
        let group = Group::new(GroupId::new(3), "Alpha");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "name": "Alpha", "theme": "nyx", "is_default": "1" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        let changeset = match result {
            Ok(changeset) => changeset,
            Err(reason) => panic!("unexpected denial: {reason}"),
        };
        let mut fields = changeset.fields();
        fields.sort_unstable();
        assert_eq!(fields, vec!["is_default", "theme"]);
        let theme = changeset
            .changes()
            .iter()
            .find(|change| change.field() == "theme");
        assert_eq!(
            theme.and_then(|change| change.previous()),
            Some(&json!("default"))
        );
        assert_eq!(changeset.get("is_default"), Some(&json!(1)));
    }

    #[test]
    fn resource_is_bound_for_conditions() {
        let subject = subject_with(
            1,
            vec![(
                2,
                vec![group_grant(2, "update_group_setting", "equals(group.id, 3)")],
            )],
            Vec::new(),
        );
        let authorizer = DiffAuthorizer::default();
        let changes = submission(json!({ "theme": "nyx" }));

        let allowed = authorizer.authorize_update(
            &subject,
            &Group::new(GroupId::new(3), "Alpha").snapshot(),
            &changes,
            &family(),
            &[],
            &AuthorizationContext::new(),
        );
        let denied = authorizer.authorize_update(
            &subject,
            &Group::new(GroupId::new(4), "Gamma").snapshot(),
            &changes,
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        assert!(allowed.is_ok());
        assert!(matches!(denied, Err(DenialReason::Unauthorized { .. })));
    }

    #[test]
    fn constraint_violation_precedes_authorization() {
        let subject = subject_with(13, vec![(1, Vec::new())], Vec::new());
        let group = Group::new(GroupId::new(3), "Alpha");
        let unique = UniqueValueConstraint::new("name", vec![json!("Beta")], "group name");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "name": "Beta" })),
            &family(),
            &[&unique],
            &AuthorizationContext::new(),
        );

        assert!(matches!(
            result,
            Err(DenialReason::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn invalid_value_is_rejected() {
        let subject = subject_with(
            1,
            vec![(2, vec![group_grant(2, "update_group_setting", "always()")])],
            Vec::new(),
        );
        let group = Group::new(GroupId::new(3), "Alpha");

        let result = DiffAuthorizer::default().authorize_update(
            &subject,
            &group.snapshot(),
            &submission(json!({ "is_default": "primary" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        assert!(matches!(result, Err(DenialReason::InvalidValue { .. })));
    }

    #[test]
    fn creation_substitutes_defaults_for_unauthorized_and_omitted_fields() {
        let subject = subject_with(
            4,
            vec![(
                4,
                vec![group_grant(
                    4,
                    "update_group_setting",
                    r#"in(property, ["landing_page"])"#,
                )],
            )],
            Vec::new(),
        );

        let result = DiffAuthorizer::default().authorize_creation(
            &subject,
            Group::RESOURCE_TYPE,
            Group::fields(),
            &submission(json!({
                "name": "Gamma",
                "theme": "nyx",
                "landing_page": "analist",
            })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        let changeset = match result {
            Ok(changeset) => changeset,
            Err(reason) => panic!("unexpected denial: {reason}"),
        };
        assert_eq!(changeset.get("name"), Some(&json!("Gamma")));
        assert_eq!(changeset.get("theme"), Some(&json!("default")));
        assert_eq!(changeset.get("landing_page"), Some(&json!("analist")));
        assert_eq!(changeset.get("icon"), Some(&json!("fa fa-user")));
        assert_eq!(changeset.get("is_default"), Some(&json!(0)));
        assert_eq!(changeset.len(), Group::fields().len());
    }

    #[test]
    fn creation_requires_fields_without_default() {
        let subject = subject_with(1, Vec::new(), Vec::new());

        let result = DiffAuthorizer::default().authorize_creation(
            &subject,
            Group::RESOURCE_TYPE,
            Group::fields(),
            &submission(json!({ "theme": "nyx" })),
            &family(),
            &[],
            &AuthorizationContext::new(),
        );

        assert!(matches!(
            result,
            Err(DenialReason::InvalidValue { ref field, .. }) if field == "name"
        ));
    }
}
