use serde_json::Value;

use crate::changeset::{Changeset, DenialReason};
use crate::resource::ResourceSnapshot;
use crate::value::loosely_equal;

/// Business rule checked against pending changes before any authorization call.
pub trait ChangeConstraint: Send + Sync {
    /// Rejects the pending changes with a [`DenialReason::ConstraintViolation`].
    fn check(&self, resource: Option<&ResourceSnapshot>, pending: &Changeset)
    -> Result<(), DenialReason>;
}

/// Rejects a new value for `field` that is already taken by another resource.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueValueConstraint {
    field: String,
    taken: Vec<Value>,
    label: String,
}

impl UniqueValueConstraint {
    /// Creates a uniqueness rule. `label` names the value in the failure
    /// message, e.g. `group name`.
    #[must_use]
    pub fn new(field: impl Into<String>, taken: Vec<Value>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            taken,
            label: label.into(),
        }
    }
}

impl ChangeConstraint for UniqueValueConstraint {
    fn check(
        &self,
        _resource: Option<&ResourceSnapshot>,
        pending: &Changeset,
    ) -> Result<(), DenialReason> {
        let Some(value) = pending.get(self.field.as_str()) else {
            return Ok(());
        };

        if self.taken.iter().any(|taken| loosely_equal(taken, value)) {
            let shown = value
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| value.to_string());
            return Err(DenialReason::ConstraintViolation {
                field: Some(self.field.clone()),
                message: format!("{} '{shown}' is already in use", self.label),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::changeset::{Changeset, DenialReason, FieldChange};

    use super::{ChangeConstraint, UniqueValueConstraint};

    #[test]
    fn unique_value_rejects_taken_value() {
        let constraint = UniqueValueConstraint::new("name", vec![json!("Beta")], "group name");
        let mut pending = Changeset::new();
        pending.push(FieldChange::new("name", Some(json!("Alpha")), json!("Beta")));

        let result = constraint.check(None, &pending);
        assert!(matches!(
            result,
            Err(DenialReason::ConstraintViolation { field: Some(ref field), .. }) if field == "name"
        ));
    }

    #[test]
    fn unique_value_ignores_untouched_field() {
        let constraint = UniqueValueConstraint::new("name", vec![json!("Beta")], "group name");
        let mut pending = Changeset::new();
        pending.push(FieldChange::new("theme", Some(json!("default")), json!("nyx")));

        assert!(constraint.check(None, &pending).is_ok());
    }
}
