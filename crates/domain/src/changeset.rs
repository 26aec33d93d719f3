use fieldgate_core::AppError;
use serde_json::{Map, Value};
use thiserror::Error;

/// One approved field change.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    field: String,
    previous: Option<Value>,
    value: Value,
}

impl FieldChange {
    /// Creates a field change. `previous` is `None` for values set at creation.
    #[must_use]
    pub fn new(field: impl Into<String>, previous: Option<Value>, value: Value) -> Self {
        Self {
            field: field.into(),
            previous,
            value,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the value before the change, if the resource existed.
    #[must_use]
    pub fn previous(&self) -> Option<&Value> {
        self.previous.as_ref()
    }

    /// Returns the new value in storage representation.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Approved set of field changes, applied all at once or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    changes: Vec<FieldChange>,
}

impl Changeset {
    /// Creates an empty changeset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a change, replacing an earlier change to the same field.
    pub fn push(&mut self, change: FieldChange) {
        match self
            .changes
            .iter_mut()
            .find(|existing| existing.field == change.field)
        {
            Some(existing) => *existing = change,
            None => self.changes.push(change),
        }
    }

    /// Returns true when nothing changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns changes in submission order.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        self.changes.as_slice()
    }

    /// Returns the new value of one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.changes
            .iter()
            .find(|change| change.field == field)
            .map(FieldChange::value)
    }

    /// Returns changed field names.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.changes.iter().map(FieldChange::field).collect()
    }

    /// Returns new values keyed by field name.
    #[must_use]
    pub fn values(&self) -> Map<String, Value> {
        self.changes
            .iter()
            .map(|change| (change.field.clone(), change.value.clone()))
            .collect()
    }
}

/// Why a submitted update was rejected. Every variant means nothing was applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    /// A submitted key is not a registered field of the resource.
    #[error("{resource_type} has no field '{field}'")]
    NoSuchField {
        /// Resource type name.
        resource_type: String,
        /// Submitted key.
        field: String,
    },

    /// The subject may not change this field.
    #[error("not authorized to change field '{field}'")]
    Unauthorized {
        /// Field whose change was denied.
        field: String,
    },

    /// A business rule rejected the submission before authorization ran.
    #[error("{message}")]
    ConstraintViolation {
        /// Field the rule applies to, if any.
        field: Option<String>,
        /// Human-readable rule failure.
        message: String,
    },

    /// A submitted value cannot be stored in the field.
    #[error("invalid value for field '{field}': {message}")]
    InvalidValue {
        /// Field with the invalid value.
        field: String,
        /// Coercion failure description.
        message: String,
    },
}

impl From<DenialReason> for AppError {
    fn from(value: DenialReason) -> Self {
        let message = value.to_string();
        match value {
            DenialReason::NoSuchField { .. } | DenialReason::InvalidValue { .. } => {
                AppError::Validation(message)
            }
            DenialReason::Unauthorized { .. } => AppError::Forbidden(message),
            DenialReason::ConstraintViolation { .. } => AppError::Conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::AppError;
    use serde_json::json;

    use super::{Changeset, DenialReason, FieldChange};

    #[test]
    fn push_replaces_existing_field_change() {
        let mut changeset = Changeset::new();
        changeset.push(FieldChange::new("name", Some(json!("Alpha")), json!("Beta")));
        changeset.push(FieldChange::new("name", Some(json!("Alpha")), json!("Gamma")));

        assert_eq!(changeset.len(), 1);
        assert_eq!(changeset.get("name"), Some(&json!("Gamma")));
    }

    #[test]
    fn denial_reasons_map_to_error_categories() {
        let unauthorized = AppError::from(DenialReason::Unauthorized {
            field: "theme".to_owned(),
        });
        assert!(matches!(unauthorized, AppError::Forbidden(_)));

        let missing = AppError::from(DenialReason::NoSuchField {
            resource_type: "group".to_owned(),
            field: "unknownField".to_owned(),
        });
        assert!(matches!(missing, AppError::Validation(_)));

        let conflict = AppError::from(DenialReason::ConstraintViolation {
            field: Some("name".to_owned()),
            message: "group name 'Alpha' is already in use".to_owned(),
        });
        assert!(matches!(conflict, AppError::Conflict(_)));
    }
}
