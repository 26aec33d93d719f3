use fieldgate_core::{AppError, AppResult};
use serde_json::{Map, Value};

use crate::changeset::Changeset;
use crate::value::{FieldKind, value_as_i64};

/// Registry entry describing one mutable field of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    creation_default: Option<&'static str>,
}

impl FieldSpec {
    /// Declares a field with no creation default. Such fields are required on creation.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            creation_default: None,
        }
    }

    /// Declares the value substituted when the creator omits the field or may not set it.
    #[must_use]
    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            creation_default: Some(default),
            ..self
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the storage kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the creation default coerced to the storage representation.
    #[must_use]
    pub fn creation_default(&self) -> Option<Value> {
        self.creation_default
            .and_then(|default| self.kind.coerce(&Value::String(default.to_owned())).ok())
    }

    /// Coerces a submitted value for storage in this field.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        self.kind.coerce(value)
    }
}

/// Resource type with an explicit field registry.
///
/// The registry is the only way submitted keys are matched against a
/// resource: a key with no registry entry does not exist.
pub trait RegisteredResource: Clone {
    /// Stable resource type name, also used as the fact name in conditions.
    const RESOURCE_TYPE: &'static str;

    /// Returns the field registry in display order.
    fn fields() -> &'static [FieldSpec];

    /// Returns the resource identifier.
    fn resource_id(&self) -> String;

    /// Reads one registered field.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Writes one registered field.
    fn set_field_value(&mut self, field: &str, value: Value) -> AppResult<()>;

    /// Returns the registry entry for a field name.
    fn field_spec(field: &str) -> Option<FieldSpec> {
        Self::fields().iter().find(|spec| spec.name() == field).copied()
    }

    /// Captures the current field values.
    fn snapshot(&self) -> ResourceSnapshot {
        let fields = Self::fields()
            .iter()
            .map(|spec| SnapshotField {
                spec: *spec,
                value: self.field_value(spec.name()).unwrap_or(Value::Null),
            })
            .collect();

        ResourceSnapshot::new(Self::RESOURCE_TYPE, self.resource_id(), fields)
    }

    /// Returns a copy with every change applied, leaving `self` untouched.
    fn with_changes(&self, changeset: &Changeset) -> AppResult<Self> {
        let mut updated = self.clone();
        for change in changeset.changes() {
            updated.set_field_value(change.field(), change.value().clone())?;
        }

        Ok(updated)
    }
}

/// One field of a resource snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotField {
    spec: FieldSpec,
    value: Value,
}

impl SnapshotField {
    /// Returns the registry entry.
    #[must_use]
    pub fn spec(&self) -> FieldSpec {
        self.spec
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Read-only view of a resource: identifier plus ordered field values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot {
    resource_type: &'static str,
    resource_id: String,
    fields: Vec<SnapshotField>,
}

impl ResourceSnapshot {
    /// Creates a snapshot from already captured fields.
    #[must_use]
    pub fn new(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        fields: Vec<SnapshotField>,
    ) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
            fields,
        }
    }

    /// Creates a snapshot from a field registry and a value mapping.
    #[must_use]
    pub fn from_values(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        specs: &[FieldSpec],
        values: &Map<String, Value>,
    ) -> Self {
        let fields = specs
            .iter()
            .map(|spec| SnapshotField {
                spec: *spec,
                value: values.get(spec.name()).cloned().unwrap_or(Value::Null),
            })
            .collect();

        Self::new(resource_type, resource_id, fields)
    }

    /// Returns the resource type name.
    #[must_use]
    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Returns the resource identifier.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.resource_id.as_str()
    }

    /// Returns fields in registry order.
    #[must_use]
    pub fn fields(&self) -> &[SnapshotField] {
        self.fields.as_slice()
    }

    /// Returns one field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SnapshotField> {
        self.fields.iter().find(|field| field.spec.name() == name)
    }

    /// Returns the current value of one field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.field(name).map(SnapshotField::value)
    }

    /// Returns field values keyed by name.
    #[must_use]
    pub fn values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.spec.name().to_owned(), field.value.clone()))
            .collect()
    }

    /// Returns the facts bound to this resource in condition expressions.
    #[must_use]
    pub fn facts(&self) -> Value {
        let mut facts = self.values();
        let id = self
            .resource_id
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(self.resource_id.clone()));
        facts.insert("id".to_owned(), id);
        Value::Object(facts)
    }
}

pub(crate) fn text_field(field: &str, value: &Value) -> AppResult<String> {
    match FieldKind::Text.coerce(value) {
        Ok(Value::String(content)) => Ok(content),
        Ok(_) => Err(invalid(field, "expected text")),
        Err(message) => Err(invalid(field, message.as_str())),
    }
}

pub(crate) fn integer_field(field: &str, value: &Value) -> AppResult<i64> {
    FieldKind::Integer
        .coerce(value)
        .map_err(|message| invalid(field, message.as_str()))
        .and_then(|coerced| value_as_i64(&coerced).ok_or_else(|| invalid(field, "expected an integer")))
}

pub(crate) fn flag_field(field: &str, value: &Value) -> AppResult<bool> {
    match FieldKind::Flag.coerce(value) {
        Ok(Value::Bool(flag)) => Ok(flag),
        Ok(_) => Err(invalid(field, "expected a flag")),
        Err(message) => Err(invalid(field, message.as_str())),
    }
}

pub(crate) fn unknown_field(resource_type: &str, field: &str) -> AppError {
    AppError::Validation(format!("{resource_type} has no field '{field}'"))
}

fn invalid(field: &str, message: &str) -> AppError {
    AppError::Validation(format!("invalid value for field '{field}': {message}"))
}
