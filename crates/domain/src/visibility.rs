use serde::{Deserialize, Serialize};

/// How one field is presented to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClassification {
    /// Field may be changed.
    Editable,
    /// Field is shown disabled.
    ReadOnly,
    /// Field is omitted.
    Hidden,
}

impl FieldClassification {
    /// Returns stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editable => "editable",
            Self::ReadOnly => "read_only",
            Self::Hidden => "hidden",
        }
    }
}

/// Classification of candidate fields in candidate order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibility {
    entries: Vec<(String, FieldClassification)>,
}

impl FieldVisibility {
    /// Creates an empty classification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the classification of one field.
    pub fn insert(&mut self, field: impl Into<String>, classification: FieldClassification) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = classification,
            None => self.entries.push((field, classification)),
        }
    }

    /// Returns the classification of one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<FieldClassification> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, classification)| *classification)
    }

    /// Returns all entries in candidate order.
    #[must_use]
    pub fn entries(&self) -> &[(String, FieldClassification)] {
        self.entries.as_slice()
    }

    /// Returns fields the subject may edit.
    #[must_use]
    pub fn editable_fields(&self) -> Vec<String> {
        self.fields_with(FieldClassification::Editable)
    }

    /// Returns fields rendered disabled.
    #[must_use]
    pub fn disabled_fields(&self) -> Vec<String> {
        self.fields_with(FieldClassification::ReadOnly)
    }

    /// Returns fields omitted from the form.
    #[must_use]
    pub fn hidden_fields(&self) -> Vec<String> {
        self.fields_with(FieldClassification::Hidden)
    }

    fn fields_with(&self, classification: FieldClassification) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, value)| *value == classification)
            .map(|(name, _)| name.clone())
            .collect()
    }
}
