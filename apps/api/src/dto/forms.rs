use fieldgate_application::ResourceForm;
use serde::Serialize;
use serde_json::{Map, Value};
use ts_rs::TS;

/// One field row of a rendered form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-field-response.ts"
)]
pub struct FormFieldResponse {
    pub name: String,
    #[ts(type = "\"editable\" | \"read_only\" | \"hidden\"")]
    pub classification: &'static str,
}

/// Form metadata for one subject and resource.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resource-form-response.ts"
)]
pub struct ResourceFormResponse {
    pub resource_type: String,
    pub resource_id: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub values: Map<String, Value>,
    pub fields: Vec<FormFieldResponse>,
    pub disabled_fields: Vec<String>,
    pub hidden_fields: Vec<String>,
}

impl From<ResourceForm> for ResourceFormResponse {
    fn from(form: ResourceForm) -> Self {
        Self {
            resource_type: form.resource_type.to_owned(),
            resource_id: form.resource_id,
            values: form.values,
            fields: form
                .visibility
                .entries()
                .iter()
                .map(|(name, classification)| FormFieldResponse {
                    name: name.clone(),
                    classification: classification.as_str(),
                })
                .collect(),
            disabled_fields: form.visibility.disabled_fields(),
            hidden_fields: form.visibility.hidden_fields(),
        }
    }
}
