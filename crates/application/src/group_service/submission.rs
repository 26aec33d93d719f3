use fieldgate_core::{AppError, AppResult};
use serde_json::{Map, Value};

const IGNORED_KEYS: [&str; 1] = ["csrf_token"];

/// Trims text values, lower-cases the landing page and drops transport-only keys.
pub(super) fn normalize_submission(mut submitted: Map<String, Value>) -> AppResult<Map<String, Value>> {
    for key in IGNORED_KEYS {
        submitted.remove(key);
    }

    for (key, value) in &mut submitted {
        if let Value::String(text) = value {
            let trimmed = text.trim();
            *text = if key == "landing_page" {
                trimmed.to_lowercase()
            } else {
                trimmed.to_owned()
            };
        }
    }

    if let Some(name) = submitted.get("name") {
        let empty = match name {
            Value::Null => true,
            Value::String(text) => text.is_empty(),
            _ => false,
        };
        if empty {
            return Err(AppError::Validation(
                "group name must not be empty".to_owned(),
            ));
        }
    }

    Ok(submitted)
}
