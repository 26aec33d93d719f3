use std::fmt::{Display, Formatter};

use fieldgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MAX_EMAIL_LENGTH: usize = 254;

/// Lower-cased, structurally valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalizes and validates an address: one `@`, a non-empty local part and
    /// a dotted domain.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(format!(
                "'{normalized}' is not an email address"
            )));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(format!(
                "'{normalized}' is not an email address"
            )));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(format!(
                "email domain of '{normalized}' must contain a '.'"
            )));
        }

        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(AppError::Validation(format!(
                "email address must not exceed {MAX_EMAIL_LENGTH} characters"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::EmailAddress;

    #[test]
    fn address_is_trimmed_and_lower_cased() {
        let email = EmailAddress::new("  Guest@Example.COM ");
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "guest@example.com"
        );
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for value in ["", "guest", "@example.com", "guest@localhost", "a@b@c.com"] {
            assert!(EmailAddress::new(value).is_err(), "accepted '{value}'");
        }
    }
}
