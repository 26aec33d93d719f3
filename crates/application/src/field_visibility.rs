use fieldgate_domain::{
    AuthorizationContext, FieldClassification, FieldVisibility, HookFamily, Subject,
};
use tracing::debug;

use crate::PermissionOracle;

/// Classifies candidate fields as editable, read-only or hidden for one subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldVisibilityResolver {
    oracle: PermissionOracle,
}

impl FieldVisibilityResolver {
    /// Creates a resolver backed by the given oracle.
    #[must_use]
    pub fn new(oracle: PermissionOracle) -> Self {
        Self { oracle }
    }

    /// Classifies each candidate field in order.
    ///
    /// The update hook is checked first; the view hook is only consulted for
    /// fields that are not editable.
    #[must_use]
    pub fn classify<S: AsRef<str>>(
        &self,
        subject: &Subject,
        candidates: &[S],
        family: &HookFamily,
        context: &AuthorizationContext,
    ) -> FieldVisibility {
        let mut visibility = FieldVisibility::new();

        for field in candidates {
            let field = field.as_ref();
            let field_context = context.clone().with_property(field);

            let classification = if self
                .oracle
                .authorize(subject, family.update_hook(), &field_context)
            {
                FieldClassification::Editable
            } else if self
                .oracle
                .authorize(subject, family.view_hook(), &field_context)
            {
                FieldClassification::ReadOnly
            } else {
                FieldClassification::Hidden
            };

            debug!(field, classification = classification.as_str(), "classified field");
            visibility.insert(field, classification);
        }

        visibility
    }
}
