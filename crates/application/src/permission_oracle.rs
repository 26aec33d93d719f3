use fieldgate_domain::{AuthorizationContext, Subject};
use tracing::{debug, warn};

/// Answers whether a subject may perform an action hook in a context.
///
/// Grants for the hook are OR-combined. A grant whose condition failed to
/// parse denies and is logged; a condition that references a missing fact
/// evaluates false for that grant only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionOracle;

impl PermissionOracle {
    /// Creates an oracle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns true when at least one grant for `hook` evaluates true.
    #[must_use]
    pub fn authorize(&self, subject: &Subject, hook: &str, context: &AuthorizationContext) -> bool {
        let scope = context.scope_for(subject);

        for grant in subject.grants_for_hook(hook) {
            let condition = match grant.condition() {
                Ok(condition) => condition,
                Err(error) => {
                    warn!(
                        hook,
                        scope = %grant.scope(),
                        grant_id = grant.grant_id(),
                        condition = grant.condition_source(),
                        %error,
                        "ignoring grant with unparseable condition"
                    );
                    continue;
                }
            };

            match condition.evaluate(&scope) {
                Ok(true) => {
                    debug!(
                        hook,
                        user_id = %subject.user_id(),
                        grant_id = grant.grant_id(),
                        "hook granted"
                    );
                    return true;
                }
                Ok(false) => {}
                Err(error) => {
                    debug!(
                        hook,
                        grant_id = grant.grant_id(),
                        %error,
                        "grant condition evaluated false"
                    );
                }
            }
        }

        false
    }
}
