//! Console invitation notifier for development. Logs invitations to tracing output.

use async_trait::async_trait;
use fieldgate_application::{InvitationNotice, InvitationNotifier};
use fieldgate_core::AppResult;
use tracing::info;

/// Development notifier that logs invitation messages to the console.
#[derive(Clone, Default)]
pub struct ConsoleInvitationNotifier;

impl ConsoleInvitationNotifier {
    /// Creates a new console notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InvitationNotifier for ConsoleInvitationNotifier {
    async fn send_invitation(&self, notice: &InvitationNotice) -> AppResult<()> {
        info!(
            to = notice.email.as_str(),
            studio_id = %notice.studio_id,
            "--- INVITATION (console) ---\nTo: {}\nStudio: {}\n\nAccept: {}\n--- END INVITATION ---",
            notice.email,
            notice.studio_objective,
            notice.acceptance_link
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_application::{InvitationNotice, InvitationNotifier};
    use fieldgate_core::StudioId;

    use super::ConsoleInvitationNotifier;

    #[tokio::test]
    async fn console_notifier_accepts_every_notice() {
        let notifier = ConsoleInvitationNotifier::new();
        let notice = InvitationNotice {
            email: "guest@example.com".to_owned(),
            studio_id: StudioId::new(164),
            studio_objective: "Checkout usability".to_owned(),
            acceptance_link: "http://localhost:3000/invitations/accept?token=abc".to_owned(),
        };

        assert!(notifier.send_invitation(&notice).await.is_ok());
    }
}
