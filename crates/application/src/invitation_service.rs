use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, InvitationId, StudioId, UserId};
use fieldgate_domain::{
    AuditAction, AuthorizationContext, EmailAddress, HookFamily, Invitation, RegisteredResource,
    Studio, StudioDraft, Subject, Task, UniqueValueConstraint, hooks,
};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, InvitationNotice, InvitationNotifier,
    InvitationRepository, ResourceForm, StudioRepository, UserRepository,
};

mod definition;
mod invite;
mod settings;


/// A studio with its tasks, participating accounts and the invitations
/// sent while defining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioDefinition {
    /// Stored studio.
    pub studio: Studio,
    /// Tasks in session order.
    pub tasks: Vec<Task>,
    /// Participating accounts.
    pub participants: Vec<UserId>,
    /// Invitations created for new participants.
    pub invitations: Vec<Invitation>,
}

/// Application service for studios and their invitations.
#[derive(Clone)]
pub struct InvitationService {
    authorization_service: AuthorizationService,
    studio_repository: Arc<dyn StudioRepository>,
    invitation_repository: Arc<dyn InvitationRepository>,
    user_repository: Arc<dyn UserRepository>,
    notifier: Arc<dyn InvitationNotifier>,
    audit_repository: Arc<dyn AuditRepository>,
    acceptance_base_url: String,
}

/// Outbound adapters used by [`InvitationService`].
#[derive(Clone)]
pub struct InvitationServicePorts {
    /// Studio lookup.
    pub studio_repository: Arc<dyn StudioRepository>,
    /// Invitation persistence.
    pub invitation_repository: Arc<dyn InvitationRepository>,
    /// Account lookup for already registered invitees.
    pub user_repository: Arc<dyn UserRepository>,
    /// Invitation delivery.
    pub notifier: Arc<dyn InvitationNotifier>,
    /// Audit sink.
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl InvitationService {
    /// Creates a new invitation service. Acceptance links are built under
    /// `acceptance_base_url`.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        ports: InvitationServicePorts,
        acceptance_base_url: impl Into<String>,
    ) -> Self {
        Self {
            authorization_service,
            studio_repository: ports.studio_repository,
            invitation_repository: ports.invitation_repository,
            user_repository: ports.user_repository,
            notifier: ports.notifier,
            audit_repository: ports.audit_repository,
            acceptance_base_url: acceptance_base_url.into(),
        }
    }

    fn hook_family() -> HookFamily {
        HookFamily::prefixed(hooks::INVITATION_SETTING)
    }

    async fn load_studio(&self, studio_id: StudioId) -> AppResult<Studio> {
        self.studio_repository
            .find_studio(studio_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("studio '{studio_id}' does not exist")))
    }

    async fn load_invitation(&self, invitation_id: InvitationId) -> AppResult<Invitation> {
        self.invitation_repository
            .find_invitation(invitation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("invitation '{invitation_id}' does not exist"))
            })
    }

    /// Binds `studio` and its owner as `user`, with the owner's memberships
    /// available to `in_group`.
    async fn studio_context(&self, studio: &Studio) -> AppResult<AuthorizationContext> {
        let memberships = self
            .authorization_service
            .membership_index(&[studio.owner()])
            .await?;

        Ok(AuthorizationContext::new()
            .with_fact(
                "studio",
                json!({
                    "id": studio.id().as_i64(),
                    "owner": studio.owner().as_i64(),
                    "objective": studio.objective(),
                    "url": studio.url(),
                    "flag_recording": studio.flag_recording(),
                    "flag_questionnaire": studio.flag_questionnaire(),
                }),
            )
            .with_fact("user", json!({ "id": studio.owner().as_i64() }))
            .with_memberships(memberships))
    }

    fn acceptance_link(&self, token: &str) -> String {
        format!(
            "{}/invitations/accept?token={token}",
            self.acceptance_base_url.trim_end_matches('/')
        )
    }

    async fn append_audit(
        &self,
        actor: UserId,
        action: AuditAction,
        invitation: &Invitation,
        detail: String,
    ) -> AppResult<()> {
        info!(
            %actor,
            action = action.as_str(),
            invitation_id = %invitation.id(),
            studio_id = %invitation.studio_id(),
            "{detail}"
        );
        self.audit_repository
            .append_event(AuditEvent {
                actor,
                action,
                resource_type: Invitation::RESOURCE_TYPE.to_owned(),
                resource_id: invitation.resource_id(),
                detail: Some(detail),
            })
            .await
    }
}

fn email_constraint(taken: impl IntoIterator<Item = String>) -> UniqueValueConstraint {
    UniqueValueConstraint::new(
        "email",
        taken.into_iter().map(Value::String).collect(),
        "email address",
    )
}

fn normalize_email_value(submitted: &mut Map<String, Value>) -> AppResult<()> {
    let Some(Value::String(email)) = submitted.get("email").cloned() else {
        return Ok(());
    };

    let normalized = EmailAddress::new(email)?;
    submitted.insert("email".to_owned(), Value::String(normalized.into()));
    Ok(())
}
