use std::sync::Arc;

use fieldgate_application::{
    AuditRepository, AuthorizationService, GrantRepository, GroupRepository, GroupService,
    InvitationNotifier, InvitationRepository, InvitationService, InvitationServicePorts,
    StudioRepository, UserRepository,
};
use fieldgate_core::AppError;
use fieldgate_infrastructure::{
    ConsoleInvitationNotifier, InMemoryRepository, PostgresAuditRepository,
    PostgresGrantRepository, PostgresGroupRepository, PostgresStudioRepository,
    PostgresUserRepository,
};
use sqlx::PgPool;

use crate::state::AppState;

struct Repositories {
    grants: Arc<dyn GrantRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    studios: Arc<dyn StudioRepository>,
    invitations: Arc<dyn InvitationRepository>,
    audit: Arc<dyn AuditRepository>,
}

/// Builds state over the seeded in-memory store.
pub fn build_in_memory_state(invitation_base_url: &str) -> Result<AppState, AppError> {
    let repository = Arc::new(InMemoryRepository::seeded()?);

    Ok(assemble(
        Repositories {
            grants: repository.clone(),
            users: repository.clone(),
            groups: repository.clone(),
            studios: repository.clone(),
            invitations: repository.clone(),
            audit: repository,
        },
        invitation_base_url,
        "memory",
    ))
}

/// Builds state over PostgreSQL adapters sharing one pool.
pub fn build_postgres_state(pool: PgPool, invitation_base_url: &str) -> AppState {
    let studio_repository = Arc::new(PostgresStudioRepository::new(pool.clone()));

    assemble(
        Repositories {
            grants: Arc::new(PostgresGrantRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            studios: studio_repository.clone(),
            invitations: studio_repository,
            audit: Arc::new(PostgresAuditRepository::new(pool)),
        },
        invitation_base_url,
        "postgres",
    )
}

fn assemble(
    repositories: Repositories,
    invitation_base_url: &str,
    storage_backend: &'static str,
) -> AppState {
    let authorization_service =
        AuthorizationService::new(repositories.grants.clone(), repositories.users.clone());
    let notifier: Arc<dyn InvitationNotifier> = Arc::new(ConsoleInvitationNotifier::new());

    let group_service = GroupService::new(
        authorization_service.clone(),
        repositories.groups,
        repositories.grants,
        repositories.audit.clone(),
    );
    let invitation_service = InvitationService::new(
        authorization_service.clone(),
        InvitationServicePorts {
            studio_repository: repositories.studios,
            invitation_repository: repositories.invitations,
            user_repository: repositories.users,
            notifier,
            audit_repository: repositories.audit,
        },
        invitation_base_url,
    );

    AppState {
        authorization_service,
        group_service,
        invitation_service,
        storage_backend,
    }
}
