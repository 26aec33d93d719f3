//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_invitation_notifier;
mod in_memory_repository;
mod postgres_audit_repository;
mod postgres_grant_repository;
mod postgres_group_repository;
mod postgres_studio_repository;
mod postgres_user_repository;
mod seed;

pub use console_invitation_notifier::ConsoleInvitationNotifier;
pub use in_memory_repository::{InMemoryRepository, RecordedAuditEvent};
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_grant_repository::PostgresGrantRepository;
pub use postgres_group_repository::PostgresGroupRepository;
pub use postgres_studio_repository::PostgresStudioRepository;
pub use postgres_user_repository::PostgresUserRepository;
