mod audit;
mod grants;
mod groups;
mod notifier;
mod studios;
mod users;

pub use audit::{AuditEvent, AuditRepository};
pub use grants::GrantRepository;
pub use groups::GroupRepository;
pub use notifier::{InvitationNotice, InvitationNotifier};
pub use studios::{InvitationRepository, StudioRepository};
pub use users::UserRepository;
