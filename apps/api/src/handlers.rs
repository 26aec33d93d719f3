pub mod groups;
pub mod health;
pub mod invitations;
pub mod studios;
