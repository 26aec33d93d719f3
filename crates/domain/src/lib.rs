//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod changeset;
mod condition;
mod constraint;
mod context;
mod email;
mod grant;
mod group;
mod invitation;
mod resource;
mod security;
mod studio;
mod subject;
mod value;
mod visibility;

pub use changeset::{Changeset, DenialReason, FieldChange};
pub use condition::{
    Condition, ConditionParseError, EvaluationError, FactPath, FactSource, Operand,
};
pub use constraint::{ChangeConstraint, UniqueValueConstraint};
pub use context::{
    AuthorizationContext, EvaluationScope, PROPERTY_FACT, RESOURCE_FACT, SELF_FACT,
};
pub use email::EmailAddress;
pub use grant::{GrantScope, HookFamily, HookGrant};
pub use group::{GROUP_DEFAULT, GROUP_DEFAULT_PRIMARY, GROUP_NOT_DEFAULT, Group};
pub use invitation::Invitation;
pub use resource::{FieldSpec, RegisteredResource, ResourceSnapshot, SnapshotField};
pub use security::{AuditAction, hooks};
pub use studio::{Studio, StudioDraft, Task, TaskDraft};
pub use subject::{GroupMembership, MembershipIndex, Subject};
pub use value::{FieldKind, loosely_equal, value_as_i64};
pub use visibility::{FieldClassification, FieldVisibility};
