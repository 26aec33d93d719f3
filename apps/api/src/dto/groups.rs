use fieldgate_domain::{Group, HookGrant};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-response.ts"
)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub is_default: i64,
    pub can_delete: bool,
    pub theme: String,
    pub landing_page: String,
    pub new_user_title: String,
    pub icon: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id().as_i64(),
            name: group.name().to_owned(),
            is_default: group.is_default(),
            can_delete: group.can_delete(),
            theme: group.theme().to_owned(),
            landing_page: group.landing_page().to_owned(),
            new_user_title: group.new_user_title().to_owned(),
            icon: group.icon().to_owned(),
        }
    }
}

/// API representation of a stored hook grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-response.ts"
)]
pub struct GrantResponse {
    pub grant_id: i64,
    pub scope: String,
    pub hook: String,
    pub conditions: String,
    /// False when the stored condition does not parse; such a grant never allows.
    pub valid: bool,
}

impl From<HookGrant> for GrantResponse {
    fn from(grant: HookGrant) -> Self {
        Self {
            grant_id: grant.grant_id(),
            scope: grant.scope().to_string(),
            hook: grant.hook().to_owned(),
            conditions: grant.condition_source().to_owned(),
            valid: grant.condition().is_ok(),
        }
    }
}

/// Incoming payload for retitling the primary members of a group.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-titles-request.ts"
)]
pub struct GroupTitlesRequest {
    pub title: String,
}

/// Number of accounts that received the new title.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-titles-response.ts"
)]
pub struct GroupTitlesResponse {
    pub group_id: i64,
    pub updated: u64,
}
