//! Default records installed on a fresh system, mirrored by the SQL migration.

use fieldgate_core::{AppResult, GroupId, StudioId, UserId, UserIdentity};
use fieldgate_domain::{
    GROUP_DEFAULT_PRIMARY, GrantScope, Group, HookGrant, RegisteredResource, Studio,
};
use serde_json::json;

type SeededGroup = (i64, &'static str, i64, bool, &'static str, &'static str, &'static str, &'static str);

const GROUPS: [SeededGroup; 3] = [
    (1, "User", GROUP_DEFAULT_PRIMARY, false, "default", "utente", "New User", "fa fa-user"),
    (2, "Administrator", 0, false, "nyx", "dashboard", "Brood Spawn", "fa fa-flag"),
    (4, "Valutatore", 0, true, "default", "valutatore", "Nuovo Valutatore", "fa fa-flag"),
];

const GROUP_GRANTS: [(i64, &str, &str); 29] = [
    (1, "uri_dashboard", "always()"),
    (2, "uri_dashboard", "always()"),
    (2, "uri_users", "always()"),
    (1, "uri_account_settings", "always()"),
    (
        1,
        "update_account_setting",
        r#"equals(self.id, user.id)&&in(property,["email","locale","password"])"#,
    ),
    (
        2,
        "update_account_setting",
        r#"!in_group(user.id,2)&&in(property,["email","display_name","title","locale","flag_password_reset","flag_enabled"])"#,
    ),
    (
        2,
        "view_account_setting",
        r#"in(property,["user_name","email","display_name","title","locale","flag_enabled","groups","primary_group_id"])"#,
    ),
    (2, "delete_account", "!in_group(user.id,2)"),
    (2, "create_account", "always()"),
    (4, "create_account", "always()"),
    (4, "uri_analist", "always()"),
    (4, "uri_group_titles", "always()"),
    (1, "uri_utente", "always()"),
    (4, "delete_account", "!in_group(user.id,2)"),
    (2, "update_account_setting", "always()"),
    (4, "view_account_setting", "always()"),
    (4, "uri_account_settings", "always()"),
    (4, "uri_dashboard", "always()"),
    (4, "uri_account_setting", "always()"),
    (4, "update_account_setting", "always()"),
    (4, "uri_users", "always()"),
    (2, "uri_groups", "always()"),
    (2, "create_group", "always()"),
    (2, "update_group_setting", "always()"),
    (2, "view_group_setting", "always()"),
    (2, "delete_group", "always()"),
    (2, "uri_authorization_settings", "always()"),
    (
        4,
        "update_invitation_setting",
        r#"equals(self.id, studio.owner)&&in(property,["locale","title","flag_evaluated"])"#,
    ),
    (4, "view_invitation_setting", "equals(self.id, studio.owner)"),
];

pub(crate) fn groups() -> AppResult<Vec<Group>> {
    GROUPS
        .into_iter()
        .map(
            |(id, name, is_default, can_delete, theme, landing_page, new_user_title, icon)| {
                let mut group = Group::new(GroupId::new(id), name);
                group.set_field_value("is_default", json!(is_default))?;
                group.set_field_value("can_delete", json!(can_delete))?;
                group.set_field_value("theme", json!(theme))?;
                group.set_field_value("landing_page", json!(landing_page))?;
                group.set_field_value("new_user_title", json!(new_user_title))?;
                group.set_field_value("icon", json!(icon))?;
                Ok(group)
            },
        )
        .collect()
}

pub(crate) fn users() -> Vec<UserIdentity> {
    vec![
        UserIdentity::new(UserId::new(1), "admin", "Admin", "admin@admin.ad", GroupId::new(2)),
        UserIdentity::new(
            UserId::new(12),
            "valutatore",
            "Valutatore",
            "valutatore@email.com",
            GroupId::new(4),
        ),
        UserIdentity::new(
            UserId::new(13),
            "utente",
            "Utente",
            "utente@mail.com",
            GroupId::new(1),
        ),
    ]
}

pub(crate) fn user_titles() -> Vec<(UserId, &'static str)> {
    [(1, "Brood Spawn"), (12, "Nuovo Valutatore"), (13, "New User")]
        .into_iter()
        .map(|(user_id, title)| (UserId::new(user_id), title))
        .collect()
}

pub(crate) fn memberships() -> Vec<(UserId, GroupId)> {
    [(1, 2), (12, 4), (13, 1)]
        .into_iter()
        .map(|(user_id, group_id)| (UserId::new(user_id), GroupId::new(group_id)))
        .collect()
}

pub(crate) fn group_grants() -> AppResult<Vec<HookGrant>> {
    GROUP_GRANTS
        .iter()
        .zip(1_i64..)
        .map(|((group_id, hook, condition), grant_id)| {
            HookGrant::new(
                grant_id,
                GrantScope::Group(GroupId::new(*group_id)),
                *hook,
                *condition,
            )
        })
        .collect()
}

pub(crate) fn studios() -> Vec<Studio> {
    vec![Studio::new(
        StudioId::new(164),
        UserId::new(12),
        "Checkout usability",
        "Buy one item and pay by card",
        "",
        "https://shop.example.com",
        true,
        false,
    )]
}
