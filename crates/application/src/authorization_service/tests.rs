use std::sync::Arc;

use fieldgate_core::{AppError, GroupId, UserId};
use fieldgate_domain::AuthorizationContext;
use serde_json::json;

use crate::test_support::{FakeGrantRepository, FakeUserRepository, group_grant, user_grant};

use super::AuthorizationService;

fn service() -> AuthorizationService {
    let grants = FakeGrantRepository::new(vec![
        group_grant(2, "uri_groups", "always()"),
        group_grant(2, "delete_group", "equals(group.can_delete, true)"),
        group_grant(1, "uri_dashboard", "always()"),
        user_grant(13, "uri_groups", "equals(self.id, 13)"),
    ]);
    let users = FakeUserRepository::seeded();

    AuthorizationService::new(Arc::new(grants), Arc::new(users))
}

#[tokio::test]
async fn load_subject_collects_group_and_user_grants() {
    let subject = service().load_subject(UserId::new(13)).await;

    let subject = match subject {
        Ok(subject) => subject,
        Err(error) => panic!("unexpected error: {error}"),
    };
    assert!(subject.is_member_of(GroupId::new(1)));
    assert_eq!(subject.grants_for_hook("uri_dashboard").count(), 1);
    assert_eq!(subject.grants_for_hook("uri_groups").count(), 1);
    assert_eq!(subject.user_grants().len(), 1);
}

#[tokio::test]
async fn load_subject_rejects_unknown_user() {
    let result = service().load_subject(UserId::new(404)).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn require_hook_maps_denial_to_forbidden() {
    let service = service();
    let subject = match service.load_subject(UserId::new(12)).await {
        Ok(subject) => subject,
        Err(error) => panic!("unexpected error: {error}"),
    };

    let result = service.require_hook(&subject, "uri_groups", &AuthorizationContext::new());
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn require_hook_evaluates_context_facts() {
    let service = service();
    let subject = match service.load_subject(UserId::new(1)).await {
        Ok(subject) => subject,
        Err(error) => panic!("unexpected error: {error}"),
    };

    let deletable = AuthorizationContext::new().with_fact("group", json!({ "can_delete": true }));
    let locked = AuthorizationContext::new().with_fact("group", json!({ "can_delete": false }));

    assert!(service.require_hook(&subject, "delete_group", &deletable).is_ok());
    assert!(service.require_hook(&subject, "delete_group", &locked).is_err());
}
