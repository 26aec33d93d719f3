use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::api_services::build_in_memory_state;
use crate::middleware::USER_HEADER;

const ADMIN: &str = "1";
const ANALYST: &str = "12";
const MEMBER: &str = "13";

fn router() -> Router {
    let state = match build_in_memory_state("http://localhost:3000") {
        Ok(state) => state,
        Err(error) => panic!("seeded state should build: {error}"),
    };

    match build_router(state, "http://localhost:3000") {
        Ok(router) => router,
        Err(error) => panic!("router should build: {error}"),
    }
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }

    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    match builder.body(body) {
        Ok(request) => request,
        Err(error) => panic!("request should build: {error}"),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = match router.clone().oneshot(request).await {
        Ok(response) => response,
        Err(error) => panic!("router is infallible: {error}"),
    };
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn health_does_not_require_identity() {
    let router = router();

    let (status, body) = send(&router, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["storage"], json!("memory"));
}

#[tokio::test]
async fn missing_or_unknown_user_header_is_unauthorized() {
    let router = router();

    let (missing, _) = send(&router, request(Method::GET, "/api/groups", None, None)).await;
    let (unknown, _) = send(
        &router,
        request(Method::GET, "/api/groups", Some("999"), None),
    )
    .await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_lists_groups_and_member_is_forbidden() {
    let router = router();

    let (admin_status, body) = send(
        &router,
        request(Method::GET, "/api/groups", Some(ADMIN), None),
    )
    .await;
    let (member_status, _) = send(
        &router,
        request(Method::GET, "/api/groups", Some(MEMBER), None),
    )
    .await;

    assert_eq!(admin_status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
    assert_eq!(member_status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_form_lists_every_creation_field() {
    let router = router();

    let (status, body) = send(
        &router,
        request(Method::GET, "/api/groups/form", Some(ADMIN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource_type"], json!("group"));
    assert_eq!(body["fields"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["values"]["icon"], json!("fa fa-user"));
}

#[tokio::test]
async fn group_create_update_and_delete_round_trip() {
    let router = router();

    let (created, body) = send(
        &router,
        request(
            Method::POST,
            "/api/groups",
            Some(ADMIN),
            Some(json!({ "name": "Reviewers", "landing_page": "Dashboard" })),
        ),
    )
    .await;
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(body["landing_page"], json!("dashboard"));
    assert_eq!(body["can_delete"], json!(true));

    let id = body["id"].as_i64().unwrap_or_default();
    let uri = format!("/api/groups/{id}");

    let (updated, body) = send(
        &router,
        request(
            Method::PATCH,
            uri.as_str(),
            Some(ADMIN),
            Some(json!({ "theme": "nyx", "csrf_token": "ignored" })),
        ),
    )
    .await;
    assert_eq!(updated, StatusCode::OK);
    assert_eq!(body["theme"], json!("nyx"));

    let (deleted, _) = send(
        &router,
        request(Method::DELETE, uri.as_str(), Some(ADMIN), None),
    )
    .await;
    let (missing, _) = send(&router, request(Method::GET, uri.as_str(), Some(ADMIN), None)).await;

    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_group_name_is_conflict() {
    let router = router();

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/api/groups",
            Some(ADMIN),
            Some(json!({ "name": "Valutatore" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn unknown_field_is_bad_request() {
    let router = router();

    let (status, _) = send(
        &router,
        request(
            Method::PATCH,
            "/api/groups/4",
            Some(ADMIN),
            Some(json!({ "colour": "red" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn studio_owner_invites_and_reads_invitation() {
    let router = router();

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/api/studios/164/invitations",
            Some(ANALYST),
            Some(json!({ "emails": ["Guest@Example.com"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body[0]["email"], json!("guest@example.com"));
    assert!(body[0].get("token").is_none());

    let id = body[0]["id"].as_i64().unwrap_or_default();
    let (form_status, form) = send(
        &router,
        request(
            Method::GET,
            format!("/api/invitations/{id}/form").as_str(),
            Some(ANALYST),
            None,
        ),
    )
    .await;

    assert_eq!(form_status, StatusCode::OK);
    assert_eq!(form["resource_type"], json!("invitation"));
}

#[tokio::test]
async fn analyst_defines_studio_and_reads_it_back() {
    let router = router();

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/api/studios",
            Some(ANALYST),
            Some(json!({
                "objective": "Search usability",
                "url": "https://shop.example.com",
                "flag_recording": true,
                "tasks": [
                    { "title": "Find item", "max_duration_secs": 120, "url": "https://shop.example.com" },
                    { "title": "Pay", "description": "test card", "max_duration_secs": 60, "url": "https://shop.example.com/cart" }
                ],
                "participant_ids": [13],
                "invitee_emails": ["tester@example.com"]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], json!(12));
    assert_eq!(body["tasks"][1]["title"], json!("Pay"));
    assert_eq!(body["participant_ids"], json!([13]));
    assert_eq!(body["invitations"][0]["email"], json!("tester@example.com"));

    let id = body["id"].as_i64().unwrap_or_default();
    let (read_status, studio) = send(
        &router,
        request(
            Method::GET,
            format!("/api/studios/{id}").as_str(),
            Some(ANALYST),
            None,
        ),
    )
    .await;
    assert_eq!(read_status, StatusCode::OK);
    assert_eq!(studio["tasks"][0]["position"], json!(0));
    assert_eq!(studio["invitations"][0]["email"], json!("tester@example.com"));
}

#[tokio::test]
async fn studio_task_without_duration_is_bad_request() {
    let router = router();

    let (status, _) = send(
        &router,
        request(
            Method::POST,
            "/api/studios",
            Some(ANALYST),
            Some(json!({
                "objective": "Search usability",
                "url": "https://shop.example.com",
                "tasks": [{ "title": "Find item", "max_duration_secs": 0, "url": "https://shop.example.com" }]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn group_titles_follow_the_seeded_hook() {
    let router = router();
    let payload = json!({ "title": "Senior Valutatore" });

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/api/groups/4/titles",
            Some(ANALYST),
            Some(payload.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "group_id": 4, "updated": 1 }));

    let (denied, _) = send(
        &router,
        request(Method::POST, "/api/groups/4/titles", Some(MEMBER), Some(payload)),
    )
    .await;
    assert_eq!(denied, StatusCode::FORBIDDEN);
}
