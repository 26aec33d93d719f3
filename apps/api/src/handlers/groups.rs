use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use fieldgate_application::GroupFormMode;
use fieldgate_core::GroupId;
use fieldgate_domain::Subject;
use serde_json::{Map, Value};

use crate::dto::{
    GrantResponse, GroupResponse, GroupTitlesRequest, GroupTitlesResponse, ResourceFormResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_groups_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let groups = state
        .group_service
        .list_groups(&subject)
        .await?
        .into_iter()
        .map(GroupResponse::from)
        .collect();

    Ok(Json(groups))
}

pub async fn create_group_form_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> ApiResult<Json<ResourceFormResponse>> {
    let form = state
        .group_service
        .group_form(&subject, GroupFormMode::Create)
        .await?;

    Ok(Json(ResourceFormResponse::from(form)))
}

pub async fn create_group_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<GroupResponse>)> {
    let group = state.group_service.create_group(&subject, payload).await?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}

pub async fn get_group_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state
        .group_service
        .get_group(&subject, GroupId::new(group_id))
        .await?;

    Ok(Json(GroupResponse::from(group)))
}

pub async fn edit_group_form_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
) -> ApiResult<Json<ResourceFormResponse>> {
    let form = state
        .group_service
        .group_form(&subject, GroupFormMode::Edit(GroupId::new(group_id)))
        .await?;

    Ok(Json(ResourceFormResponse::from(form)))
}

pub async fn update_group_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state
        .group_service
        .update_group(&subject, GroupId::new(group_id), payload)
        .await?;

    Ok(Json(GroupResponse::from(group)))
}

pub async fn delete_group_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .group_service
        .delete_group(&subject, GroupId::new(group_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_group_grants_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
) -> ApiResult<Json<Vec<GrantResponse>>> {
    let grants = state
        .group_service
        .list_group_grants(&subject, GroupId::new(group_id))
        .await?
        .into_iter()
        .map(GrantResponse::from)
        .collect();

    Ok(Json(grants))
}

/// Sets one title on every account whose primary group is the path group.
pub async fn update_group_titles_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(group_id): Path<i64>,
    Json(payload): Json<GroupTitlesRequest>,
) -> ApiResult<Json<GroupTitlesResponse>> {
    let updated = state
        .group_service
        .update_group_titles(&subject, GroupId::new(group_id), payload.title.as_str())
        .await?;

    Ok(Json(GroupTitlesResponse { group_id, updated }))
}
