use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use fieldgate_core::{InvitationId, StudioId};
use fieldgate_domain::Subject;
use serde_json::{Map, Value};

use crate::dto::{InvitationResponse, InviteToStudioRequest, ResourceFormResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn invite_to_studio_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(studio_id): Path<i64>,
    Json(payload): Json<InviteToStudioRequest>,
) -> ApiResult<(StatusCode, Json<Vec<InvitationResponse>>)> {
    let invitations = state
        .invitation_service
        .invite_to_studio(&subject, StudioId::new(studio_id), payload.emails)
        .await?
        .into_iter()
        .map(InvitationResponse::from)
        .collect();

    Ok((StatusCode::CREATED, Json(invitations)))
}

/// Returns only the fields the subject may view.
pub async fn view_invitation_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(invitation_id): Path<i64>,
) -> ApiResult<Json<Map<String, Value>>> {
    let values = state
        .invitation_service
        .view_invitation(&subject, InvitationId::new(invitation_id))
        .await?;

    Ok(Json(values))
}

pub async fn invitation_form_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(invitation_id): Path<i64>,
) -> ApiResult<Json<ResourceFormResponse>> {
    let form = state
        .invitation_service
        .invitation_form(&subject, InvitationId::new(invitation_id))
        .await?;

    Ok(Json(ResourceFormResponse::from(form)))
}

pub async fn update_invitation_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(invitation_id): Path<i64>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<Json<InvitationResponse>> {
    let invitation = state
        .invitation_service
        .update_invitation(&subject, InvitationId::new(invitation_id), payload)
        .await?;

    Ok(Json(InvitationResponse::from(invitation)))
}
