use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use fieldgate_core::StudioId;
use fieldgate_domain::Subject;

use crate::dto::{DefineStudioRequest, StudioResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Defines a studio owned by the subject and invites the listed addresses.
pub async fn define_studio_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<DefineStudioRequest>,
) -> ApiResult<(StatusCode, Json<StudioResponse>)> {
    let (draft, invitees) = payload.into_draft()?;
    let definition = state
        .invitation_service
        .define_studio(&subject, draft, invitees)
        .await?;

    Ok((StatusCode::CREATED, Json(StudioResponse::from(definition))))
}

pub async fn get_studio_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(studio_id): Path<i64>,
) -> ApiResult<Json<StudioResponse>> {
    let definition = state
        .invitation_service
        .studio_definition(&subject, StudioId::new(studio_id))
        .await?;

    Ok(Json(StudioResponse::from(definition)))
}
