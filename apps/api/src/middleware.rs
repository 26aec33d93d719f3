use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use fieldgate_core::{AppError, UserId};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header set by the upstream authenticating proxy.
pub const USER_HEADER: &str = "x-fieldgate-user";

/// Loads the acting subject from the proxy header, or rejects with 401.
pub async fn require_subject(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = request
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(UserId::new)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let subject = state.authorization_service.load_subject(user_id).await?;

    request.extensions_mut().insert(subject);
    Ok(next.run(request).await)
}
