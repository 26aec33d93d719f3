use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use fieldgate_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::USER_HEADER;
use crate::state::AppState;
use crate::{handlers, middleware};

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/groups",
            get(handlers::groups::list_groups_handler).post(handlers::groups::create_group_handler),
        )
        .route(
            "/api/groups/form",
            get(handlers::groups::create_group_form_handler),
        )
        .route(
            "/api/groups/{group_id}",
            get(handlers::groups::get_group_handler)
                .patch(handlers::groups::update_group_handler)
                .delete(handlers::groups::delete_group_handler),
        )
        .route(
            "/api/groups/{group_id}/form",
            get(handlers::groups::edit_group_form_handler),
        )
        .route(
            "/api/groups/{group_id}/grants",
            get(handlers::groups::list_group_grants_handler),
        )
        .route(
            "/api/groups/{group_id}/titles",
            post(handlers::groups::update_group_titles_handler),
        )
        .route(
            "/api/studios",
            post(handlers::studios::define_studio_handler),
        )
        .route(
            "/api/studios/{studio_id}",
            get(handlers::studios::get_studio_handler),
        )
        .route(
            "/api/studios/{studio_id}/invitations",
            post(handlers::invitations::invite_to_studio_handler),
        )
        .route(
            "/api/invitations/{invitation_id}",
            get(handlers::invitations::view_invitation_handler)
                .patch(handlers::invitations::update_invitation_handler),
        )
        .route(
            "/api/invitations/{invitation_id}/form",
            get(handlers::invitations::invitation_form_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_subject,
        ));

    let frontend_origin = HeaderValue::from_str(frontend_url)
        .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?;
    let cors_layer = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_HEADER)]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
