use crate::{
    abstract_trait::organizer::DynOrganizerService,
    domain::{
        identity::Actor,
        requests::organizer::WebhookRequest,
        response::{api::ApiResponse, organizer::OrganizerSettingsResponse},
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::put,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    put,
    path = "/api/organizers/me/webhook",
    tag = "Organizer",
    security(("bearer_auth" = [])),
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Webhook stored", body = ApiResponse<OrganizerSettingsResponse>),
        (status = 400, description = "Invalid URL"),
        (status = 403, description = "Organizers only")
    )
)]
pub async fn set_webhook(
    Extension(service): Extension<DynOrganizerService>,
    Extension(actor): Extension<Actor>,
    SimpleValidatedJson(body): SimpleValidatedJson<WebhookRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.set_webhook(&actor, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn organizer_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/organizers/me/webhook", put(set_webhook))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.organizer.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
