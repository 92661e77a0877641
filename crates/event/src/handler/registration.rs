use crate::{
    abstract_trait::registration::service::{DynAdmissionService, DynRegistrationService},
    domain::{
        identity::Actor,
        requests::registration::{FindAllRegistrations, RegisterRequest},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            registration::RegistrationResponse,
        },
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/events/{id}/registrations",
    tag = "Registration",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered, or pending payment review", body = ApiResponse<RegistrationResponse>),
        (status = 400, description = "Invalid form responses or selections"),
        (status = 403, description = "Not eligible"),
        (status = 409, description = "Already registered"),
        (status = 422, description = "Closed, past deadline, full, or out of stock")
    )
)]
pub async fn register_for_event(
    Extension(service): Extension<DynAdmissionService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.register(&actor, id, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/registrations",
    tag = "Registration",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID"), FindAllRegistrations),
    responses(
        (status = 200, description = "Registrations of the event", body = ApiResponsePagination<Vec<RegistrationResponse>>),
        (status = 403, description = "Not the event's organizer")
    )
)]
pub async fn get_event_registrations(
    Extension(service): Extension<DynRegistrationService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Query(params): Query<FindAllRegistrations>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.event_registrations(&actor, id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/registrations/me",
    tag = "Registration",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's registrations", body = ApiResponse<Vec<RegistrationResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_registrations(
    Extension(service): Extension<DynRegistrationService>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.my_registrations(&actor).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    tag = "Registration",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration details", body = ApiResponse<RegistrationResponse>),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn get_registration(
    Extension(service): Extension<DynRegistrationService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&actor, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/registrations/{id}/cancel",
    tag = "Registration",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration cancelled", body = ApiResponse<RegistrationResponse>),
        (status = 409, description = "Already attended or no longer active")
    )
)]
pub async fn cancel_registration(
    Extension(service): Extension<DynRegistrationService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.cancel(&actor, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn registration_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/events/{id}/registrations",
            post(register_for_event).get(get_event_registrations),
        )
        .route("/api/registrations/me", get(get_my_registrations))
        .route("/api/registrations/{id}", get(get_registration))
        .route("/api/registrations/{id}/cancel", post(cancel_registration))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.admission.clone()))
        .layer(Extension(app_state.di_container.registration.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
