use crate::{
    abstract_trait::registration::service::{DynAnalyticsService, DynAttendanceService},
    domain::{
        identity::Actor,
        requests::attendance::CheckInRequest,
        response::{
            analytics::EventAnalyticsResponse,
            api::ApiResponse,
            attendance::{AttendanceResponse, AttendanceSummaryResponse},
        },
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/events/{id}/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Attendance marked", body = ApiResponse<AttendanceResponse>),
        (status = 404, description = "Invalid ticket"),
        (status = 409, description = "Already marked; data.attended_at holds the original time"),
        (status = 422, description = "Registration is not confirmed")
    )
)]
pub async fn check_in(
    Extension(service): Extension<DynAttendanceService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CheckInRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.check_in(&actor, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Attendance summary", body = ApiResponse<AttendanceSummaryResponse>),
        (status = 403, description = "Not the event's organizer")
    )
)]
pub async fn attendance_summary(
    Extension(service): Extension<DynAttendanceService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.summary(&actor, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/analytics",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registration analytics", body = ApiResponse<EventAnalyticsResponse>),
        (status = 403, description = "Not the event's organizer")
    )
)]
pub async fn event_analytics(
    Extension(service): Extension<DynAnalyticsService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.event_analytics(&actor, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn attendance_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/events/{id}/attendance",
            get(attendance_summary).post(check_in),
        )
        .route("/api/events/{id}/analytics", get(event_analytics))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.attendance.clone()))
        .layer(Extension(app_state.di_container.analytics.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
