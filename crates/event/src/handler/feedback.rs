use crate::{
    abstract_trait::feedback::DynFeedbackService,
    domain::{
        identity::Actor,
        requests::feedback::{FindEventFeedback, SubmitFeedbackRequest},
        response::{
            api::ApiResponse,
            feedback::{EventFeedbackResponse, FeedbackResponse},
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
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/events/{id}/feedback",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback submitted", body = ApiResponse<FeedbackResponse>),
        (status = 403, description = "No qualifying registration"),
        (status = 409, description = "Feedback already submitted")
    )
)]
pub async fn submit_feedback(
    Extension(service): Extension<DynFeedbackService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.submit(&actor, id, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/feedback",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID"), FindEventFeedback),
    responses(
        (status = 200, description = "Feedback with rating stats", body = ApiResponse<EventFeedbackResponse>),
        (status = 403, description = "Not the event's organizer")
    )
)]
pub async fn get_event_feedback(
    Extension(service): Extension<DynFeedbackService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Query(params): Query<FindEventFeedback>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.event_feedback(&actor, id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn feedback_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/events/{id}/feedback",
            get(get_event_feedback).post(submit_feedback),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.feedback.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
