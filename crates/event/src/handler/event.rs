use crate::{
    abstract_trait::event::service::{DynEventCommandService, DynEventQueryService},
    domain::{
        identity::Actor,
        patch::EventPatch,
        requests::event::{CreateEventRequest, FindAllEvents},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            event::EventResponse,
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
    get,
    path = "/api/events",
    tag = "Event",
    security(("bearer_auth" = [])),
    params(FindAllEvents),
    responses(
        (status = 200, description = "Events visible to the caller", body = ApiResponsePagination<Vec<EventResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_events(
    Extension(service): Extension<DynEventQueryService>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<FindAllEvents>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&actor, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Event",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    Extension(service): Extension<DynEventQueryService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&actor, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Event",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event drafted", body = ApiResponse<EventResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Organizers only")
    )
)]
pub async fn create_event(
    Extension(service): Extension<DynEventCommandService>,
    Extension(actor): Extension<Actor>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_event(&actor, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/events/{id}",
    tag = "Event",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventResponse>),
        (status = 400, description = "Field not editable in the current status, or invalid transition"),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event changed concurrently")
    )
)]
pub async fn update_event(
    Extension(service): Extension<DynEventCommandService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    Json(patch): Json<EventPatch>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_event(&actor, id, &patch).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn event_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/events", get(get_events).post(create_event))
        .route("/api/events/{id}", get(get_event).patch(update_event))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.event_query.clone()))
        .layer(Extension(app_state.di_container.event_command.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
