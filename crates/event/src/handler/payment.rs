use crate::{
    abstract_trait::registration::service::DynPaymentService,
    domain::{
        identity::Actor,
        requests::payment::{PaymentProofRequest, ReviewPaymentRequest},
        response::{api::ApiResponse, registration::RegistrationResponse},
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
    routing::{post, put},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    put,
    path = "/api/registrations/{id}/payment-proof",
    tag = "Payment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    request_body = PaymentProofRequest,
    responses(
        (status = 200, description = "Proof attached", body = ApiResponse<RegistrationResponse>),
        (status = 409, description = "Payment already reviewed")
    )
)]
pub async fn submit_payment_proof(
    Extension(service): Extension<DynPaymentService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<PaymentProofRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.submit_proof(&actor, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/registrations/{id}/approve",
    tag = "Payment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    request_body = ReviewPaymentRequest,
    responses(
        (status = 200, description = "Payment approved and ticket issued", body = ApiResponse<RegistrationResponse>),
        (status = 403, description = "Not the event's organizer"),
        (status = 409, description = "Payment already reviewed"),
        (status = 422, description = "Stock ran out since the request")
    )
)]
pub async fn approve_payment(
    Extension(service): Extension<DynPaymentService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ReviewPaymentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.approve(&actor, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/registrations/{id}/reject",
    tag = "Payment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Registration ID")),
    request_body = ReviewPaymentRequest,
    responses(
        (status = 200, description = "Payment rejected", body = ApiResponse<RegistrationResponse>),
        (status = 403, description = "Not the event's organizer"),
        (status = 409, description = "Payment already reviewed")
    )
)]
pub async fn reject_payment(
    Extension(service): Extension<DynPaymentService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ReviewPaymentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.reject(&actor, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/registrations/{id}/payment-proof",
            put(submit_payment_proof),
        )
        .route("/api/registrations/{id}/approve", post(approve_payment))
        .route("/api/registrations/{id}/reject", post(reject_payment))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.payment.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
