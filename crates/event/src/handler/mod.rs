mod attendance;
mod event;
mod feedback;
mod organizer;
mod payment;
mod registration;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus_client::encoding::text::encode;
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::attendance::attendance_routes;
pub use self::event::event_routes;
pub use self::feedback::feedback_routes;
pub use self::organizer::organizer_routes;
pub use self::payment::payment_routes;
pub use self::registration::registration_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        event::get_events,
        event::get_event,
        event::create_event,
        event::update_event,

        registration::register_for_event,
        registration::get_event_registrations,
        registration::get_my_registrations,
        registration::get_registration,
        registration::cancel_registration,

        payment::submit_payment_proof,
        payment::approve_payment,
        payment::reject_payment,

        attendance::check_in,
        attendance::attendance_summary,
        attendance::event_analytics,

        feedback::submit_feedback,
        feedback::get_event_feedback,

        organizer::set_webhook,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Event", description = "Event lifecycle endpoints"),
        (name = "Registration", description = "Registration endpoints"),
        (name = "Payment", description = "Payment review endpoints"),
        (name = "Attendance", description = "Check-in endpoints"),
        (name = "Analytics", description = "Event analytics endpoints"),
        (name = "Feedback", description = "Event feedback endpoints"),
        (name = "Organizer", description = "Organizer settings endpoints"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                )),
            );
        }
    }
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

pub struct AppRouter;

impl AppRouter {
    pub fn build(app_state: AppState) -> axum::Router {
        let shared_state = Arc::new(app_state);

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .merge(event_routes(shared_state.clone()))
            .merge(registration_routes(shared_state.clone()))
            .merge(payment_routes(shared_state.clone()))
            .merge(attendance_routes(shared_state.clone()))
            .merge(feedback_routes(shared_state.clone()))
            .merge(organizer_routes(shared_state));

        let router_with_layers = api_router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024))
            .layer(TraceLayer::new_for_http());

        let (app_router, api) = router_with_layers.split_for_parts();

        app_router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server terminated unexpectedly")?;

        Ok(())
    }
}
