use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        registration::{repository::DynRegistrationQueryRepository, service::AnalyticsServiceTrait},
    },
    domain::{
        identity::Actor,
        response::{analytics::EventAnalyticsResponse, api::ApiResponse},
    },
    model::{event::Event, registration::RegistrationStats},
    service::load_event,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};

#[derive(Clone)]
pub struct AnalyticsService {
    events: DynEventQueryRepository,
    query: DynRegistrationQueryRepository,
    tracer: OperationTracer,
}

impl AnalyticsService {
    pub fn new(
        events: DynEventQueryRepository,
        query: DynRegistrationQueryRepository,
        tracer: OperationTracer,
    ) -> Self {
        Self {
            events,
            query,
            tracer,
        }
    }
}

fn report(event: &Event, stats: RegistrationStats) -> EventAnalyticsResponse {
    EventAnalyticsResponse {
        event_id: event.event_id,
        status: event.status,
        total_registrations: stats.total,
        by_status: stats.by_status,
        confirmed_registrations: stats.confirmed,
        attended: stats.attended,
        pending_payments: stats.pending_payments,
        total_revenue: stats.confirmed_revenue,
        registration_limit: event.registration_limit,
        cached_registration_count: event.registration_count,
        cached_total_revenue: event.total_revenue,
    }
}

#[async_trait]
impl AnalyticsServiceTrait for AnalyticsService {
    async fn event_analytics(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<EventAnalyticsResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "EventAnalytics",
            vec![
                KeyValue::new("component", "analytics"),
                KeyValue::new("event.id", event_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let event = load_event(&self.events, event_id).await?;
            actor.require_manager(&event)?;

            let stats = self.query.aggregate_stats(event_id).await?;
            Ok(ApiResponse::success(
                "Event analytics retrieved",
                report(&event, stats),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Analytics computed")
    }
}
