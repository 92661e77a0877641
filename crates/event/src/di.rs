use crate::{
    abstract_trait::{
        event::{
            repository::{DynEventCommandRepository, DynEventQueryRepository},
            service::{DynEventCommandService, DynEventQueryService},
        },
        notify::{DynCredentialEncoder, DynTicketNotifier, DynWebhookClient},
        feedback::{DynFeedbackRepository, DynFeedbackService},
        organizer::{DynOrganizerRepository, DynOrganizerService},
        registration::{
            repository::{DynRegistrationCommandRepository, DynRegistrationQueryRepository},
            service::{
                DynAdmissionService, DynAnalyticsService, DynAttendanceService, DynPaymentService,
                DynRegistrationService,
            },
        },
    },
    repository::{
        event::{EventCommandRepository, EventQueryRepository},
        feedback::FeedbackRepository,
        memory::MemoryStore,
        organizer::OrganizerRepository,
        registration::{RegistrationCommandRepository, RegistrationQueryRepository},
    },
    service::{
        admission::{AdmissionService, AdmissionServiceDeps},
        analytics::AnalyticsService,
        attendance::{AttendanceService, AttendanceServiceDeps},
        event::{EventCommandService, EventCommandServiceDeps, EventQueryService},
        feedback::{FeedbackService, FeedbackServiceDeps},
        notify::Notifications,
        organizer::OrganizerService,
        payment::{PaymentService, PaymentServiceDeps},
        registration::{RegistrationService, RegistrationServiceDeps},
    },
};
use prometheus_client::registry::Registry;
use shared::{
    config::ConnectionPool,
    utils::{Metrics, OperationTracer},
};
use std::{fmt, sync::Arc, time::Duration};

/// Storage behind every repository trait.
#[derive(Clone)]
pub struct Repositories {
    pub event_query: DynEventQueryRepository,
    pub event_command: DynEventCommandRepository,
    pub registration_query: DynRegistrationQueryRepository,
    pub registration_command: DynRegistrationCommandRepository,
    pub organizers: DynOrganizerRepository,
    pub feedback: DynFeedbackRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            event_query: Arc::new(EventQueryRepository::new(pool.clone())),
            event_command: Arc::new(EventCommandRepository::new(pool.clone())),
            registration_query: Arc::new(RegistrationQueryRepository::new(pool.clone())),
            registration_command: Arc::new(RegistrationCommandRepository::new(pool.clone())),
            organizers: Arc::new(OrganizerRepository::new(pool.clone())),
            feedback: Arc::new(FeedbackRepository::new(pool)),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        Self {
            event_query: Arc::new(store.clone()),
            event_command: Arc::new(store.clone()),
            registration_query: Arc::new(store.clone()),
            registration_command: Arc::new(store.clone()),
            organizers: Arc::new(store.clone()),
            feedback: Arc::new(store),
        }
    }
}

/// External collaborators the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: DynTicketNotifier,
    pub webhook: DynWebhookClient,
    pub encoder: DynCredentialEncoder,
    pub notify_timeout: Duration,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub event_command: DynEventCommandService,
    pub event_query: DynEventQueryService,
    pub admission: DynAdmissionService,
    pub payment: DynPaymentService,
    pub attendance: DynAttendanceService,
    pub analytics: DynAnalyticsService,
    pub registration: DynRegistrationService,
    pub organizer: DynOrganizerService,
    pub feedback: DynFeedbackService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("event_command", &"EventCommandService")
            .field("event_query", &"EventQueryService")
            .field("admission", &"AdmissionService")
            .field("payment", &"PaymentService")
            .field("attendance", &"AttendanceService")
            .field("analytics", &"AnalyticsService")
            .field("registration", &"RegistrationService")
            .field("organizer", &"OrganizerService")
            .field("feedback", &"FeedbackService")
            .finish()
    }
}

fn tracer(name: &'static str, registry: &mut Registry) -> OperationTracer {
    let metrics = Metrics::new();
    metrics.register(&name.replace('-', "_"), registry);
    OperationTracer::new(name, metrics)
}

impl DependenciesInject {
    pub fn new(repos: Repositories, collaborators: Collaborators, registry: &mut Registry) -> Self {
        let Collaborators {
            notifier,
            webhook,
            encoder,
            notify_timeout,
        } = collaborators;
        let notifications = Notifications::new(notifier, webhook, notify_timeout);

        let event_command = Arc::new(EventCommandService::new(EventCommandServiceDeps {
            query: repos.event_query.clone(),
            command: repos.event_command.clone(),
            organizers: repos.organizers.clone(),
            notifications: notifications.clone(),
            tracer: tracer("event-command-service", registry),
        })) as DynEventCommandService;

        let event_query = Arc::new(EventQueryService::new(
            repos.event_query.clone(),
            tracer("event-query-service", registry),
        )) as DynEventQueryService;

        let admission = Arc::new(AdmissionService::new(AdmissionServiceDeps {
            events: repos.event_query.clone(),
            query: repos.registration_query.clone(),
            command: repos.registration_command.clone(),
            encoder: encoder.clone(),
            notifications: notifications.clone(),
            tracer: tracer("admission-service", registry),
        })) as DynAdmissionService;

        let payment = Arc::new(PaymentService::new(PaymentServiceDeps {
            events: repos.event_query.clone(),
            query: repos.registration_query.clone(),
            command: repos.registration_command.clone(),
            encoder: encoder.clone(),
            notifications,
            tracer: tracer("payment-service", registry),
        })) as DynPaymentService;

        let attendance = Arc::new(AttendanceService::new(AttendanceServiceDeps {
            events: repos.event_query.clone(),
            query: repos.registration_query.clone(),
            command: repos.registration_command.clone(),
            encoder,
            tracer: tracer("attendance-service", registry),
        })) as DynAttendanceService;

        let analytics = Arc::new(AnalyticsService::new(
            repos.event_query.clone(),
            repos.registration_query.clone(),
            tracer("analytics-service", registry),
        )) as DynAnalyticsService;

        let feedback = Arc::new(FeedbackService::new(FeedbackServiceDeps {
            events: repos.event_query.clone(),
            registrations: repos.registration_query.clone(),
            feedback: repos.feedback,
            tracer: tracer("feedback-service", registry),
        })) as DynFeedbackService;

        let registration = Arc::new(RegistrationService::new(RegistrationServiceDeps {
            events: repos.event_query.clone(),
            query: repos.registration_query.clone(),
            command: repos.registration_command.clone(),
            tracer: tracer("registration-service", registry),
        })) as DynRegistrationService;

        let organizer = Arc::new(OrganizerService::new(
            repos.organizers,
            tracer("organizer-service", registry),
        )) as DynOrganizerService;

        Self {
            event_command,
            event_query,
            admission,
            payment,
            attendance,
            analytics,
            registration,
            organizer,
            feedback,
        }
    }
}
