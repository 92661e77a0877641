mod logs;
mod metrics;
mod otel;
mod random_string;
mod shutdown;
mod template;

pub use self::logs::init_logger;
pub use self::metrics::{Labels, Metrics, Status};
pub use self::otel::{OperationTracer, Telemetry, TracingContext};
pub use self::random_string::{generate_random_string, generate_ticket_id};
pub use self::shutdown::shutdown_signal;
pub use self::template::{TicketEmailData, TicketEmailTemplate, render_ticket_email};
