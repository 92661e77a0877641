mod command;
mod query;

pub use self::command::RegistrationCommandRepository;
pub use self::query::RegistrationQueryRepository;

pub(crate) const REGISTRATION_COLUMNS: &str = "registration_id, event_id, participant_id, \
    participant_name, participant_email, status, payment_status, form_responses, selections, \
    payment_proof, reviewed_by, reviewed_at, review_comment, ticket_id, ticket_credential, \
    attended, attended_at, attendance_marked_by, total_amount, created_at, updated_at";
