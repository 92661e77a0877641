use crate::model::{
    form::FormResponse,
    registration::{PaymentStatus, Registration, RegistrationStatus, Selection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: i32,
    pub event_id: i32,
    pub participant_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub form_responses: Vec<FormResponse>,
    pub selections: Vec<Selection>,
    pub payment_proof: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub ticket_id: Option<String>,
    pub ticket_credential: Option<String>,
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(value: Registration) -> Self {
        RegistrationResponse {
            id: value.registration_id,
            event_id: value.event_id,
            participant_id: value.participant_id,
            participant_name: value.participant_name,
            participant_email: value.participant_email,
            status: value.status,
            payment_status: value.payment_status,
            form_responses: value.form_responses,
            selections: value.selections,
            payment_proof: value.payment_proof,
            reviewed_by: value.reviewed_by,
            reviewed_at: value.reviewed_at,
            review_comment: value.review_comment,
            ticket_id: value.ticket_id,
            ticket_credential: value.ticket_credential,
            attended: value.attended,
            attended_at: value.attended_at,
            total_amount: value.total_amount,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
