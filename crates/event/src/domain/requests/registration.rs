use crate::{
    domain::requests::{default_page, default_page_size},
    model::{
        form::FormResponse,
        registration::{PaymentStatus, RegistrationStatus, Selection},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SelectionRequest {
    pub item_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[serde(default)]
    pub variants: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub form_responses: Vec<FormResponse>,

    #[validate(nested)]
    #[serde(default)]
    pub selections: Vec<SelectionRequest>,

    /// Reference to an uploaded payment proof artifact.
    #[validate(length(min = 1, max = 2048))]
    pub payment_proof: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllRegistrations {
    pub status: Option<RegistrationStatus>,
    /// Matches participant name or email.
    pub search: Option<String>,

    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllRegistrations {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationFilter {
    pub event_id: i32,
    pub status: Option<RegistrationStatus>,
    pub search: Option<String>,
    pub page: i32,
    pub page_size: i32,
}

impl RegistrationFilter {
    pub fn limit_offset(&self) -> (i64, i64) {
        let page_size = self.page_size.max(1) as i64;
        let offset = (self.page.max(1) as i64 - 1) * page_size;
        (page_size, offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketGrant {
    pub ticket_id: String,
    pub credential: String,
}

/// A fully validated admission, committed atomically by the repository.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: i32,
    pub participant_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub form_responses: Vec<FormResponse>,
    pub selections: Vec<Selection>,
    pub payment_proof: Option<String>,
    pub total_amount: i64,
    pub ticket: Option<TicketGrant>,
}

#[derive(Debug, Clone)]
pub struct PaymentReview {
    pub registration_id: i32,
    pub reviewer_id: i32,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}
