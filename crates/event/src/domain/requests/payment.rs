use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PaymentProofRequest {
    #[validate(length(min = 1, max = 2048))]
    pub payment_proof: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReviewPaymentRequest {
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}
