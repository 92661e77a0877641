use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Either the printed ticket identifier or the scanned credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "exactly_one_ticket_reference"))]
pub struct CheckInRequest {
    #[validate(length(min = 1, max = 64))]
    pub ticket_id: Option<String>,

    #[validate(length(min = 1))]
    pub credential: Option<String>,
}

fn exactly_one_ticket_reference(req: &CheckInRequest) -> Result<(), ValidationError> {
    match (&req.ticket_id, &req.credential) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(ValidationError::new("ticket_reference")
            .with_message("Provide exactly one of ticket_id or credential".into())),
    }
}
