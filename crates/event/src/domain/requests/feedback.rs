use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitFeedbackRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindEventFeedback {
    /// Only list feedback with this rating; the stats always cover everything.
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

/// Row handed to storage once the author's registration has been checked.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub event_id: i32,
    pub participant_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}
