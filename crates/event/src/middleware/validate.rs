use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::errors::ErrorResponse;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON body that must also pass its `validator` rules.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (
                    rejection.status(),
                    Json(ErrorResponse::new("error", rejection.body_text())),
                )
            })?;

        value.validate().map_err(|errors| {
            let mut body = ErrorResponse::new("error", "Validation failed");
            body.data = Some(validation_details(&errors));
            (StatusCode::BAD_REQUEST, Json(body))
        })?;

        Ok(Self(value))
    }
}

fn describe(code: &str, field: &str) -> String {
    match code {
        "email" => "Invalid email format".to_string(),
        "url" => "Invalid URL format".to_string(),
        "length" => "Invalid length".to_string(),
        "range" => "Value out of range".to_string(),
        _ => format!("Invalid {field}"),
    }
}

fn validation_details(errors: &ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| describe(&e.code, &field))
            })
            .collect();
        details.insert(field.to_string(), json!(messages));
    }

    for (field, kind) in errors.errors() {
        let name = field.to_string();
        if !details.contains_key(&name) && !matches!(kind, ValidationErrorsKind::Field(_)) {
            details.insert(name, json!(["Invalid nested value"]));
        }
    }

    Value::Object(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::attendance::CheckInRequest;

    #[test]
    fn schema_level_errors_are_reported() {
        let errors = CheckInRequest::default().validate().unwrap_err();
        let details = validation_details(&errors);
        assert_eq!(
            details["__all__"][0],
            "Provide exactly one of ticket_id or credential"
        );
    }
}
