use crate::model::{
    event::{Eligibility, Event},
    text_enum,
};
use serde::Deserialize;
use serde_json::Value;
use shared::errors::ServiceError;

text_enum!(Role, "role", {
    Participant => "participant",
    Organizer => "organizer",
    Admin => "admin",
});

text_enum!(ParticipantClass, "participant class", {
    Internal => "internal",
    External => "external",
});

#[derive(Deserialize)]
#[serde(untagged)]
enum Subject {
    Id(i32),
    Text(String),
}

#[derive(Deserialize)]
struct IdentityClaims {
    sub: Subject,
    role: Role,
    name: String,
    email: String,
    #[serde(default)]
    participant_class: Option<ParticipantClass>,
}

/// The verified caller, as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub participant_class: Option<ParticipantClass>,
}

impl Actor {
    pub fn from_claims(claims: Value) -> Result<Self, ServiceError> {
        let claims: IdentityClaims = serde_json::from_value(claims)
            .map_err(|e| ServiceError::Unauthorized(format!("Malformed identity claims: {e}")))?;

        let user_id = match claims.sub {
            Subject::Id(id) => id,
            Subject::Text(text) => text
                .parse::<i32>()
                .map_err(|_| ServiceError::Unauthorized("Invalid subject claim".into()))?,
        };

        Ok(Self {
            user_id,
            role: claims.role,
            name: claims.name,
            email: claims.email,
            participant_class: claims.participant_class,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_role(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized(format!(
                "This action requires the {role} role"
            )))
        }
    }

    pub fn owns(&self, event: &Event) -> bool {
        self.role == Role::Organizer && event.organizer_id == self.user_id
    }

    /// Owning organizer or any admin.
    pub fn require_manager(&self, event: &Event) -> Result<(), ServiceError> {
        if self.is_admin() || self.owns(event) {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized(
                "Only the event's organizer or an admin may do this".into(),
            ))
        }
    }

    pub fn is_eligible_for(&self, eligibility: Eligibility) -> bool {
        match eligibility {
            Eligibility::All => true,
            Eligibility::Internal => self.participant_class == Some(ParticipantClass::Internal),
            Eligibility::External => self.participant_class == Some(ParticipantClass::External),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claims_with_string_subject_are_accepted() {
        let actor = Actor::from_claims(json!({
            "sub": "42",
            "role": "participant",
            "name": "Ravi",
            "email": "ravi@example.com",
            "participant_class": "internal",
            "exp": 0
        }))
        .unwrap();

        assert_eq!(actor.user_id, 42);
        assert!(actor.is_eligible_for(Eligibility::Internal));
        assert!(!actor.is_eligible_for(Eligibility::External));
        assert!(actor.is_eligible_for(Eligibility::All));
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let err = Actor::from_claims(json!({
            "sub": 1,
            "role": "superuser",
            "name": "x",
            "email": "x@example.com"
        }))
        .unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
