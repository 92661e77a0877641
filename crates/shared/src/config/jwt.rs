use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde_json::Value;

#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &Algorithm::HS256)
            .field("validate_exp", &self.validation.validate_exp)
            .finish()
    }
}

impl JwtConfig {
    /// Tokens must carry a valid `exp` claim.
    pub fn new(jwt_secret: &str) -> Self {
        Self::build(jwt_secret, Validation::new(Algorithm::HS256))
    }

    /// Tokens are verified by signature only; used for long-lived ticket credentials.
    pub fn without_expiry(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self::build(jwt_secret, validation)
    }

    fn build(jwt_secret: &str, validation: Validation) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn sign(&self, claims: &Value) -> Result<String, ServiceError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(ServiceError::Jwt)
    }

    fn verify(&self, token: &str) -> Result<Value, ServiceError> {
        decode::<Value>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signed_claims_verify_with_same_secret() {
        let jwt = JwtConfig::without_expiry("secret");
        let token = jwt.sign(&json!({ "ticket_id": "TKT-ABCD1234" })).unwrap();
        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims["ticket_id"], "TKT-ABCD1234");
    }

    #[test]
    fn tampered_secret_is_rejected() {
        let token = JwtConfig::without_expiry("secret")
            .sign(&json!({ "ticket_id": "TKT-ABCD1234" }))
            .unwrap();
        assert!(JwtConfig::without_expiry("other").verify(&token).is_err());
    }

    #[test]
    fn identity_tokens_require_expiry() {
        let jwt = JwtConfig::new("secret");
        let token = jwt.sign(&json!({ "sub": 1 })).unwrap();
        assert!(jwt.verify(&token).is_err());
    }
}
