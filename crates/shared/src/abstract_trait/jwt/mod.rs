use crate::errors::ServiceError;
use serde_json::Value;
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn sign(&self, claims: &Value) -> Result<String, ServiceError>;
    fn verify(&self, token: &str) -> Result<Value, ServiceError>;
}
