use crate::domain::{
    identity::Actor,
    requests::{
        attendance::CheckInRequest,
        payment::{PaymentProofRequest, ReviewPaymentRequest},
        registration::{FindAllRegistrations, RegisterRequest},
    },
    response::{
        analytics::EventAnalyticsResponse,
        api::{ApiResponse, ApiResponsePagination},
        attendance::{AttendanceResponse, AttendanceSummaryResponse},
        registration::RegistrationResponse,
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynAdmissionService = Arc<dyn AdmissionServiceTrait + Send + Sync>;
pub type DynPaymentService = Arc<dyn PaymentServiceTrait + Send + Sync>;
pub type DynAttendanceService = Arc<dyn AttendanceServiceTrait + Send + Sync>;
pub type DynAnalyticsService = Arc<dyn AnalyticsServiceTrait + Send + Sync>;
pub type DynRegistrationService = Arc<dyn RegistrationServiceTrait + Send + Sync>;

#[async_trait]
pub trait AdmissionServiceTrait {
    async fn register(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
}

#[async_trait]
pub trait PaymentServiceTrait {
    async fn submit_proof(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &PaymentProofRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
    async fn approve(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
    async fn reject(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
}

#[async_trait]
pub trait AttendanceServiceTrait {
    async fn check_in(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &CheckInRequest,
    ) -> Result<ApiResponse<AttendanceResponse>, ServiceError>;
    async fn summary(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<AttendanceSummaryResponse>, ServiceError>;
}

#[async_trait]
pub trait AnalyticsServiceTrait {
    async fn event_analytics(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<EventAnalyticsResponse>, ServiceError>;
}

#[async_trait]
pub trait RegistrationServiceTrait {
    async fn my_registrations(
        &self,
        actor: &Actor,
    ) -> Result<ApiResponse<Vec<RegistrationResponse>>, ServiceError>;
    async fn event_registrations(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &FindAllRegistrations,
    ) -> Result<ApiResponsePagination<Vec<RegistrationResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
    async fn cancel(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError>;
}
