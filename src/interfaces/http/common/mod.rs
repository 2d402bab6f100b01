//! Shared HTTP building blocks: response envelope, error mapping and the
//! validating JSON extractor.

mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Uniform response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload, `null` on error
    pub data: Option<T>,
    /// Error description, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidPlate(_)
        | DomainError::UnknownVehicleClass(_)
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::VehicleNotFound(_)
        | DomainError::UnknownArea(_)
        | DomainError::SlotOutOfRange { .. } => StatusCode::NOT_FOUND,
        DomainError::AreaFull(_) | DomainError::AlreadyParked { .. } => StatusCode::CONFLICT,
        DomainError::SlotOccupied(_) | DomainError::SlotEmpty(_) | DomainError::Receipt(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Map a domain error onto the envelope with its status code
pub fn domain_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        error!(error = %e, kind = e.kind(), "Request failed with internal error");
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}
