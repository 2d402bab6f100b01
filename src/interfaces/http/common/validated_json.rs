//! JSON extractor that also runs `validator` checks
//!
//! Malformed JSON is a 400; a body that parses but fails validation is a 422
//! listing every failing field.

use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::{ApiError, ApiResponse};

/// Request body that has been parsed and has passed its `validator` rules.
///
/// ```ignore
/// async fn check_out(ValidatedJson(req): ValidatedJson<CheckOutRequest>) {
///     // `req.plate` is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, ApiError> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection))),
            )
        })?;

        value.validate().map_err(|errors| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<()>::error(describe(&errors))),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

/// `field: message` per failure, sorted by field so responses are stable
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

// ── Tests ──────────────────────────────────────────────────────
