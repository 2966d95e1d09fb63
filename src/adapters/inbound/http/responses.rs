//! Outcome-to-HTTP mapping

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::dto::{ProblemDetails, PROBLEM_JSON};
use crate::{domain::CatalogError, pipeline::Outcome};

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

impl From<&CatalogError> for ProblemDetails {
    fn from(error: &CatalogError) -> Self {
        match error {
            CatalogError::ResourceNotFound { .. } => ProblemDetails::not_found(error.to_string()),
            CatalogError::BusinessRule { .. } => ProblemDetails::forbidden(error.to_string()),
            CatalogError::RequestValidation { fields } => {
                ProblemDetails::validation(error.to_string(), fields.clone())
            }
            CatalogError::Unknown { .. } => ProblemDetails::internal(error.to_string()),
        }
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self {
            Outcome::Success(Some(value)) => (StatusCode::OK, Json(value)).into_response(),
            Outcome::Success(None) => StatusCode::NO_CONTENT.into_response(),
            // Only the first error reaches the caller
            Outcome::Failure(failure) => ProblemDetails::from(failure.first()).into_response(),
        }
    }
}

/// The request could not be decoded into a command
#[derive(Debug)]
pub struct MalformedRequest {
    pub status: StatusCode,
    pub detail: String,
}

impl MalformedRequest {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for MalformedRequest {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, detail = %self.detail, "rejecting malformed request");
        // Body limits keep their status; every other decode failure is a 400
        let problem = if self.status == StatusCode::PAYLOAD_TOO_LARGE {
            ProblemDetails::payload_too_large(self.detail)
        } else {
            ProblemDetails::bad_request(self.detail)
        };
        problem.into_response()
    }
}

macro_rules! malformed_from {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for MalformedRequest {
                fn from(rejection: $rejection) -> Self {
                    MalformedRequest {
                        status: rejection.status(),
                        detail: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

malformed_from!(
    JsonRejection,
    QueryRejection,
    PathRejection,
    MultipartRejection,
    MultipartError,
);
