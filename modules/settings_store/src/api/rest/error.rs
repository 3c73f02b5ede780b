//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::SettingsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: SettingsError) -> Problem {
    let detail = error.to_string();
    match error {
        SettingsError::InvalidArgument { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Argument").with_detail(detail)
        }

        SettingsError::UnsupportedRequestShape { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Unsupported Request Shape").with_detail(detail)
        }

        SettingsError::Conversion { .. } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Conversion Error").with_detail(detail)
        }

        SettingsError::UnknownOperation { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Unknown Operation").with_detail(detail)
        }

        SettingsError::Persistence { message } => {
            tracing::error!("Settings persistence error: {}", message);
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Persistence Error")
                .with_detail("Settings could not be saved")
        }

        SettingsError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}

impl From<SettingsError> for Problem {
    fn from(error: SettingsError) -> Self {
        map_domain_error(error)
    }
}
