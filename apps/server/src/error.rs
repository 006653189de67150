use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use packhub::manifest::ManifestError;
use serde_json::json;
use tracing::{error, warn};

/// HTTP face of [`ManifestError`].
#[derive(Debug)]
pub struct ApiError(ManifestError);

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            ManifestError::UnknownBundle { .. } | ManifestError::UnknownConfiguration { .. } => {
                StatusCode::NOT_FOUND
            },
            ManifestError::CompileTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ManifestError> for ApiError {
    fn from(err: ManifestError) -> Self {
        Self(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self(ManifestError::from(format!("Manifest task failed: {err}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
