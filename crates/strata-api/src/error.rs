//! HTTP error mapping for strata-api.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Request was well-formed but a parameter failed validation.
    #[error("{0}")]
    Unprocessable(String),

    /// The dataset could not be loaded; nothing can be served.
    #[error("{0}")]
    Dataset(strata_core::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<strata_core::Error> for ApiError {
    fn from(err: strata_core::Error) -> Self {
        match err {
            strata_core::Error::LayerNotFound(_) => ApiError::NotFound(err.to_string()),
            // `q` follows the field-validation convention (422); other
            // malformed parameters are plain bad requests.
            strata_core::Error::InvalidQuery { param: "q", .. } => {
                ApiError::Unprocessable(err.to_string())
            }
            strata_core::Error::InvalidQuery { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Dataset(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Dataset(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Dataset(e) => {
                tracing::error!(subsystem = "api", error = %e, "Timeline dataset unavailable");
                "Timeline dataset unavailable".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!(subsystem = "api", error = %msg, "Internal error");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_not_found_maps_to_404_with_name() {
        let err: ApiError = strata_core::Error::LayerNotFound("video-streaming".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("video-streaming"));
    }

    #[test]
    fn test_short_query_maps_to_422() {
        let err: ApiError = strata_core::Error::invalid_query("q", "too short").into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn test_bad_limit_maps_to_400() {
        let err: ApiError = strata_core::Error::invalid_query("limit", "must be >= 1").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("'limit'"));
    }

    #[test]
    fn test_dataset_errors_map_to_500() {
        let err: ApiError = strata_core::Error::DatasetParse("bad".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = strata_core::Error::DatasetNotFound { candidates: vec![] }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
