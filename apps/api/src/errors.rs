use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::curriculum::extractor::ExtractionError;
use crate::curriculum::normalizer::NormalizationError;
use crate::llm_client::LlmError;

/// Message returned when the model's output could not be turned into a document.
pub const NORMALIZATION_FAILED_MESSAGE: &str =
    "Generated curriculum did not match expected format. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Extraction(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Normalization(e) => {
                tracing::error!("Normalization error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    NORMALIZATION_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_client_error() {
        let (status, body) = render(AppError::Validation("missing".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "missing"}));
    }

    #[tokio::test]
    async fn test_configuration_is_server_error() {
        let (status, body) = render(AppError::Configuration("no key".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "no key");
    }

    #[tokio::test]
    async fn test_extraction_message_is_surfaced() {
        let (status, body) = render(ExtractionError::NoJson.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("No JSON found"));
    }

    #[tokio::test]
    async fn test_normalization_asks_for_retry() {
        let (status, body) = render(NormalizationError::Unrecoverable.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("Please try again"));
    }

    #[tokio::test]
    async fn test_llm_error_message_is_surfaced() {
        let (status, body) = render(LlmError::EmptyContent.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "LLM returned empty content");
    }
}
