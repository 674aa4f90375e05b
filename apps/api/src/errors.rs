use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::matching::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Match(e) => {
                let code = match e {
                    MatchError::InvalidSkillName(_) => "INVALID_SKILL_NAME",
                    MatchError::InvalidInput(_) => "INVALID_INPUT",
                    MatchError::SynonymConflict { .. } => "SYNONYM_CONFLICT",
                };
                (StatusCode::BAD_REQUEST, code, e.to_string())
            }
            AppError::Extraction(ExtractionError::Timeout(_)) => (
                StatusCode::GATEWAY_TIMEOUT,
                "EXTRACTION_TIMEOUT",
                self.to_string(),
            ),
            AppError::Extraction(ExtractionError::Llm(msg)) => {
                tracing::error!("LLM extraction error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTRACTION_ERROR",
                    "The skill extraction service failed".to_string(),
                )
            }
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_match_errors_are_bad_requests() {
        let (status, code, _) =
            AppError::from(MatchError::InvalidInput("empty".into())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_INPUT");

        let (_, code, _) = AppError::from(MatchError::InvalidSkillName(" ".into())).parts();
        assert_eq!(code, "INVALID_SKILL_NAME");
    }

    #[test]
    fn test_extraction_timeout_is_gateway_timeout() {
        let (status, code, _) =
            AppError::from(ExtractionError::Timeout(Duration::from_secs(30))).parts();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "EXTRACTION_TIMEOUT");
    }

    #[test]
    fn test_no_skills_is_unprocessable() {
        let (status, _, message) =
            AppError::from(ExtractionError::NoSkills("cv.pdf".into())).parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("cv.pdf"));
    }

    #[test]
    fn test_llm_failure_is_bad_gateway() {
        let (status, code, message) =
            AppError::from(ExtractionError::Llm("status 529: overloaded".into())).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "EXTRACTION_ERROR");
        assert!(!message.contains("529"));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let (status, _, message) = AppError::Internal(anyhow::anyhow!("secret dsn")).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
