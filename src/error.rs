use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
#[derive(Debug, Error)]
pub enum AppError {
    /// 모델 로드 실패 (치명적, 재시도하지 않음)
    #[error("Error loading model: {0}")]
    ModelLoad(String),

    /// 추론 서버 인증 실패
    #[error("Model endpoint rejected the API key")]
    ModelAuth,

    /// 추론 서버 일시적 장애 (rate limit, 5xx, 연결 실패)
    #[error("Model endpoint temporarily unavailable: {0}")]
    ModelUnavailable(String),

    /// 그 외 추론 호출 실패
    #[error("Model inference failed: {0}")]
    ModelInference(String),

    #[error("CSV must contain a '{0}' column")]
    MissingColumn(String),

    #[error("Error processing file: {0}")]
    CsvParse(String),

    /// 배치 처리 중단. 이미 처리된 티켓은 세션에 남아 있음
    #[error("Error processing file after {processed} of {total} tickets: {message}")]
    BatchInterrupted {
        processed: usize,
        total: usize,
        message: String,
    },

    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid request body: {0}")]
    JsonParseFailed(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 에러 코드 반환
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ModelLoad(_) => "MODEL_001",
            AppError::ModelInference(_) => "MODEL_002",
            AppError::ModelUnavailable(_) => "MODEL_003",
            AppError::ModelAuth => "MODEL_004",
            AppError::MissingColumn(_) => "CSV_001",
            AppError::CsvParse(_) => "CSV_002",
            AppError::BatchInterrupted { .. } => "BATCH_001",
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) | AppError::BadRequest(_) => {
                "COMMON400"
            }
            AppError::Internal(_) => "COMMON500",
        }
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ModelLoad(_) | AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ModelInference(_) | AppError::ModelAuth => StatusCode::BAD_GATEWAY,
            AppError::MissingColumn(_)
            | AppError::CsvParse(_)
            | AppError::ValidationError(_)
            | AppError::JsonParseFailed(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::BatchInterrupted { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, "{}", message);
        } else {
            tracing::warn!(code, "{}", message);
        }

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid upload: {}", error.body_text()))
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        AppError::CsvParse(error.to_string())
    }
}
