use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dataurl_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as a bare status code with an empty body; the
/// cause only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `dataurl_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request could not be read as `multipart/form-data` at all.
    #[error("Multipart rejected: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    /// The multipart stream broke while parsing or reading a part.
    #[error("Multipart error: {0}")]
    Multipart(MultipartError),

    /// The body parsed, but no file part named `file` was present.
    #[error("No file part named 'file' in upload")]
    MissingFile,

    /// The body exceeded the configured upload limit.
    #[error("Upload exceeds the configured size limit")]
    PayloadTooLarge,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            // Kept as 405 for compatibility with existing clients.
            AppError::Core(CoreError::UnsupportedMediaType(_)) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Core(CoreError::InvalidDataUri(_))
            | AppError::MultipartRejection(_)
            | AppError::Multipart(_)
            | AppError::MissingFile => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AppError {
    /// Hitting the body limit mid-stream surfaces as a multipart error;
    /// split it out so it maps to 413 instead of 500.
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Multipart(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match status {
            StatusCode::METHOD_NOT_ALLOWED => {
                tracing::info!(reason = %self, "Rejected upload");
            }
            StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!(error = %self, "Upload too large");
            }
            _ => {
                tracing::error!(error = %self, "Upload failed");
            }
        }

        status.into_response()
    }
}
