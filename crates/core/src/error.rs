#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
}
