//! Response body types for API handlers.

use serde::Serialize;

/// Body of a successful `POST /upload`.
///
/// `msg` holds the full `data:<type>;base64,<payload>` URI.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub msg: String,
}
