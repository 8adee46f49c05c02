//! `data:` URI encoding for accepted uploads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;
use crate::media_type::AllowedMediaType;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encode `data` as `data:<type>;base64,<payload>` using the standard,
/// padded base64 alphabet.
pub fn encode(media_type: AllowedMediaType, data: &[u8]) -> String {
    format!("{SCHEME}{media_type}{BASE64_MARKER}{}", STANDARD.encode(data))
}

/// A decoded base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Parse a `data:<type>;base64,<payload>` string.
    ///
    /// Only the base64 form is accepted; percent-encoded payloads are
    /// rejected with [`CoreError::InvalidDataUri`].
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let rest = uri
            .strip_prefix(SCHEME)
            .ok_or_else(|| CoreError::InvalidDataUri("missing `data:` scheme".into()))?;

        let (media_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| CoreError::InvalidDataUri("missing `;base64,` marker".into()))?;

        let data = STANDARD
            .decode(payload)
            .map_err(|e| CoreError::InvalidDataUri(e.to_string()))?;

        Ok(Self {
            media_type: media_type.to_string(),
            data,
        })
    }
}
