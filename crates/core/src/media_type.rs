//! The fixed allow-list of media types the service will encode.

use std::fmt;

use crate::error::CoreError;
use crate::sniff::detect_content_type;

/// A sniffed media type that is accepted for data-URI encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowedMediaType {
    Jpeg,
    Png,
    Pdf,
}

impl AllowedMediaType {
    pub const ALL: [AllowedMediaType; 3] = [Self::Jpeg, Self::Png, Self::Pdf];

    /// Canonical MIME string, as produced by the sniffer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Exact match against the canonical strings. Parameters such as
    /// `; charset=...` are not stripped, since the sniffer never attaches
    /// them to these types.
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == mime)
    }
}

impl fmt::Display for AllowedMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sniff `data` and check the result against the allow-list.
///
/// Returns [`CoreError::UnsupportedMediaType`] carrying the detected type
/// when it is not one of [`AllowedMediaType::ALL`].
pub fn classify(data: &[u8]) -> Result<AllowedMediaType, CoreError> {
    let detected = detect_content_type(data);
    AllowedMediaType::from_mime(detected)
        .ok_or_else(|| CoreError::UnsupportedMediaType(detected.to_string()))
}
