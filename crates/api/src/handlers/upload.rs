//! Handler for `POST /upload`: multipart file in, data URI out.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::Json;
use dataurl_core::data_uri;
use dataurl_core::media_type::classify;

use crate::error::{AppError, AppResult};
use crate::response::UploadResponse;

/// Name of the multipart part carrying the upload.
pub const FILE_FIELD: &str = "file";

/// A file part read fully into memory.
#[derive(Debug)]
pub struct FilePart {
    pub filename: String,
    pub data: Bytes,
}

/// POST /upload
///
/// Reads the `file` part, sniffs its content, and returns it as a base64
/// data URI when the type is JPEG, PNG, or PDF. Other types get 405; any
/// problem reading the upload gets 500.
pub async fn upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let part = read_file_part(&mut multipart).await?;

    tracing::debug!(
        filename = %part.filename,
        size = part.data.len(),
        "Received upload"
    );

    let media_type = classify(&part.data)?;
    let msg = data_uri::encode(media_type, &part.data);

    tracing::info!(
        filename = %part.filename,
        size = part.data.len(),
        %media_type,
        "Encoded upload"
    );

    Ok(Json(UploadResponse { msg }))
}

/// Find the first file part named [`FILE_FIELD`] and read it to the end.
///
/// Parts with other names are skipped, as is a `file` part sent as a plain
/// form value (no filename). The whole body is parsed even after the file
/// is found, so a malformed trailing part still fails the request.
async fn read_file_part(multipart: &mut Multipart) -> AppResult<FilePart> {
    let mut found = None;

    while let Some(field) = multipart.next_field().await? {
        if found.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };

        let data = field.bytes().await?;
        found = Some(FilePart { filename, data });
    }

    found.ok_or(AppError::MissingFile)
}
