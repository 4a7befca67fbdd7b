use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    Json,
};
use axum_extra::{headers::ContentLength, TypedHeader};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    constants::IMAGE_URL_PREFIX,
    error::ApiError,
    util::image::{
        delete_image, determine_file_type, determine_img_path, image_filename, save_capped,
    },
    ServerState,
};

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub url: String,
    pub filename: String,
}

/// Stores the raw request body as a new image.
///
/// The checks run in a fixed order and the first failure ends the request:
///  - method must be POST
///  - a declared Content-Length must not exceed the cap
///  - Content-Type must be one of the supported image types
///
/// The body itself is read up to the cap only. Reaching the cap means the
/// upload was truncated, so a body of exactly the cap is rejected as well.
pub async fn upload_handler(
    State(server_state): State<ServerState>,
    method: Method,
    content_length: Option<TypedHeader<ContentLength>>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<UploadResult>), ApiError> {
    let settings = &server_state.settings;

    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    if let Some(TypedHeader(ContentLength(length))) = content_length {
        if length > settings.max_upload_bytes {
            return Err(ApiError::FileTooLarge(settings.max_upload_mb()));
        }
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let file = match determine_file_type(content_type) {
        None => return Err(ApiError::InvalidContentType),
        Some(file) => file,
    };

    let filename = image_filename(Uuid::new_v4(), file);
    let path = determine_img_path(&server_state.image_dir, &filename);

    let written = match save_capped(&path, body, settings.max_upload_bytes).await {
        Err(err) => {
            log::error!("Error while saving '{:?}': {}", path, err);
            delete_image(&path).await;
            return Err(ApiError::SaveFailed);
        }
        Ok(written) => written,
    };

    if written == settings.max_upload_bytes {
        log::info!("Rejected '{}': reached the {}B limit", filename, written);
        delete_image(&path).await;
        return Err(ApiError::FileTooLarge(settings.max_upload_mb()));
    }

    log::info!("Received and saved image '{}' with size {}B", filename, written);

    Ok((
        StatusCode::CREATED,
        Json(UploadResult {
            url: format!("{}{}", IMAGE_URL_PREFIX, filename),
            filename,
        }),
    ))
}
