use std::io;

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{
    constants::IMAGE_URL_PREFIX,
    error::ApiError,
    util::image::{determine_img_path, validate_image_filename},
    ServerState,
};

// This handler serves stored images from the filesystem.
// Only names following the `<uuid>.<ext>` convention are looked up.
// Range requests, conditional GETs and the content type are handled by ServeFile.
// Any method is answered; everything but HEAD is served as a GET.
pub async fn image_handler(
    State(server_state): State<ServerState>,
    request: Request,
) -> Result<Response, ApiError> {
    let filename = request
        .uri()
        .path()
        .strip_prefix(IMAGE_URL_PREFIX)
        .unwrap_or_default()
        .to_owned();

    if validate_image_filename(&filename).is_none() {
        return Err(ApiError::InvalidImagePath);
    }

    let path = determine_img_path(&server_state.image_dir, &filename);
    if let Err(err) = tokio::fs::metadata(&path).await {
        return match err.kind() {
            io::ErrorKind::NotFound => Err(ApiError::ImageNotFound),
            _ => {
                log::error!("Unable to read metadata for '{:?}': {}", path, err);
                Err(ApiError::ReadFailed)
            }
        };
    }

    log::info!("Returned image '{}'", filename);

    let (mut parts, body) = request.into_parts();
    if parts.method != Method::HEAD {
        parts.method = Method::GET;
    }
    let request = Request::from_parts(parts, body);

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}
