use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{config::Settings, constants::API_KEY_HEADER, error::ApiError, ServerState};

/// Checks if the `X-API-Key` header carries one of the configured keys.
/// An empty header value counts as missing.
pub fn check_api_key(headers: &HeaderMap, settings: &Settings) -> Result<(), ApiError> {
    let key = match headers.get(API_KEY_HEADER) {
        None => return Err(ApiError::MissingApiKey),
        Some(value) if value.is_empty() => return Err(ApiError::MissingApiKey),
        Some(value) => value,
    };

    // Non UTF-8 keys can never match
    match key.to_str() {
        Ok(key) if settings.is_valid_key(key) => Ok(()),
        _ => {
            log::warn!("Authentication failed: invalid API key");
            Err(ApiError::InvalidApiKey)
        }
    }
}

/// Middleware guarding routes that need an API key. The wrapped handler is
/// only invoked once the key has been accepted.
pub async fn require_api_key(
    State(server_state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_api_key(request.headers(), &server_state.settings)?;
    Ok(next.run(request).await)
}
