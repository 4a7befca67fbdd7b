use std::str::FromStr;

use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::Settings;

/// Parses Axum HTTP Methods from `CORS_ALLOWED_METHODS`, skipping unknown ones
pub fn parse_methods(settings: &Settings) -> Vec<Method> {
    settings
        .cors_allowed_methods
        .iter()
        .filter_map(|elem| match Method::from_str(elem) {
            Ok(method) => Some(method),
            Err(err) => {
                log::warn!("Ignoring CORS method '{}': {}", elem, err);
                None
            }
        })
        .collect()
}

/// Parses header values from `CORS_ALLOWED_ORIGINS`, skipping invalid ones
pub fn parse_origins(settings: &Settings) -> Vec<HeaderValue> {
    settings
        .cors_allowed_origins
        .iter()
        .filter_map(|elem| match HeaderValue::from_str(elem) {
            Ok(origin) => Some(origin),
            Err(err) => {
                log::warn!("Ignoring CORS origin '{}': {}", elem, err);
                None
            }
        })
        .collect()
}

/// Returns a CORS layer if at least one origin is configured.
pub fn cors_layer(settings: &Settings) -> Option<CorsLayer> {
    let origins = parse_origins(settings);
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(parse_methods(settings)),
    )
}
