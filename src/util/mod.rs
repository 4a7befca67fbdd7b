pub mod auth;
pub mod cors;
pub mod image;
pub mod path;
