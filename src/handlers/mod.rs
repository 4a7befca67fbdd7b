pub mod image;
pub mod ping;
pub mod upload;
