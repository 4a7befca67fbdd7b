use std::path::PathBuf;

use crate::constants::IMAGE_PATH;

// Path where uploaded images are stored and served from
pub fn get_image_path() -> PathBuf {
    IMAGE_PATH.iter().collect()
}
