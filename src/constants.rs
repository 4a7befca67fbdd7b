pub const DEFAULT_PORT: &str = "8888";
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
// 1 MB = 2^20 bytes
pub const MB_SHIFT: u32 = 20;
pub const API_KEY_HEADER: &str = "x-api-key";
pub const IMAGE_URL_PREFIX: &str = "/images/";
// Uploaded images, named `<uuid>.<ext>`
pub const IMAGE_PATH: [&str; 2] = [".", "images"];
