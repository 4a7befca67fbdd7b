use std::{
    io,
    path::{Path, PathBuf},
};

use axum::body::Body;
use futures::TryStreamExt;
use tokio::{
    fs::{remove_file, File},
    io::{AsyncReadExt, AsyncWriteExt},
};
use tokio_util::io::StreamReader;
use uuid::{fmt::Hyphenated, Uuid};

pub struct FileIdentification {
    content_type: &'static str,
    file_extension: &'static str,
}

const FILE_MAPPINGS: [FileIdentification; 4] = [
    FileIdentification {
        content_type: "image/jpeg",
        file_extension: "jpg",
    },
    FileIdentification {
        content_type: "image/png",
        file_extension: "png",
    },
    FileIdentification {
        content_type: "image/gif",
        file_extension: "gif",
    },
    FileIdentification {
        content_type: "image/webp",
        file_extension: "webp",
    },
];

impl FileIdentification {
    pub fn extension(&self) -> &'static str {
        self.file_extension
    }
}

/// Looks up the declared content type. Only exact matches are accepted,
/// parameters such as `; charset=...` make the type unsupported.
pub fn determine_file_type(content_type: &str) -> Option<&'static FileIdentification> {
    FILE_MAPPINGS
        .iter()
        .find(|mapping| mapping.content_type == content_type)
}

/// Builds the storage name `<uuid>.<ext>` for a fresh upload.
pub fn image_filename(uuid: Uuid, file: &FileIdentification) -> String {
    format!("{}.{}", uuid.hyphenated(), file.extension())
}

/// Checks a requested name against the `<uuid>.<ext>` convention.
///
/// The extension is not checked against the supported types; a well formed
/// name with an unknown extension simply won't exist on disk.
pub fn validate_image_filename(filename: &str) -> Option<Uuid> {
    if filename.is_empty() {
        return None;
    }

    let split = filename.split('.').collect::<Vec<_>>();
    if split.len() != 2 {
        return None;
    }

    let name = split[0];
    if name.len() != Hyphenated::LENGTH {
        return None;
    }

    Uuid::try_parse(name).ok()
}

pub fn determine_img_path(folder: &Path, filename: &str) -> PathBuf {
    folder.join(filename)
}

/// Streams `body` into a new file at `path`, reading at most `limit` bytes.
/// Returns the number of bytes written. The file handle is closed on every
/// return path.
pub async fn save_capped(path: &Path, body: Body, limit: u64) -> Result<u64, io::Error> {
    let mut file = File::create(path).await?;

    let stream = body.into_data_stream().map_err(io::Error::other);
    let mut reader = StreamReader::new(stream).take(limit);

    let written = tokio::io::copy(&mut reader, &mut file).await?;
    file.flush().await?;

    Ok(written)
}

/// Deletes a partially written upload.
/// A missing file is the expected state and not reported.
pub async fn delete_image(path: &Path) {
    if let Err(err) = remove_file(path).await {
        match err.kind() {
            io::ErrorKind::NotFound => (),
            _ => log::error!("Unable to delete '{:?}': {}", path, err),
        }
    }
}
