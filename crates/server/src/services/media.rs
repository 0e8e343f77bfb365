//! Image uploads stored on the local filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// URL prefix under which stored files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Suffixed names tried after the bare timestamp is taken.
const MAX_NAME_RETRIES: u32 = 16;

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The request did not contain an `image` field.
    #[error("no image file provided")]
    MissingFile,

    /// The file name has no extension or one outside the allow-list.
    #[error("file type not allowed")]
    UnsupportedType,

    /// The file was empty.
    #[error("uploaded file is empty")]
    Empty,

    /// Writing the file failed.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: PathBuf,
    pub url: String,
}

/// Return the lowercased extension of `file_name` if it is allowed.
///
/// # Errors
///
/// Returns `MediaError::UnsupportedType` otherwise.
pub fn allowed_extension(file_name: &str) -> Result<String, MediaError> {
    let (_, ext) = file_name.rsplit_once('.').ok_or(MediaError::UnsupportedType)?;
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(MediaError::UnsupportedType)
    }
}

/// Timestamp file name, e.g. `20250601123045123456.png`. A non-zero
/// `attempt` is appended as `-N` before the extension.
#[must_use]
pub fn stored_name(now: DateTime<Utc>, attempt: u32, ext: &str) -> String {
    let stamp = now.format("%Y%m%d%H%M%S%6f");
    if attempt == 0 {
        format!("{stamp}.{ext}")
    } else {
        format!("{stamp}-{attempt}.{ext}")
    }
}

/// Validate and write an uploaded image under `dir`.
///
/// # Errors
///
/// Returns `MediaError::UnsupportedType` or `MediaError::Empty` for bad input,
/// `MediaError::Io` if the file cannot be written.
pub async fn store_image(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredImage, MediaError> {
    let ext = allowed_extension(original_name)?;
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    tokio::fs::create_dir_all(dir).await?;
    write_new(dir, Utc::now(), &ext, bytes).await
}

/// Write `bytes` to a fresh file named after `now`, never overwriting an
/// existing upload.
async fn write_new(
    dir: &Path,
    now: DateTime<Utc>,
    ext: &str,
    bytes: &[u8],
) -> Result<StoredImage, MediaError> {
    let mut attempt = 0;
    let (file_name, path, mut file) = loop {
        let file_name = stored_name(now, attempt, ext);
        let path = dir.join(&file_name);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => break (file_name, path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_RETRIES => {
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };
    file.write_all(bytes).await?;
    file.flush().await?;

    tracing::info!(file = %file_name, size = bytes.len(), "Image stored");

    Ok(StoredImage {
        path,
        url: format!("{UPLOADS_URL_PREFIX}/{file_name}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("logo.PNG").unwrap(), "png");
        assert_eq!(allowed_extension("photo.final.jpeg").unwrap(), "jpeg");
        assert!(matches!(
            allowed_extension("script.svg"),
            Err(MediaError::UnsupportedType)
        ));
        assert!(matches!(
            allowed_extension("noextension"),
            Err(MediaError::UnsupportedType)
        ));
    }

    #[test]
    fn test_stored_name_format() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(stored_name(now, 0, "gif"), "20250601123045123456.gif");
        assert_eq!(stored_name(now, 2, "gif"), "20250601123045123456-2.gif");
    }

    #[tokio::test]
    async fn test_store_image_writes_file() {
        let dir = std::env::temp_dir().join(format!("storekeep-media-{}", uuid::Uuid::new_v4()));
        let stored = store_image(&dir, "mug.jpg", b"\xff\xd8\xff").await.unwrap();

        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with(".jpg"));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"\xff\xd8\xff");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_image_rejects_empty() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            store_image(&dir, "mug.png", b"").await,
            Err(MediaError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_same_instant_uploads_get_distinct_names() {
        let dir = std::env::temp_dir().join(format!("storekeep-media-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap();

        let first = write_new(&dir, now, "png", b"first").await.unwrap();
        let second = write_new(&dir, now, "png", b"second").await.unwrap();

        assert_eq!(first.url, "/uploads/20250601123045000000.png");
        assert_eq!(second.url, "/uploads/20250601123045000000-1.png");
        assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"second");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
