//! Upload rules and stored-file handling.
//!
//! Attachments are checked against a MIME allow-list and a maximum byte
//! size, stored on the local filesystem under a generated name, and served
//! back through download links built from a fixed public prefix.

use std::fmt;
use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

/// MIME types accepted for attachments. Only images and PDF.
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "application/pdf",
];

/// Maximum attachment size: 10 MB.
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub enum FileError {
    /// MIME type not in the allow-list.
    InvalidMimeType { received: String },

    /// File exceeds the maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// Storage key failed validation (traversal, bad characters).
    InvalidKey(String),

    /// Filesystem error.
    Io(std::io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMimeType { received } => {
                write!(
                    f,
                    "Invalid file type '{}'. Only image or pdf is allowed",
                    received
                )
            }
            Self::InvalidFileSize { max_bytes } => {
                write!(
                    f,
                    "File size is too large; max {}mb is allowed",
                    max_bytes / (1024 * 1024)
                )
            }
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileError {}

impl From<std::io::Error> for FileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Checks an attachment's MIME type and size against the upload rules.
pub fn check_attachment(content_type: &str, size: usize) -> Result<(), FileError> {
    if !ALLOWED_ATTACHMENT_TYPES.contains(&content_type) {
        return Err(FileError::InvalidMimeType {
            received: content_type.to_string(),
        });
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(FileError::InvalidFileSize {
            max_bytes: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

/// Local filesystem store for uploaded files.
///
/// Files live under `base_dir` and are addressed by relative keys like
/// `assignments/3f2a…-notes.pdf`; public links join the key onto `base_url`.
#[derive(Clone, Debug)]
pub struct UploadStore {
    base_dir: PathBuf,
    base_url: String,
}

impl UploadStore {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self { base_dir, base_url }
    }

    /// Generates a collision-free stored name preserving the original
    /// extension, e.g. `"3f2a…-report_card.pdf"`.
    pub fn stored_name(original: &str) -> String {
        let sanitized: String = original
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}-{}", Uuid::new_v4(), sanitized)
    }

    /// Rejects empty keys, path traversal, and unexpected characters.
    fn validate_key(key: &str) -> Result<(), FileError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(FileError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(FileError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Writes `content` under `key`, creating parent directories as needed.
    pub async fn save(&self, key: &str, content: &[u8]) -> Result<String, FileError> {
        Self::validate_key(key)?;

        let file_path = self.base_dir.join(key);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&file_path, content).await?;

        Ok(key.to_string())
    }

    /// Deletes the file under `key`; absent files are not an error.
    pub async fn delete(&self, key: &str) -> Result<(), FileError> {
        Self::validate_key(key)?;

        let file_path = self.base_dir.join(key);
        match fs::remove_file(&file_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Public download link for a stored key.
    pub fn link(&self, key: &str) -> Result<String, FileError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}
