use std::env;
use std::path::PathBuf;

/// Where uploaded files land on disk and how they are linked publicly.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub public_base_url: String,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())),
            public_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/uploads".to_string()),
        }
    }
}
