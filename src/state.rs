use classhub_config::{CorsConfig, JwtConfig, RateLimitConfig, UploadConfig};
use classhub_core::UploadStore;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub uploads: UploadConfig,
    pub upload_store: UploadStore,
}

impl AppState {
    /// Builds application state around an existing pool, loading everything
    /// else from the environment.
    pub fn from_env(db: PgPool) -> Self {
        let uploads = UploadConfig::from_env();
        let upload_store = UploadStore::new(uploads.dir.clone(), uploads.public_base_url.clone());

        Self {
            db,
            jwt: JwtConfig::from_env(),
            cors: CorsConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            uploads,
            upload_store,
        }
    }
}
