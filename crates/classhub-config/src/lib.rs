//! Environment-backed configuration for the classhub API.
//!
//! Each module owns one concern and loads from environment variables with
//! sensible development defaults:
//!
//! - [`cors`]: allowed origins
//! - [`jwt`]: token secret and expiry
//! - [`rate_limit`]: per-IP request throttling
//! - [`uploads`]: upload directory and public link prefix

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod uploads;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use uploads::UploadConfig;
