//! # Classhub DB
//!
//! Database pool initialization and migrations for the classhub API.
//!
//! The database URL is read from the `DATABASE_URL` environment variable.
//!
//! # Example
//!
//! ```ignore
//! use classhub_db::{init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await;
//!     run_migrations(&pool).await;
//! }
//! ```

use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and shared across request tasks;
/// it is the only state the application holds between requests.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Applies the embedded migrations from `migrations/`.
///
/// # Panics
///
/// Panics if a migration fails to apply.
pub async fn run_migrations(pool: &sqlx::PgPool) {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
