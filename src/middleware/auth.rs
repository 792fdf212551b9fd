//! Authentication gate for the API surface.
//!
//! The contract with handlers: either a verified [`Claims`] is attached to
//! the request extensions before they run, or the request short-circuits
//! with 401. Token issuance happens outside this service; only the shared
//! secret is needed here.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;
    let claims = verify_token(token, &state.jwt)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Missing authorization header")))?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
    })
}
