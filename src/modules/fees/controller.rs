use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated};
use serde_json::json;
use tracing::instrument;

use crate::modules::fees::model::{FeeDetails, FeeDto, FeeListFilter, FeeRecord};
use crate::modules::fees::service::FeeService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/fees",
    params(PageQuery, FeeListFilter),
    responses(
        (status = 200, description = "Paginated fee records"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_fees(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<FeeListFilter>,
) -> Result<Json<Paginated<FeeRecord>>, AppError> {
    let (fees, total) = FeeService::get_fees(&state.db, &page, &filter).await?;
    Ok(Json(Paginated::new(fees, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/fees/{id}",
    params(("id" = i32, Path, description = "Fee record ID")),
    responses(
        (status = 200, description = "Fee record details", body = FeeDetails),
        (status = 404, description = "Fee record not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FeeDetails>, AppError> {
    let fee = FeeService::get_fee(&state.db, id).await?;
    Ok(Json(FeeDetails::from(fee)))
}

#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = FeeDto,
    responses(
        (status = 200, description = "Fee record created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn create_fee(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<FeeDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    FeeService::create_fee(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Fee record added" })))
}

#[utoipa::path(
    put,
    path = "/api/fees/{id}",
    params(("id" = i32, Path, description = "Fee record ID")),
    request_body = FeeDto,
    responses(
        (status = 200, description = "Fee record updated"),
        (status = 404, description = "Fee record not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn update_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<FeeDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    FeeService::update_fee(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Fee record updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/fees/{id}",
    params(("id" = i32, Path, description = "Fee record ID")),
    responses(
        (status = 200, description = "Fee record deleted"),
        (status = 404, description = "Fee record not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn delete_fee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    FeeService::delete_fee(&state.db, id).await?;
    Ok(Json(json!({ "message": "Fee record removed" })))
}
