use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated};
use serde_json::json;
use tracing::instrument;

use crate::modules::teachers::model::{Teacher, TeacherDetails, TeacherDto};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated teachers"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<Teacher>>, AppError> {
    let (teachers, total) = TeacherService::get_teachers(&state.db, &page).await?;
    Ok(Json(Paginated::new(teachers, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherDetails),
        (status = 404, description = "Teacher not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeacherDetails>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(TeacherDetails::from_record(
        teacher,
        &state.upload_store,
    )))
}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = TeacherDto,
    responses(
        (status = 200, description = "Teacher created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<TeacherDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    TeacherService::create_teacher(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Teacher added" })))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = TeacherDto,
    responses(
        (status = 200, description = "Teacher updated"),
        (status = 404, description = "Teacher not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<TeacherDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    TeacherService::update_teacher(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Teacher updated successfully" })))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(Json(json!({ "message": "Teacher data removed" })))
}
