use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated};
use serde_json::json;
use tracing::instrument;

use crate::modules::exams::model::{Exam, ExamDetails, ExamDto, ExamListFilter};
use crate::modules::exams::service::ExamService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/exams",
    params(PageQuery, ExamListFilter),
    responses(
        (status = 200, description = "Paginated exams"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exams(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<ExamListFilter>,
) -> Result<Json<Paginated<Exam>>, AppError> {
    let (exams, total) =
        ExamService::get_exams(&state.db, &page, filter.class_id, filter.section_id).await?;
    Ok(Json(Paginated::new(exams, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(("id" = i32, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam with routines", body = ExamDetails),
        (status = 404, description = "Exam not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExamDetails>, AppError> {
    let details = ExamService::get_exam(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = ExamDto,
    responses(
        (status = 200, description = "Exam created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ExamDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::create_exam(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Exam added" })))
}

#[utoipa::path(
    put,
    path = "/api/exams/{id}",
    params(("id" = i32, Path, description = "Exam ID")),
    request_body = ExamDto,
    responses(
        (status = 200, description = "Exam updated"),
        (status = 404, description = "Exam not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, dto))]
pub async fn update_exam(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<ExamDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::update_exam(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Exam updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(("id" = i32, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam deleted"),
        (status = 404, description = "Exam not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::delete_exam(&state.db, id).await?;
    Ok(Json(json!({ "message": "Exam removed" })))
}
