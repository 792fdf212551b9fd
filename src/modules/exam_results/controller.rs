use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated, PaginationMeta};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;

use crate::modules::exam_results::model::{
    ExamResultDetails, ExamResultDto, ExamResultFilter, ExamResultsData, PublishDto, PublishEntry,
    ResultEntrySheet,
};
use crate::modules::exam_results::service::ExamResultService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

/// List envelope for results: data carries both the result page and the
/// class's exams.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExamResultsResponse {
    pub data: ExamResultsData,
    pub meta: PaginationMeta,
}

#[utoipa::path(
    get,
    path = "/api/exam-results/subjects",
    params(ExamResultFilter),
    responses(
        (status = 200, description = "Entry sheet for a class", body = ResultEntrySheet),
        (status = 400, description = "Class id missing"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state))]
pub async fn get_entry_sheet(
    State(state): State<AppState>,
    Query(filter): Query<ExamResultFilter>,
) -> Result<Json<ResultEntrySheet>, AppError> {
    let class_id = filter
        .class_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Class id is required")))?;

    let sheet = ExamResultService::get_entry_sheet(&state.db, class_id, filter.exam_id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    get,
    path = "/api/exam-results",
    params(PageQuery, ExamResultFilter),
    responses(
        (status = 200, description = "Filtered results with the class's exams", body = ExamResultsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state))]
pub async fn get_exam_results(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<ExamResultFilter>,
) -> Result<Json<ExamResultsResponse>, AppError> {
    let exams = match filter.class_id {
        Some(class_id) => ExamResultService::get_class_exams(&state.db, class_id).await?,
        None => Vec::new(),
    };

    let (results, total) = ExamResultService::get_results(
        &state.db,
        &page,
        filter.class_id,
        filter.section_id,
        filter.exam_id,
        filter.student_roll,
    )
    .await?;

    Ok(Json(ExamResultsResponse {
        data: ExamResultsData { exams, results },
        meta: page.meta(total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/exam-results/{id}",
    params(("id" = i32, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result details", body = ExamResultDetails),
        (status = 404, description = "Result not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state))]
pub async fn get_exam_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExamResultDetails>, AppError> {
    let details =
        ExamResultService::get_result_details(&state.db, &state.upload_store, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/exam-results",
    request_body = ExamResultDto,
    responses(
        (status = 200, description = "Result created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state, dto))]
pub async fn create_exam_result(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ExamResultDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamResultService::create_result(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Subject mark added" })))
}

#[utoipa::path(
    put,
    path = "/api/exam-results/{id}",
    params(("id" = i32, Path, description = "Result ID")),
    request_body = ExamResultDto,
    responses(
        (status = 200, description = "Result updated"),
        (status = 404, description = "Result not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state, dto))]
pub async fn update_exam_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<ExamResultDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamResultService::update_result(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Subject mark added or updated" })))
}

#[utoipa::path(
    get,
    path = "/api/exam-results/publishing",
    params(PageQuery),
    responses(
        (status = 200, description = "Publishing queue"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state))]
pub async fn get_publishing(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<PublishEntry>>, AppError> {
    let (entries, total) = ExamResultService::get_publishing(&state.db, &page).await?;
    Ok(Json(Paginated::new(entries, page.meta(total))))
}

#[utoipa::path(
    put,
    path = "/api/exam-results/publishing/{id}",
    params(("id" = i32, Path, description = "Publishing entry ID")),
    request_body = PublishDto,
    responses(
        (status = 200, description = "Publish status updated"),
        (status = 404, description = "Publishable result not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Exam Results"
)]
#[instrument(skip(state, dto))]
pub async fn publish_exam_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<PublishDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamResultService::publish_result(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Result Publish Updated" })))
}
