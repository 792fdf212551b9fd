use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use classhub_core::files;
use classhub_core::{PageQuery, Paginated, UploadStore};
use serde_json::json;
use tracing::instrument;

use crate::modules::homework::model::{
    Assignment, AssignmentDetails, AssignmentDto, HomeworkListFilter, StudentHomework,
    SubmissionDetails, SubmittedHomework,
};
use crate::modules::homework::service::HomeworkService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/homework",
    params(PageQuery, HomeworkListFilter),
    responses(
        (status = 200, description = "Paginated assignments"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn get_assignments(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<HomeworkListFilter>,
) -> Result<Json<Paginated<Assignment>>, AppError> {
    let (assignments, total) =
        HomeworkService::get_assignments(&state.db, &page, filter.class_id, filter.section_id)
            .await?;
    Ok(Json(Paginated::new(assignments, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/homework/{id}",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = AssignmentDetails),
        (status = 404, description = "Assignment not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AssignmentDetails>, AppError> {
    let details = HomeworkService::get_assignment(&state.db, &state.upload_store, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/homework",
    request_body = AssignmentDto,
    responses(
        (status = 200, description = "Assignment created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AssignmentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    HomeworkService::create_assignment(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Assignment added" })))
}

#[utoipa::path(
    put,
    path = "/api/homework/{id}",
    params(("id" = i32, Path, description = "Assignment ID")),
    request_body = AssignmentDto,
    responses(
        (status = 200, description = "Assignment updated"),
        (status = 404, description = "Assignment not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, dto))]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<AssignmentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    HomeworkService::update_assignment(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Assignment updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/homework/{id}",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    HomeworkService::delete_assignment(&state.db, id).await?;
    Ok(Json(json!({ "message": "Assignment removed" })))
}

#[utoipa::path(
    get,
    path = "/api/homework/student/{student_id}",
    params(("student_id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "The student's assignments with submission state", body = [StudentHomework]),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn get_student_homeworks(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<Json<Vec<StudentHomework>>, AppError> {
    let homeworks = HomeworkService::get_student_homeworks(&state.db, student_id).await?;
    Ok(Json(homeworks))
}

#[utoipa::path(
    get,
    path = "/api/homework/student/{student_id}/submitted",
    params(("student_id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "The student's submitted homeworks", body = [SubmittedHomework]),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn get_submitted_homeworks(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<Json<Vec<SubmittedHomework>>, AppError> {
    let submitted = HomeworkService::get_submitted_homeworks(&state.db, student_id).await?;
    Ok(Json(submitted))
}

#[utoipa::path(
    get,
    path = "/api/homework/student/{student_id}/submitted/{homework_id}",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
        ("homework_id" = i32, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Submission details", body = SubmissionDetails),
        (status = 404, description = "Submission not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state))]
pub async fn get_submitted_homework_details(
    State(state): State<AppState>,
    Path((student_id, homework_id)): Path<(i32, i32)>,
) -> Result<Json<SubmissionDetails>, AppError> {
    let details = HomeworkService::get_submission_details(
        &state.db,
        &state.upload_store,
        student_id,
        homework_id,
    )
    .await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/homework/attachment",
    responses(
        (status = 200, description = "Stored attachment key"),
        (status = 422, description = "File rejected"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_attachment(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("attachment") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or("attachment").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        files::check_attachment(&content_type, data.len())
            .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

        let stored_name = UploadStore::stored_name(&file_name);
        let key = format!("assignments/{}", stored_name);
        state
            .upload_store
            .save(&key, &data)
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to store upload: {}", e)))?;

        // The bare stored name goes into the assignment's `attachment` field
        return Ok(Json(json!({ "file": stored_name })));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Attachment file is required"
    )))
}
