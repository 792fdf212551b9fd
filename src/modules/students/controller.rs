use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated};
use serde_json::json;
use tracing::instrument;

use crate::modules::students::model::{Student, StudentDetails, StudentDto, StudentListFilter};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students",
    params(PageQuery, StudentListFilter),
    responses(
        (status = 200, description = "Paginated students"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<StudentListFilter>,
) -> Result<Json<Paginated<Student>>, AppError> {
    let (students, total) = StudentService::get_students(&state.db, &page, &filter).await?;
    Ok(Json(Paginated::new(students, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDetails),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentDetails>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(StudentDetails::from_record(
        student,
        &state.upload_store,
    )))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentDto,
    responses(
        (status = 200, description = "Student created"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StudentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::create_student(&state.db, dto).await?;
    Ok(Json(json!({ "message": "Student added" })))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentDto,
    responses(
        (status = 200, description = "Student updated"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<StudentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(json!({ "message": "Student updated successfully" })))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(json!({ "message": "Student data removed" })))
}
