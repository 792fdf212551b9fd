use axum::{
    Json,
    extract::{Path, Query, State},
};
use classhub_core::{PageQuery, Paginated};
use serde_json::json;
use tracing::instrument;

use crate::modules::attendance::model::{
    AttendanceDateFilter, CalendarEvent, CreateAttendanceDto, RosterEntry,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validate::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/attendance/teachers",
    params(PageQuery, AttendanceDateFilter),
    responses(
        (status = 200, description = "Teacher roster with marks for the requested day"),
        (status = 400, description = "Date missing"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_roster(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<AttendanceDateFilter>,
) -> Result<Json<Paginated<RosterEntry>>, AppError> {
    let date = filter
        .date
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Date is required")))?;

    let (entries, total) =
        AttendanceService::get_roster(&state.db, &state.upload_store, &page, date).await?;
    Ok(Json(Paginated::new(entries, page.meta(total))))
}

#[utoipa::path(
    get,
    path = "/api/attendance/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Attendance history as calendar events", body = [CalendarEvent]),
        (status = 404, description = "Teacher not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_teacher_attendance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let events = AttendanceService::get_teacher_attendance(&state.db, id).await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/attendance/teachers",
    request_body = CreateAttendanceDto,
    responses(
        (status = 200, description = "Attendance recorded or updated"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn record_attendance(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let message = AttendanceService::record_attendance(&state.db, dto).await?;
    Ok(Json(json!({ "message": message })))
}
