use chrono::{DateTime, Utc};
use classhub_core::coerce::lenient_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Sortable columns for result lists (prefixed with the results table alias
/// by the service).
pub const EXAM_RESULT_SORT_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Sortable columns for the publishing list.
pub const PUBLISHING_SORT_FIELDS: &[&str] = &["id", "status", "created_at", "updated_at"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "publish_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PublishStatus {
    Published,
    Unpublished,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExamResultFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub section_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub exam_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub student_roll: Option<i64>,
}

/// Exam dropdown option: id plus display name.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamOption {
    pub id: i32,
    pub exam_name: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StudentOption {
    pub id: i32,
    pub name: String,
    pub roll: i32,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct SubjectForResult {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub full_mark: i32,
}

/// Everything a result-entry form needs for one class, read as one
/// consistent snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultEntrySheet {
    pub students: Vec<StudentOption>,
    pub exams: Vec<ExamOption>,
    pub subjects: Vec<SubjectForResult>,
}

/// Flattened list row: result joined with class and student.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamResultEntry {
    pub id: i32,
    pub class_name: String,
    pub student_name: String,
    pub student_roll: i32,
    #[schema(value_type = Object)]
    pub subjects_marks: serde_json::Value,
}

/// List payload: the filtered result page plus the class's exams when a
/// class filter was given.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExamResultsData {
    pub exams: Vec<ExamOption>,
    pub results: Vec<ExamResultEntry>,
}

/// Detail response flattened from result, exam, class, and student.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamResultDetails {
    pub id: i32,
    pub exam_id: i32,
    pub exam_name: String,
    pub exam_date: Option<DateTime<Utc>>,
    pub profile_img: Option<String>,
    pub class_id: i32,
    pub class_name: String,
    pub student_name: String,
    pub student_roll: i32,
    #[schema(value_type = Object)]
    pub subjects_marks: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ExamResultDto {
    pub exam_id: i32,
    pub class_id: i32,
    pub student_id: i32,
    /// Per-subject marks, stored as JSON
    #[schema(value_type = Object)]
    pub subjects_marks: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PublishDto {
    pub status: PublishStatus,
}

/// Publishing list row.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PublishEntry {
    pub id: i32,
    pub status: PublishStatus,
    pub exam_name: String,
    pub exam_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
