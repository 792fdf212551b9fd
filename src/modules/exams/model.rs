use chrono::{DateTime, Utc};
use classhub_core::coerce::lenient_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Sortable columns for exam lists.
pub const EXAM_SORT_FIELDS: &[&str] = &["id", "exam_name", "status", "created_at"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "exam_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamStatus {
    Active,
    Concluded,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: i32,
    pub exam_name: String,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub status: ExamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamRoutine {
    pub id: i32,
    pub exam_id: i32,
    pub subject_id: i32,
    pub full_mark: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Detail response: the exam plus its routine, ordered by start time.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExamDetails {
    #[serde(flatten)]
    pub exam: Exam,
    pub routines: Vec<ExamRoutine>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExamListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub section_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExamRoutineDto {
    pub subject_id: i32,
    pub full_mark: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Create/update payload; routines are written atomically with the exam and
/// checked alongside the existence lookups in the service.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ExamDto {
    #[validate(length(min = 1, message = "Exam name is required"))]
    pub exam_name: String,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub status: ExamStatus,
    #[serde(default)]
    pub routines: Vec<ExamRoutineDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine(full_mark: i32) -> ExamRoutineDto {
        ExamRoutineDto {
            subject_id: 1,
            full_mark,
            start_time: Utc::now(),
            end_time: Utc::now(),
        }
    }

    #[test]
    fn test_empty_exam_name_is_rejected() {
        let dto = ExamDto {
            exam_name: "".to_string(),
            class_id: 1,
            section_id: None,
            status: ExamStatus::Active,
            routines: vec![routine(100)],
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("exam_name"));
    }

    #[test]
    fn test_routines_default_to_empty() {
        let dto: ExamDto = serde_json::from_value(serde_json::json!({
            "exam_name": "First Term",
            "class_id": 1,
            "status": "ACTIVE"
        }))
        .unwrap();
        assert!(dto.routines.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_filter_drops_unknown_keys() {
        let filter: ExamListFilter =
            serde_urlencoded::from_str("class_id=4&section_id=2&year=2024").unwrap();
        assert_eq!(filter.class_id, Some(4));
        assert_eq!(filter.section_id, Some(2));
    }
}
