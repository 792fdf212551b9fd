use chrono::{DateTime, NaiveDate, Utc};
use classhub_core::UploadStore;
use classhub_core::coerce::lenient_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::modules::teachers::model::validate_gender;
use crate::utils::format::format_date;

/// Sortable columns for student lists.
pub const STUDENT_SORT_FIELDS: &[&str] = &["id", "name", "roll", "admission_date", "created_at"];

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub roll: i32,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub admission_date: NaiveDate,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail response with display dates and an expanded profile link.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetails {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub roll: i32,
    pub gender: String,
    pub date_of_birth: String,
    pub admission_date: String,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentDetails {
    pub fn from_record(student: Student, store: &UploadStore) -> Self {
        let profile_img = student
            .profile_img
            .and_then(|img| store.link(&format!("students/profiles/{}", img)).ok());

        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            roll: student.roll,
            gender: student.gender,
            date_of_birth: format_date(student.date_of_birth),
            admission_date: format_date(student.admission_date),
            class_id: student.class_id,
            section_id: student.section_id,
            profile_img,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// List filters recognized for students; everything else in the query
/// string is dropped.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub roll: Option<i64>,
    pub gender: Option<String>,
}

/// Create/update payload; updates replace the whole record.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StudentDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(range(min = 1, message = "Roll must be a positive number"))]
    pub roll: i32,
    #[validate(custom(function = validate_gender))]
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub admission_date: NaiveDate,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub profile_img: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_only_recognized_keys() {
        let filter: StudentListFilter =
            serde_urlencoded::from_str("class_id=2&roll=11&gender=MALE&admin=true&q=x").unwrap();
        assert_eq!(filter.class_id, Some(2));
        assert_eq!(filter.roll, Some(11));
        assert_eq!(filter.gender.as_deref(), Some("MALE"));
    }

    #[test]
    fn test_malformed_numeric_filters_are_dropped() {
        let filter: StudentListFilter =
            serde_urlencoded::from_str("class_id=two&roll=eleven").unwrap();
        assert_eq!(filter.class_id, None);
        assert_eq!(filter.roll, None);
    }

    #[test]
    fn test_dto_collects_all_violations() {
        let dto = StudentDto {
            name: "".to_string(),
            email: "bad".to_string(),
            password: "short".to_string(),
            roll: 0,
            gender: "X".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2012, 3, 3).unwrap(),
            admission_date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
            class_id: 1,
            section_id: None,
            profile_img: None,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 5);
    }
}
