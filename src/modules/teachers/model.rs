//! Teacher models and DTOs.
//!
//! The stored `password` column never appears in a response type; detail
//! responses carry display-formatted dates and a download link for the
//! profile image.

use chrono::{DateTime, NaiveDate, Utc};
use classhub_core::UploadStore;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::utils::format::format_date;

/// Sortable columns for teacher lists.
pub const TEACHER_SORT_FIELDS: &[&str] =
    &["id", "name", "designation", "joining_date", "created_at"];

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub designation: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub joining_date: NaiveDate,
    pub phone_number: String,
    pub address: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail response with display dates and an expanded profile link.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherDetails {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub designation: String,
    pub gender: String,
    pub date_of_birth: String,
    pub joining_date: String,
    pub phone_number: String,
    pub address: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeacherDetails {
    pub fn from_record(teacher: Teacher, store: &UploadStore) -> Self {
        let profile_img = teacher
            .profile_img
            .and_then(|img| store.link(&format!("teachers/profiles/{}", img)).ok());

        Self {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            designation: teacher.designation,
            gender: teacher.gender,
            date_of_birth: format_date(teacher.date_of_birth),
            joining_date: format_date(teacher.joining_date),
            phone_number: teacher.phone_number,
            address: teacher.address,
            profile_img,
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        }
    }
}

pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender {
        "MALE" | "FEMALE" | "OTHER" => Ok(()),
        _ => {
            let mut err = ValidationError::new("one_of");
            err.message = Some("Gender must be one of MALE, FEMALE, OTHER".into());
            Err(err)
        }
    }
}

/// Create/update payload; updates replace the whole record.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeacherDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Designation is required"))]
    pub designation: String,
    #[validate(custom(function = validate_gender))]
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub joining_date: NaiveDate,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub profile_img: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_dto() -> TeacherDto {
        TeacherDto {
            name: "Rukhsana Ahmed".to_string(),
            email: "rukhsana@school.example".to_string(),
            password: "a-long-password".to_string(),
            designation: "Senior Teacher".to_string(),
            gender: "FEMALE".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            joining_date: NaiveDate::from_ymd_opt(2015, 1, 6).unwrap(),
            phone_number: "01700000000".to_string(),
            address: "12 School Road".to_string(),
            profile_img: None,
        }
    }

    #[test]
    fn test_valid_dto_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let dto = TeacherDto {
            name: "".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            gender: "UNKNOWN".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 4);
    }

    #[test]
    fn test_gender_enum() {
        assert!(validate_gender("MALE").is_ok());
        assert!(validate_gender("male").is_err());
        assert!(validate_gender("N/A").is_err());
    }

    #[test]
    fn test_details_strip_password_and_format_dates() {
        let store = UploadStore::new(
            PathBuf::from("./uploads"),
            "http://localhost:3000/uploads".to_string(),
        );
        let teacher = Teacher {
            id: 1,
            name: "Rukhsana Ahmed".to_string(),
            email: "rukhsana@school.example".to_string(),
            designation: "Senior Teacher".to_string(),
            gender: "FEMALE".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            joining_date: NaiveDate::from_ymd_opt(2015, 1, 6).unwrap(),
            phone_number: "01700000000".to_string(),
            address: "12 School Road".to_string(),
            profile_img: Some("rukhsana.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let details = TeacherDetails::from_record(teacher, &store);
        assert_eq!(details.date_of_birth, "1985-04-12");
        assert_eq!(details.joining_date, "2015-01-06");
        assert_eq!(
            details.profile_img.as_deref(),
            Some("http://localhost:3000/uploads/teachers/profiles/rukhsana.png")
        );

        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("password").is_none());
    }
}
