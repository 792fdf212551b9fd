use chrono::{DateTime, Utc};
use classhub_core::UploadStore;
use classhub_core::coerce::lenient_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Sortable columns for assignment lists.
pub const HOMEWORK_SORT_FIELDS: &[&str] = &[
    "id",
    "title",
    "assignment_time",
    "submission_time",
    "status",
    "created_at",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assignment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignmentStatus {
    Active,
    Draft,
    Cancelled,
    Concluded,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub subject_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub assignment_time: DateTime<Utc>,
    pub submission_time: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail response with the attachment expanded to a download link.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentDetails {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub attachment_link: Option<String>,
}

impl AssignmentDetails {
    pub fn from_record(assignment: Assignment, store: &UploadStore) -> Self {
        let attachment_link = assignment
            .attachment
            .as_ref()
            .and_then(|file| store.link(&format!("assignments/{}", file)).ok());

        Self {
            assignment,
            attachment_link,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HomeworkListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub section_id: Option<i64>,
}

fn assignment_time_in_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > Utc::now() {
        Ok(())
    } else {
        let mut err = ValidationError::new("future");
        err.message = Some("Assignment time must be in the future".into());
        Err(err)
    }
}

fn submission_time_in_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > Utc::now() {
        Ok(())
    } else {
        let mut err = ValidationError::new("future");
        err.message = Some("Submission time must be in the future".into());
        Err(err)
    }
}

/// Create/update payload for an assignment.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignmentDto {
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub subject_id: i32,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// Stored attachment key returned by the upload endpoint
    pub attachment: Option<String>,
    #[validate(custom(function = assignment_time_in_future))]
    pub assignment_time: DateTime<Utc>,
    #[validate(custom(function = submission_time_in_future))]
    pub submission_time: DateTime<Utc>,
    pub status: AssignmentStatus,
}

/// One assignment as a student sees it: their class's (and section's)
/// assignments with the student's own submission state joined on.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StudentHomework {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assignment_time: DateTime<Utc>,
    pub submission_time: DateTime<Utc>,
    pub status: AssignmentStatus,
    /// When the student submitted, if they have
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A submission row joined with its assignment, for the submitted list.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct SubmittedHomework {
    pub id: i32,
    pub assignment_id: i32,
    pub title: String,
    pub submitted_at: DateTime<Utc>,
}

/// One submission flattened with its assignment; both attachments are
/// expanded to download links.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct SubmissionDetails {
    pub id: i32,
    pub assignment_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub assignment_attachment: Option<String>,
    pub assignment_time: DateTime<Utc>,
    pub submission_time: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_dto() -> AssignmentDto {
        AssignmentDto {
            class_id: 1,
            section_id: None,
            subject_id: 2,
            title: "Chapter 4 problems".to_string(),
            description: Some("Solve all exercises".to_string()),
            attachment: None,
            assignment_time: Utc::now() + Duration::hours(1),
            submission_time: Utc::now() + Duration::days(7),
            status: AssignmentStatus::Active,
        }
    }

    #[test]
    fn test_valid_assignment_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_past_assignment_time_is_rejected_with_message() {
        let dto = AssignmentDto {
            assignment_time: Utc::now() - Duration::hours(1),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        let field_errors = errors.field_errors();
        let violations = field_errors.get("assignment_time").unwrap();
        assert_eq!(
            violations[0].message.as_deref(),
            Some("Assignment time must be in the future")
        );
    }

    #[test]
    fn test_past_times_and_empty_title_all_reported() {
        let dto = AssignmentDto {
            title: "".to_string(),
            assignment_time: Utc::now() - Duration::hours(2),
            submission_time: Utc::now() - Duration::hours(1),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_status_wire_format() {
        let status: AssignmentStatus = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert_eq!(status, AssignmentStatus::Cancelled);
        assert!(serde_json::from_str::<AssignmentStatus>(r#""PAUSED""#).is_err());
    }
}
