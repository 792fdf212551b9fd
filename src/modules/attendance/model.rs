use chrono::NaiveDate;
use classhub_core::UploadStore;
use classhub_core::coerce::lenient_date;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::format::{format_calendar_date, format_date};

/// Sortable columns for the attendance roster (teacher columns).
pub const ATTENDANCE_SORT_FIELDS: &[&str] = &["id", "name", "designation"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "attendance_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceDateFilter {
    /// The roster day, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_date")]
    #[param(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

/// Raw roster row: one teacher LEFT-JOINed with that day's attendance.
#[derive(Debug, FromRow)]
pub struct RosterRow {
    pub id: i32,
    pub name: String,
    pub profile_img: Option<String>,
    pub designation: String,
    pub attendance_teacher_id: Option<i32>,
    pub attendance_status: Option<AttendanceStatus>,
    pub attendance_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceMark {
    pub teacher_id: i32,
    pub status: AttendanceStatus,
    pub date: String,
}

/// One roster entry: the teacher plus their mark for the requested day, if
/// any.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntry {
    pub id: i32,
    pub name: String,
    pub profile_img: Option<String>,
    pub designation: String,
    pub attendance: Option<AttendanceMark>,
}

impl RosterEntry {
    pub fn from_row(row: RosterRow, store: &UploadStore) -> Self {
        let attendance = match (row.attendance_teacher_id, row.attendance_status, row.attendance_date)
        {
            (Some(teacher_id), Some(status), Some(date)) => Some(AttendanceMark {
                teacher_id,
                status,
                date: format_date(date),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            profile_img: row
                .profile_img
                .and_then(|img| store.link(&format!("teachers/profiles/{}", img)).ok()),
            designation: row.designation,
            attendance,
        }
    }
}

/// Attendance history entry shaped for calendar widgets.
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarEvent {
    pub title: AttendanceStatus,
    pub start: String,
    pub end: String,
}

impl CalendarEvent {
    pub fn new(status: AttendanceStatus, date: NaiveDate) -> Self {
        let day = format_calendar_date(date);
        Self {
            title: status,
            start: day.clone(),
            end: day,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAttendanceDto {
    #[validate(range(min = 1, message = "Teacher id must be a positive number"))]
    pub teacher_id: i32,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&AttendanceStatus::Present).unwrap();
        assert_eq!(json, r#""PRESENT""#);
        let parsed: AttendanceStatus = serde_json::from_str(r#""LATE""#).unwrap();
        assert_eq!(parsed, AttendanceStatus::Late);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>(r#""ON_LEAVE""#).is_err());
    }

    #[test]
    fn test_calendar_event_spans_one_day() {
        let event = CalendarEvent::new(
            AttendanceStatus::Absent,
            NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
        );
        assert_eq!(event.start, "2024, 9, 3");
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn test_date_filter_is_lenient() {
        let filter: AttendanceDateFilter = serde_urlencoded::from_str("date=2024-09-03").unwrap();
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 9, 3));

        let filter: AttendanceDateFilter = serde_urlencoded::from_str("date=yesterday").unwrap();
        assert_eq!(filter.date, None);
    }
}
