use chrono::NaiveDate;
use classhub_core::{PageQuery, UploadStore};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::attendance::model::{
    ATTENDANCE_SORT_FIELDS, AttendanceStatus, CalendarEvent, CreateAttendanceDto, RosterEntry,
    RosterRow,
};
use crate::modules::teachers::service::TeacherService;
use crate::utils::errors::AppError;
use crate::utils::validate::Violations;

pub struct AttendanceService;

impl AttendanceService {
    /// One day's roster: a page of teachers joined with that day's marks,
    /// plus the total teacher count, read in one transaction.
    #[instrument(skip(db, store))]
    pub async fn get_roster(
        db: &PgPool,
        store: &UploadStore,
        page: &PageQuery,
        date: NaiveDate,
    ) -> Result<(Vec<RosterEntry>, i64), AppError> {
        let data_sql = format!(
            "SELECT t.id, t.name, t.profile_img, t.designation, \
                    a.teacher_id AS attendance_teacher_id, \
                    a.status AS attendance_status, \
                    a.date AS attendance_date \
             FROM teachers t \
             LEFT JOIN teacher_attendance a ON a.teacher_id = t.id AND a.date = $1 \
             ORDER BY t.{} LIMIT {} OFFSET {}",
            page.order_clause(ATTENDANCE_SORT_FIELDS),
            page.limit(),
            page.skip()
        );

        let mut tx = db.begin().await?;

        let rows = sqlx::query_as::<_, RosterRow>(&data_sql)
            .bind(date)
            .fetch_all(&mut *tx)
            .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let entries = rows
            .into_iter()
            .map(|row| RosterEntry::from_row(row, store))
            .collect();

        Ok((entries, total))
    }

    /// A teacher's full attendance history as calendar events.
    #[instrument(skip(db))]
    pub async fn get_teacher_attendance(
        db: &PgPool,
        teacher_id: i32,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM teachers WHERE id = $1")
            .bind(teacher_id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No teacher found")));
        }

        let days = sqlx::query_as::<_, (AttendanceStatus, NaiveDate)>(
            "SELECT status, date FROM teacher_attendance WHERE teacher_id = $1 ORDER BY date",
        )
        .bind(teacher_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(days
            .into_iter()
            .map(|(status, date)| CalendarEvent::new(status, date))
            .collect())
    }

    /// Check-then-act upsert on the (teacher_id, date) natural key, inside
    /// one transaction; the UNIQUE constraint backs it under races.
    ///
    /// Returns the message for the client: updated vs freshly recorded.
    #[instrument(skip(db, dto))]
    pub async fn record_attendance(
        db: &PgPool,
        dto: CreateAttendanceDto,
    ) -> Result<&'static str, AppError> {
        let mut violations = Violations::new();
        if !TeacherService::exists(db, dto.teacher_id).await? {
            violations.add("teacher_id", "Teacher does not exist");
        }
        violations.into_result()?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM teacher_attendance WHERE teacher_id = $1 AND date = $2",
        )
        .bind(dto.teacher_id)
        .bind(dto.date)
        .fetch_optional(&mut *tx)
        .await?;

        let message = match existing {
            Some(id) => {
                sqlx::query(
                    "UPDATE teacher_attendance SET status = $1, updated_at = now() WHERE id = $2",
                )
                .bind(dto.status)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                "Attendance updated"
            }
            None => {
                sqlx::query(
                    "INSERT INTO teacher_attendance (teacher_id, status, date) VALUES ($1, $2, $3)",
                )
                .bind(dto.teacher_id)
                .bind(dto.status)
                .bind(dto.date)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e
                        && db_err.is_unique_violation()
                    {
                        return AppError::bad_request(anyhow::anyhow!(
                            "Attendance already recorded for this date"
                        ));
                    }
                    AppError::database(e)
                })?;

                "Done"
            }
        };

        tx.commit().await?;

        Ok(message)
    }
}
