use classhub_core::{PageQuery, UploadStore};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::service::AcademicsService;
use crate::modules::homework::model::{
    Assignment, AssignmentDetails, AssignmentDto, HOMEWORK_SORT_FIELDS, StudentHomework,
    SubmissionDetails, SubmittedHomework,
};
use crate::utils::errors::AppError;
use crate::utils::validate::Violations;

const ASSIGNMENT_COLUMNS: &str = "id, class_id, section_id, subject_id, title, description, \
     attachment, assignment_time, submission_time, status, created_at, updated_at";

pub struct HomeworkService;

impl HomeworkService {
    #[instrument(skip(db))]
    pub async fn get_assignments(
        db: &PgPool,
        page: &PageQuery,
        class_id: Option<i64>,
        section_id: Option<i64>,
    ) -> Result<(Vec<Assignment>, i64), AppError> {
        let mut conditions = Vec::new();
        let mut n = 0;
        if class_id.is_some() {
            n += 1;
            conditions.push(format!("class_id = ${n}"));
        }
        if section_id.is_some() {
            n += 1;
            conditions.push(format!("section_id = ${n}"));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let data_sql = format!(
            "SELECT {} FROM assignments{} ORDER BY {} LIMIT {} OFFSET {}",
            ASSIGNMENT_COLUMNS,
            where_clause,
            page.order_clause(HOMEWORK_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) FROM assignments{}", where_clause);

        let mut data_query = sqlx::query_as::<_, Assignment>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in [class_id, section_id].into_iter().flatten() {
            data_query = data_query.bind(value);
            count_query = count_query.bind(value);
        }

        let mut tx = db.begin().await?;

        let assignments = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((assignments, total))
    }

    #[instrument(skip(db, store))]
    pub async fn get_assignment(
        db: &PgPool,
        store: &UploadStore,
        id: i32,
    ) -> Result<AssignmentDetails, AppError> {
        let sql = format!("SELECT {} FROM assignments WHERE id = $1", ASSIGNMENT_COLUMNS);

        let assignment = sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No assignment found")))?;

        Ok(AssignmentDetails::from_record(assignment, store))
    }

    /// Assignments visible to one student (their class, section-wide ones
    /// included) with the student's submission state joined on.
    #[instrument(skip(db))]
    pub async fn get_student_homeworks(
        db: &PgPool,
        student_id: i32,
    ) -> Result<Vec<StudentHomework>, AppError> {
        let mut tx = db.begin().await?;

        let student = sqlx::query_as::<_, (i32, Option<i32>)>(
            "SELECT class_id, section_id FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No student found")))?;

        let homeworks = sqlx::query_as::<_, StudentHomework>(
            "SELECT a.id, a.subject_id, a.title, a.description, a.assignment_time, \
                    a.submission_time, a.status, hs.submitted_at \
             FROM assignments a \
             LEFT JOIN homework_submissions hs \
               ON hs.assignment_id = a.id AND hs.student_id = $1 \
             WHERE a.class_id = $2 AND (a.section_id IS NULL OR a.section_id = $3) \
             ORDER BY a.assignment_time DESC",
        )
        .bind(student_id)
        .bind(student.0)
        .bind(student.1)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(homeworks)
    }

    /// The student's submissions joined with their assignments.
    #[instrument(skip(db))]
    pub async fn get_submitted_homeworks(
        db: &PgPool,
        student_id: i32,
    ) -> Result<Vec<SubmittedHomework>, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM students WHERE id = $1")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No student found")));
        }

        let submitted = sqlx::query_as::<_, SubmittedHomework>(
            "SELECT hs.id, hs.assignment_id, a.title, hs.submitted_at \
             FROM homework_submissions hs \
             JOIN assignments a ON a.id = hs.assignment_id \
             WHERE hs.student_id = $1 \
             ORDER BY hs.submitted_at DESC",
        )
        .bind(student_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(submitted)
    }

    /// One submission flattened with its assignment; submission rows are
    /// read-only on this surface.
    #[instrument(skip(db, store))]
    pub async fn get_submission_details(
        db: &PgPool,
        store: &UploadStore,
        student_id: i32,
        homework_id: i32,
    ) -> Result<SubmissionDetails, AppError> {
        let mut details = sqlx::query_as::<_, SubmissionDetails>(
            "SELECT hs.id, hs.assignment_id, a.title, a.description, \
                    hs.attachment, a.attachment AS assignment_attachment, \
                    a.assignment_time, a.submission_time, a.status, hs.submitted_at \
             FROM homework_submissions hs \
             JOIN assignments a ON a.id = hs.assignment_id \
             WHERE hs.student_id = $1 AND hs.assignment_id = $2",
        )
        .bind(student_id)
        .bind(homework_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No submission found")))?;

        details.attachment = details
            .attachment
            .and_then(|file| store.link(&format!("submissions/{}", file)).ok());
        details.assignment_attachment = details
            .assignment_attachment
            .and_then(|file| store.link(&format!("assignments/{}", file)).ok());

        Ok(details)
    }

    /// Class required, section optional, subject required; all reported
    /// together.
    async fn check_references(db: &PgPool, dto: &AssignmentDto) -> Result<(), AppError> {
        let mut violations = Violations::new();

        if !AcademicsService::class_exists(db, dto.class_id).await? {
            violations.add("class_id", "Class does not exist");
        }
        if let Some(section_id) = dto.section_id
            && !AcademicsService::section_exists(db, section_id).await?
        {
            violations.add("section_id", "Section does not exist");
        }
        if !AcademicsService::subject_exists(db, dto.subject_id).await? {
            violations.add("subject_id", "Subject does not exist");
        }

        violations.into_result()
    }

    #[instrument(skip(db, dto))]
    pub async fn create_assignment(db: &PgPool, dto: AssignmentDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        sqlx::query(
            "INSERT INTO assignments \
             (class_id, section_id, subject_id, title, description, attachment, \
              assignment_time, submission_time, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(dto.subject_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.attachment)
        .bind(dto.assignment_time)
        .bind(dto.submission_time)
        .bind(dto.status)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_assignment(
        db: &PgPool,
        id: i32,
        dto: AssignmentDto,
    ) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No assignment found")));
        }

        sqlx::query(
            "UPDATE assignments SET class_id = $1, section_id = $2, subject_id = $3, \
             title = $4, description = $5, attachment = $6, assignment_time = $7, \
             submission_time = $8, status = $9, updated_at = now() \
             WHERE id = $10",
        )
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(dto.subject_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.attachment)
        .bind(dto.assignment_time)
        .bind(dto.submission_time)
        .bind(dto.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(db: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No assignment found")));
        }

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
