use classhub_core::{PageQuery, UploadStore};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::service::AcademicsService;
use crate::modules::exam_results::model::{
    EXAM_RESULT_SORT_FIELDS, ExamOption, ExamResultDetails, ExamResultDto, ExamResultEntry,
    PUBLISHING_SORT_FIELDS, PublishDto, PublishEntry, ResultEntrySheet, StudentOption,
    SubjectForResult,
};
use crate::modules::exams::service::ExamService;
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;
use crate::utils::validate::Violations;

pub struct ExamResultService;

impl ExamResultService {
    /// One consistent snapshot of everything a result-entry sheet needs:
    /// the class's active exams, its students, and (when an exam is chosen)
    /// the routine subjects with full marks.
    #[instrument(skip(db))]
    pub async fn get_entry_sheet(
        db: &PgPool,
        class_id: i64,
        exam_id: Option<i64>,
    ) -> Result<ResultEntrySheet, AppError> {
        let mut tx = db.begin().await?;

        let exams = sqlx::query_as::<_, ExamOption>(
            "SELECT id, exam_name FROM exams WHERE status = 'ACTIVE' AND class_id = $1 ORDER BY id",
        )
        .bind(class_id)
        .fetch_all(&mut *tx)
        .await?;

        let students = sqlx::query_as::<_, StudentOption>(
            "SELECT id, name, roll FROM students WHERE class_id = $1 ORDER BY roll",
        )
        .bind(class_id)
        .fetch_all(&mut *tx)
        .await?;

        let subjects = match exam_id {
            Some(exam_id) => {
                sqlx::query_as::<_, SubjectForResult>(
                    "SELECT s.id, s.name, s.code, r.full_mark \
                     FROM exam_routines r \
                     JOIN subjects s ON s.id = r.subject_id \
                     WHERE r.exam_id = $1 ORDER BY r.start_time",
                )
                .bind(exam_id)
                .fetch_all(&mut *tx)
                .await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;

        Ok(ResultEntrySheet {
            students,
            exams,
            subjects,
        })
    }

    /// The class's exams for the results screen dropdown.
    #[instrument(skip(db))]
    pub async fn get_class_exams(db: &PgPool, class_id: i64) -> Result<Vec<ExamOption>, AppError> {
        let exams = sqlx::query_as::<_, ExamOption>(
            "SELECT id, exam_name FROM exams WHERE class_id = $1 ORDER BY id",
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(exams)
    }

    /// Filtered result page plus the matching total, in one transaction.
    /// The count query shares the page query's joins and predicate.
    #[instrument(skip(db))]
    pub async fn get_results(
        db: &PgPool,
        page: &PageQuery,
        class_id: Option<i64>,
        section_id: Option<i64>,
        exam_id: Option<i64>,
        student_roll: Option<i64>,
    ) -> Result<(Vec<ExamResultEntry>, i64), AppError> {
        let mut conditions = Vec::new();
        let mut n = 0;
        if class_id.is_some() {
            n += 1;
            conditions.push(format!("er.class_id = ${n}"));
        }
        if section_id.is_some() {
            n += 1;
            conditions.push(format!("s.section_id = ${n}"));
        }
        if exam_id.is_some() {
            n += 1;
            conditions.push(format!("er.exam_id = ${n}"));
        }
        if student_roll.is_some() {
            n += 1;
            conditions.push(format!("s.roll = ${n}"));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let joins = "FROM exam_results er \
             JOIN classes c ON c.id = er.class_id \
             JOIN students s ON s.id = er.student_id";

        let data_sql = format!(
            "SELECT er.id, c.class_name, s.name AS student_name, s.roll AS student_roll, \
                    er.subjects_marks \
             {joins}{where_clause} ORDER BY er.{} LIMIT {} OFFSET {}",
            page.order_clause(EXAM_RESULT_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) {joins}{where_clause}");

        let mut data_query = sqlx::query_as::<_, ExamResultEntry>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in [class_id, section_id, exam_id, student_roll].into_iter().flatten() {
            data_query = data_query.bind(value);
            count_query = count_query.bind(value);
        }

        let mut tx = db.begin().await?;

        let results = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((results, total))
    }

    /// Existence check first, then the nested fetch, flattened into one
    /// object. `exam_date` is the earliest routine start.
    #[instrument(skip(db, store))]
    pub async fn get_result_details(
        db: &PgPool,
        store: &UploadStore,
        id: i32,
    ) -> Result<ExamResultDetails, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM exam_results WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No result found")));
        }

        let mut details = sqlx::query_as::<_, ExamResultDetails>(
            "SELECT er.id, er.exam_id, e.exam_name, \
                    (SELECT MIN(r.start_time) FROM exam_routines r WHERE r.exam_id = er.exam_id) \
                        AS exam_date, \
                    s.profile_img, er.class_id, c.class_name, \
                    s.name AS student_name, s.roll AS student_roll, \
                    er.subjects_marks, er.created_at, er.updated_at \
             FROM exam_results er \
             JOIN exams e ON e.id = er.exam_id \
             JOIN classes c ON c.id = er.class_id \
             JOIN students s ON s.id = er.student_id \
             WHERE er.id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        details.profile_img = details
            .profile_img
            .and_then(|img| store.link(&format!("students/profiles/{}", img)).ok());

        Ok(details)
    }

    /// Referenced exam, class, and student must exist.
    async fn check_references(db: &PgPool, dto: &ExamResultDto) -> Result<(), AppError> {
        let mut violations = Violations::new();

        if !ExamService::exists(db, dto.exam_id).await? {
            violations.add("exam_id", "Exam does not exist");
        }
        if !AcademicsService::class_exists(db, dto.class_id).await? {
            violations.add("class_id", "Class does not exist");
        }
        if !StudentService::exists(db, dto.student_id).await? {
            violations.add("student_id", "Student does not exist");
        }

        violations.into_result()
    }

    #[instrument(skip(db, dto))]
    pub async fn create_result(db: &PgPool, dto: ExamResultDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        sqlx::query(
            "INSERT INTO exam_results (exam_id, class_id, student_id, subjects_marks) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(dto.exam_id)
        .bind(dto.class_id)
        .bind(dto.student_id)
        .bind(&dto.subjects_marks)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_result(db: &PgPool, id: i32, dto: ExamResultDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM exam_results WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No result found")));
        }

        sqlx::query(
            "UPDATE exam_results SET exam_id = $1, class_id = $2, student_id = $3, \
             subjects_marks = $4, updated_at = now() WHERE id = $5",
        )
        .bind(dto.exam_id)
        .bind(dto.class_id)
        .bind(dto.student_id)
        .bind(&dto.subjects_marks)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Publishing queue page plus its total, in one transaction.
    #[instrument(skip(db))]
    pub async fn get_publishing(
        db: &PgPool,
        page: &PageQuery,
    ) -> Result<(Vec<PublishEntry>, i64), AppError> {
        let data_sql = format!(
            "SELECT p.id, p.status, e.exam_name, \
                    (SELECT MIN(r.start_time) FROM exam_routines r WHERE r.exam_id = p.exam_id) \
                        AS exam_date, \
                    p.created_at, p.updated_at \
             FROM exam_results_publishing p \
             JOIN exams e ON e.id = p.exam_id \
             ORDER BY p.{} LIMIT {} OFFSET {}",
            page.order_clause(PUBLISHING_SORT_FIELDS),
            page.limit(),
            page.skip()
        );

        let mut tx = db.begin().await?;

        let entries = sqlx::query_as::<_, PublishEntry>(&data_sql)
            .fetch_all(&mut *tx)
            .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exam_results_publishing")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((entries, total))
    }

    #[instrument(skip(db))]
    pub async fn publish_result(db: &PgPool, id: i32, dto: PublishDto) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing =
            sqlx::query_scalar::<_, i32>("SELECT id FROM exam_results_publishing WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Publishable result not found"
            )));
        }

        sqlx::query(
            "UPDATE exam_results_publishing SET status = $1, updated_at = now() WHERE id = $2",
        )
        .bind(dto.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
