use classhub_core::PageQuery;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::service::AcademicsService;
use crate::modules::exams::model::{
    EXAM_SORT_FIELDS, Exam, ExamDetails, ExamDto, ExamRoutine, ExamRoutineDto,
};
use crate::utils::errors::AppError;
use crate::utils::validate::Violations;

const EXAM_COLUMNS: &str = "id, exam_name, class_id, section_id, status, created_at, updated_at";

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db))]
    pub async fn get_exams(
        db: &PgPool,
        page: &PageQuery,
        class_id: Option<i64>,
        section_id: Option<i64>,
    ) -> Result<(Vec<Exam>, i64), AppError> {
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
            "SELECT {} FROM exams{} ORDER BY {} LIMIT {} OFFSET {}",
            EXAM_COLUMNS,
            where_clause,
            page.order_clause(EXAM_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) FROM exams{}", where_clause);

        let mut data_query = sqlx::query_as::<_, Exam>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(class_id) = class_id {
            data_query = data_query.bind(class_id);
            count_query = count_query.bind(class_id);
        }
        if let Some(section_id) = section_id {
            data_query = data_query.bind(section_id);
            count_query = count_query.bind(section_id);
        }

        let mut tx = db.begin().await?;

        let exams = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((exams, total))
    }

    #[instrument(skip(db))]
    pub async fn get_exam(db: &PgPool, id: i32) -> Result<ExamDetails, AppError> {
        let sql = format!("SELECT {} FROM exams WHERE id = $1", EXAM_COLUMNS);

        let mut tx = db.begin().await?;

        let exam = sqlx::query_as::<_, Exam>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No exam found")))?;

        let routines = sqlx::query_as::<_, ExamRoutine>(
            "SELECT id, exam_id, subject_id, full_mark, start_time, end_time \
             FROM exam_routines WHERE exam_id = $1 ORDER BY start_time",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ExamDetails { exam, routines })
    }

    pub async fn exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM exams WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    /// Class, optional section, and every routine subject must exist.
    async fn check_references(db: &PgPool, dto: &ExamDto) -> Result<(), AppError> {
        let mut violations = Violations::new();

        if !AcademicsService::class_exists(db, dto.class_id).await? {
            violations.add("class_id", "Class does not exist");
        }
        if let Some(section_id) = dto.section_id
            && !AcademicsService::section_exists(db, section_id).await?
        {
            violations.add("section_id", "Section does not exist");
        }
        for routine in &dto.routines {
            if !AcademicsService::subject_exists(db, routine.subject_id).await? {
                violations.add("subject_id", "Subject does not exist");
            }
            if routine.full_mark < 1 {
                violations.add("full_mark", "Full mark must be a positive number");
            }
        }

        violations.into_result()
    }

    async fn insert_routines(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        exam_id: i32,
        routines: &[ExamRoutineDto],
    ) -> Result<(), AppError> {
        for routine in routines {
            sqlx::query(
                "INSERT INTO exam_routines (exam_id, subject_id, full_mark, start_time, end_time) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(exam_id)
            .bind(routine.subject_id)
            .bind(routine.full_mark)
            .bind(routine.start_time)
            .bind(routine.end_time)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Inserts the exam and its routine rows atomically.
    #[instrument(skip(db, dto))]
    pub async fn create_exam(db: &PgPool, dto: ExamDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        let mut tx = db.begin().await?;

        let exam_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO exams (exam_name, class_id, section_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&dto.exam_name)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(dto.status)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_routines(&mut tx, exam_id, &dto.routines).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Replaces the exam and its routine rows atomically.
    #[instrument(skip(db, dto))]
    pub async fn update_exam(db: &PgPool, id: i32, dto: ExamDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM exams WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No exam found")));
        }

        sqlx::query(
            "UPDATE exams SET exam_name = $1, class_id = $2, section_id = $3, status = $4, \
             updated_at = now() WHERE id = $5",
        )
        .bind(&dto.exam_name)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(dto.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if !dto.routines.is_empty() {
            sqlx::query("DELETE FROM exam_routines WHERE exam_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_routines(&mut tx, id, &dto.routines).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM exams WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No exam found")));
        }

        sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
