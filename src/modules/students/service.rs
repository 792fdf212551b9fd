use classhub_core::PageQuery;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::service::AcademicsService;
use crate::modules::students::model::{STUDENT_SORT_FIELDS, Student, StudentDto, StudentListFilter};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;
use crate::utils::validate::Violations;

const STUDENT_COLUMNS: &str = "id, name, email, roll, gender, date_of_birth, admission_date, \
     class_id, section_id, profile_img, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        page: &PageQuery,
        filter: &StudentListFilter,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let mut conditions = Vec::new();
        let mut n = 0;
        if filter.class_id.is_some() {
            n += 1;
            conditions.push(format!("class_id = ${n}"));
        }
        if filter.roll.is_some() {
            n += 1;
            conditions.push(format!("roll = ${n}"));
        }
        if filter.gender.is_some() {
            n += 1;
            conditions.push(format!("gender = ${n}"));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let data_sql = format!(
            "SELECT {} FROM students{} ORDER BY {} LIMIT {} OFFSET {}",
            STUDENT_COLUMNS,
            where_clause,
            page.order_clause(STUDENT_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) FROM students{}", where_clause);

        let mut data_query = sqlx::query_as::<_, Student>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(class_id) = filter.class_id {
            data_query = data_query.bind(class_id);
            count_query = count_query.bind(class_id);
        }
        if let Some(roll) = filter.roll {
            data_query = data_query.bind(roll);
            count_query = count_query.bind(roll);
        }
        if let Some(gender) = &filter.gender {
            data_query = data_query.bind(gender);
            count_query = count_query.bind(gender);
        }

        let mut tx = db.begin().await?;

        let students = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: i32) -> Result<Student, AppError> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);

        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No student found")))?;

        Ok(student)
    }

    pub async fn exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    /// Referenced class and section must exist; failures are aggregated so
    /// the client sees every bad reference at once.
    async fn check_references(
        db: &PgPool,
        class_id: i32,
        section_id: Option<i32>,
    ) -> Result<(), AppError> {
        let mut violations = Violations::new();

        if !AcademicsService::class_exists(db, class_id).await? {
            violations.add("class_id", "Class does not exist");
        }
        if let Some(section_id) = section_id
            && !AcademicsService::section_exists(db, section_id).await?
        {
            violations.add("section_id", "Section does not exist");
        }

        violations.into_result()
    }

    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: StudentDto) -> Result<(), AppError> {
        Self::check_references(db, dto.class_id, dto.section_id).await?;

        let hashed_password = hash_password(&dto.password)?;

        sqlx::query(
            "INSERT INTO students \
             (name, email, password, roll, gender, date_of_birth, admission_date, class_id, \
              section_id, profile_img) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.roll)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(dto.admission_date)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(&dto.profile_img)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "A student with this email or roll already exists"
                ));
            }
            AppError::database(e)
        })?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(db: &PgPool, id: i32, dto: StudentDto) -> Result<(), AppError> {
        Self::check_references(db, dto.class_id, dto.section_id).await?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No student found")));
        }

        let hashed_password = hash_password(&dto.password)?;

        sqlx::query(
            "UPDATE students SET name = $1, email = $2, password = $3, roll = $4, gender = $5, \
             date_of_birth = $6, admission_date = $7, class_id = $8, section_id = $9, \
             profile_img = $10, updated_at = now() \
             WHERE id = $11",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.roll)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(dto.admission_date)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(&dto.profile_img)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "A student with this email or roll already exists"
                ));
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No student found")));
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
