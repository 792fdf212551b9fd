use classhub_core::PageQuery;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::teachers::model::{TEACHER_SORT_FIELDS, Teacher, TeacherDto};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

const TEACHER_COLUMNS: &str = "id, name, email, designation, gender, date_of_birth, \
     joining_date, phone_number, address, profile_img, created_at, updated_at";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        page: &PageQuery,
    ) -> Result<(Vec<Teacher>, i64), AppError> {
        let data_sql = format!(
            "SELECT {} FROM teachers ORDER BY {} LIMIT {} OFFSET {}",
            TEACHER_COLUMNS,
            page.order_clause(TEACHER_SORT_FIELDS),
            page.limit(),
            page.skip()
        );

        let mut tx = db.begin().await?;

        let teachers = sqlx::query_as::<_, Teacher>(&data_sql)
            .fetch_all(&mut *tx)
            .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((teachers, total))
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: i32) -> Result<Teacher, AppError> {
        let sql = format!("SELECT {} FROM teachers WHERE id = $1", TEACHER_COLUMNS);

        let teacher = sqlx::query_as::<_, Teacher>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No teacher found")))?;

        Ok(teacher)
    }

    pub async fn exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_teacher(db: &PgPool, dto: TeacherDto) -> Result<(), AppError> {
        let hashed_password = hash_password(&dto.password)?;

        sqlx::query(
            "INSERT INTO teachers \
             (name, email, password, designation, gender, date_of_birth, joining_date, \
              phone_number, address, profile_img) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.designation)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(dto.joining_date)
        .bind(&dto.phone_number)
        .bind(&dto.address)
        .bind(&dto.profile_img)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "Teacher with email {} already exists",
                    dto.email
                ));
            }
            AppError::database(e)
        })?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(db: &PgPool, id: i32, dto: TeacherDto) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No teacher found")));
        }

        let hashed_password = hash_password(&dto.password)?;

        sqlx::query(
            "UPDATE teachers SET name = $1, email = $2, password = $3, designation = $4, \
             gender = $5, date_of_birth = $6, joining_date = $7, phone_number = $8, \
             address = $9, profile_img = $10, updated_at = now() \
             WHERE id = $11",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.designation)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(dto.joining_date)
        .bind(&dto.phone_number)
        .bind(&dto.address)
        .bind(&dto.profile_img)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "Teacher with email {} already exists",
                    dto.email
                ));
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No teacher found")));
        }

        sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
