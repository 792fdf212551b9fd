use classhub_core::PageQuery;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::service::AcademicsService;
use crate::modules::fees::model::{FEE_SORT_FIELDS, FeeDto, FeeListFilter, FeeRecord};
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;
use crate::utils::validate::Violations;

const FEE_COLUMNS: &str = "id, student_id, class_id, section_id, fee_title, amount, \
     payment_status, payment_date, due_date, created_at, updated_at";

pub struct FeeService;

impl FeeService {
    #[instrument(skip(db))]
    pub async fn get_fees(
        db: &PgPool,
        page: &PageQuery,
        filter: &FeeListFilter,
    ) -> Result<(Vec<FeeRecord>, i64), AppError> {
        let mut conditions = Vec::new();
        let mut n = 0;
        if filter.class_id.is_some() {
            n += 1;
            conditions.push(format!("class_id = ${n}"));
        }
        if filter.section_id.is_some() {
            n += 1;
            conditions.push(format!("section_id = ${n}"));
        }
        if filter.student_id.is_some() {
            n += 1;
            conditions.push(format!("student_id = ${n}"));
        }
        if filter.payment_status.is_some() {
            n += 1;
            conditions.push(format!("payment_status = ${n}"));
        }
        if filter.payment_date.is_some() {
            n += 1;
            conditions.push(format!("payment_date = ${n}"));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let data_sql = format!(
            "SELECT {} FROM student_fees{} ORDER BY {} LIMIT {} OFFSET {}",
            FEE_COLUMNS,
            where_clause,
            page.order_clause(FEE_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) FROM student_fees{}", where_clause);

        let mut data_query = sqlx::query_as::<_, FeeRecord>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in [filter.class_id, filter.section_id, filter.student_id]
            .into_iter()
            .flatten()
        {
            data_query = data_query.bind(value);
            count_query = count_query.bind(value);
        }
        if let Some(status) = filter.payment_status {
            data_query = data_query.bind(status);
            count_query = count_query.bind(status);
        }
        if let Some(date) = filter.payment_date {
            data_query = data_query.bind(date);
            count_query = count_query.bind(date);
        }

        let mut tx = db.begin().await?;

        let fees = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((fees, total))
    }

    #[instrument(skip(db))]
    pub async fn get_fee(db: &PgPool, id: i32) -> Result<FeeRecord, AppError> {
        let sql = format!("SELECT {} FROM student_fees WHERE id = $1", FEE_COLUMNS);

        let fee = sqlx::query_as::<_, FeeRecord>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No fee record found")))?;

        Ok(fee)
    }

    async fn check_references(db: &PgPool, dto: &FeeDto) -> Result<(), AppError> {
        let mut violations = Violations::new();

        if !StudentService::exists(db, dto.student_id).await? {
            violations.add("student_id", "Student does not exist");
        }
        if !AcademicsService::class_exists(db, dto.class_id).await? {
            violations.add("class_id", "Class does not exist");
        }
        if let Some(section_id) = dto.section_id
            && !AcademicsService::section_exists(db, section_id).await?
        {
            violations.add("section_id", "Section does not exist");
        }

        violations.into_result()
    }

    #[instrument(skip(db, dto))]
    pub async fn create_fee(db: &PgPool, dto: FeeDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        sqlx::query(
            "INSERT INTO student_fees \
             (student_id, class_id, section_id, fee_title, amount, payment_status, \
              payment_date, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(dto.student_id)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(&dto.fee_title)
        .bind(dto.amount)
        .bind(dto.payment_status)
        .bind(dto.payment_date)
        .bind(dto.due_date)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_fee(db: &PgPool, id: i32, dto: FeeDto) -> Result<(), AppError> {
        Self::check_references(db, &dto).await?;

        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM student_fees WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No fee record found")));
        }

        sqlx::query(
            "UPDATE student_fees SET student_id = $1, class_id = $2, section_id = $3, \
             fee_title = $4, amount = $5, payment_status = $6, payment_date = $7, \
             due_date = $8, updated_at = now() \
             WHERE id = $9",
        )
        .bind(dto.student_id)
        .bind(dto.class_id)
        .bind(dto.section_id)
        .bind(&dto.fee_title)
        .bind(dto.amount)
        .bind(dto.payment_status)
        .bind(dto.payment_date)
        .bind(dto.due_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_fee(db: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM student_fees WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("No fee record found")));
        }

        sqlx::query("DELETE FROM student_fees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
