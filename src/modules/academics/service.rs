use classhub_core::PageQuery;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academics::model::{Class, SUBJECT_SORT_FIELDS, Section, Subject};
use crate::utils::errors::AppError;

pub struct AcademicsService;

impl AcademicsService {
    #[instrument(skip(db))]
    pub async fn get_classes(db: &PgPool) -> Result<Vec<Class>, AppError> {
        let classes =
            sqlx::query_as::<_, Class>("SELECT id, class_name FROM classes ORDER BY id")
                .fetch_all(db)
                .await?;

        Ok(classes)
    }

    #[instrument(skip(db))]
    pub async fn get_sections(
        db: &PgPool,
        class_id: Option<i64>,
    ) -> Result<Vec<Section>, AppError> {
        let sections = match class_id {
            Some(class_id) => {
                sqlx::query_as::<_, Section>(
                    "SELECT id, section_name, class_id FROM sections WHERE class_id = $1 ORDER BY id",
                )
                .bind(class_id)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Section>(
                    "SELECT id, section_name, class_id FROM sections ORDER BY id",
                )
                .fetch_all(db)
                .await?
            }
        };

        Ok(sections)
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(
        db: &PgPool,
        page: &PageQuery,
        class_id: Option<i64>,
    ) -> Result<(Vec<Subject>, i64), AppError> {
        let mut where_clause = String::new();
        if class_id.is_some() {
            where_clause.push_str(" WHERE class_id = $1");
        }

        let data_sql = format!(
            "SELECT id, name, code, class_id FROM subjects{} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause,
            page.order_clause(SUBJECT_SORT_FIELDS),
            page.limit(),
            page.skip()
        );
        let count_sql = format!("SELECT COUNT(*) FROM subjects{}", where_clause);

        let mut tx = db.begin().await?;

        let mut data_query = sqlx::query_as::<_, Subject>(&data_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(class_id) = class_id {
            data_query = data_query.bind(class_id);
            count_query = count_query.bind(class_id);
        }

        let subjects = data_query.fetch_all(&mut *tx).await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((subjects, total))
    }

    pub async fn class_exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    pub async fn section_exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM sections WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    pub async fn subject_exists(db: &PgPool, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM subjects WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }
}
