use axum::{
    Json,
    extract::{Query, State},
};
use classhub_core::{PageQuery, Paginated};
use tracing::instrument;

use crate::modules::academics::model::{
    Class, Section, SectionListFilter, Subject, SubjectListFilter,
};
use crate::modules::academics::service::AcademicsService;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "All classes", body = [Class]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state))]
pub async fn get_classes(State(state): State<AppState>) -> Result<Json<Vec<Class>>, AppError> {
    let classes = AcademicsService::get_classes(&state.db).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/sections",
    params(SectionListFilter),
    responses(
        (status = 200, description = "Sections, optionally for one class", body = [Section]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state))]
pub async fn get_sections(
    State(state): State<AppState>,
    Query(filter): Query<SectionListFilter>,
) -> Result<Json<Vec<Section>>, AppError> {
    let sections = AcademicsService::get_sections(&state.db, filter.class_id).await?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(PageQuery, SubjectListFilter),
    responses(
        (status = 200, description = "Paginated subjects"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<SubjectListFilter>,
) -> Result<Json<Paginated<Subject>>, AppError> {
    let (subjects, total) =
        AcademicsService::get_subjects(&state.db, &page, filter.class_id).await?;
    Ok(Json(Paginated::new(subjects, page.meta(total))))
}
