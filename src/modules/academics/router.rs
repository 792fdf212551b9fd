use axum::{Router, routing::get};

use crate::modules::academics::controller::{get_classes, get_sections, get_subjects};
use crate::state::AppState;

pub fn init_academics_router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(get_classes))
        .route("/sections", get(get_sections))
        .route("/subjects", get(get_subjects))
}
