use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::exam_results::controller::{
    create_exam_result, get_entry_sheet, get_exam_result, get_exam_results, get_publishing,
    publish_exam_result, update_exam_result,
};
use crate::state::AppState;

pub fn init_exam_results_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_exam_results).post(create_exam_result))
        .route("/subjects", get(get_entry_sheet))
        .route("/publishing", get(get_publishing))
        .route("/publishing/{id}", put(publish_exam_result))
        .route("/{id}", get(get_exam_result).put(update_exam_result))
}
