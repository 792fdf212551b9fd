use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use classhub_core::files::MAX_ATTACHMENT_BYTES;

use crate::modules::homework::controller::{
    create_assignment, delete_assignment, get_assignment, get_assignments,
    get_student_homeworks, get_submitted_homework_details, get_submitted_homeworks,
    update_assignment, upload_attachment,
};
use crate::state::AppState;

pub fn init_homework_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment).get(get_assignments))
        .route(
            "/attachment",
            post(upload_attachment)
                // Leave headroom over the attachment limit for multipart framing
                .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_BYTES + 64 * 1024)),
        )
        .route("/student/{student_id}", get(get_student_homeworks))
        .route("/student/{student_id}/submitted", get(get_submitted_homeworks))
        .route(
            "/student/{student_id}/submitted/{homework_id}",
            get(get_submitted_homework_details),
        )
        .route(
            "/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
}
