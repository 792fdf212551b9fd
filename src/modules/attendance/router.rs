use axum::{Router, routing::get};

use crate::modules::attendance::controller::{
    get_attendance_roster, get_teacher_attendance, record_attendance,
};
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/teachers",
            get(get_attendance_roster).post(record_attendance),
        )
        .route("/teachers/{id}", get(get_teacher_attendance))
}
