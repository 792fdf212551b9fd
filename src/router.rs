use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::require_auth;
use crate::modules::academics::router::init_academics_router;
use crate::modules::attendance::router::init_attendance_router;
use crate::modules::exam_results::router::init_exam_results_router;
use crate::modules::exams::router::init_exams_router;
use crate::modules::fees::router::init_fees_router;
use crate::modules::homework::router::init_homework_router;
use crate::modules::students::router::init_students_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::state::AppState;

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "message": "Server is running..." }))
}

async fn url_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Requested url not found" })),
    )
}

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/teachers", init_teachers_router())
        .nest("/students", init_students_router())
        .merge(init_academics_router())
        .nest("/attendance", init_attendance_router())
        .nest("/exams", init_exams_router())
        .nest("/exam-results", init_exam_results_router())
        .nest("/homework", init_homework_router())
        .nest("/fees", init_fees_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Downloads are forced and the disposition header is exposed cross-origin
    let uploads_service = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("Content-Disposition"),
        ))
        .service(ServeDir::new(state.uploads.dir.clone()));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(health_check))
        .nest("/api", api)
        .nest_service("/uploads", uploads_service)
        .fallback(url_not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
