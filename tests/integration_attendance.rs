mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{auth_token, seed_teacher, setup_test_app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_attendance(pool: &PgPool, body: Value) -> axum::response::Response {
    let app = setup_test_app(pool.clone());
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/attendance/teachers")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recording_twice_updates_instead_of_duplicating(pool: PgPool) {
    let teacher_id = seed_teacher(&pool, "Nadia Islam", "nadia@school.example").await;

    let response = post_attendance(
        &pool,
        json!({"teacher_id": teacher_id, "status": "PRESENT", "date": "2024-09-02"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Done");

    let response = post_attendance(
        &pool,
        json!({"teacher_id": teacher_id, "status": "ABSENT", "date": "2024-09-02"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Attendance updated");

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM teacher_attendance WHERE teacher_id = $1",
    )
    .bind(teacher_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    let status = sqlx::query_scalar::<_, String>(
        "SELECT status::text FROM teacher_attendance WHERE teacher_id = $1",
    )
    .bind(teacher_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "ABSENT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recording_for_unknown_teacher_is_a_violation(pool: PgPool) {
    let response = post_attendance(
        &pool,
        json!({"teacher_id": 9999, "status": "PRESENT", "date": "2024-09-02"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["errors"][0]["field"], "teacher_id");
    assert_eq!(body["errors"][0]["message"], "Teacher does not exist");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_roster_requires_date(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/attendance/teachers")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Date is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_roster_joins_marks_for_the_day(pool: PgPool) {
    let marked = seed_teacher(&pool, "Nadia Islam", "nadia@school.example").await;
    let unmarked = seed_teacher(&pool, "Omar Faruk", "omar@school.example").await;

    let response = post_attendance(
        &pool,
        json!({"teacher_id": marked, "status": "LATE", "date": "2024-09-02"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/attendance/teachers?date=2024-09-02&sortBy=name&sortOrder=asc")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["meta"]["total"], 2);

    let entries = body["data"].as_array().unwrap();
    let marked_entry = entries
        .iter()
        .find(|e| e["id"] == marked)
        .expect("marked teacher in roster");
    assert_eq!(marked_entry["attendance"]["status"], "LATE");
    assert_eq!(marked_entry["attendance"]["date"], "2024-09-02");

    let unmarked_entry = entries
        .iter()
        .find(|e| e["id"] == unmarked)
        .expect("unmarked teacher in roster");
    assert!(unmarked_entry["attendance"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_history_for_missing_teacher_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/attendance/teachers/9999")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "No teacher found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_history_is_shaped_for_calendars(pool: PgPool) {
    let teacher_id = seed_teacher(&pool, "Nadia Islam", "nadia@school.example").await;

    let response = post_attendance(
        &pool,
        json!({"teacher_id": teacher_id, "status": "PRESENT", "date": "2024-09-02"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/attendance/teachers/{teacher_id}"))
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!([{"title": "PRESENT", "start": "2024, 9, 2", "end": "2024, 9, 2"}])
    );
}
