mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{auth_token, seed_class, seed_exam, seed_student, setup_test_app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(pool: &PgPool, uri: &str) -> axum::response::Response {
    let app = setup_test_app(pool.clone());
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_entry_sheet_requires_class_id(pool: PgPool) {
    let response = get(&pool, "/api/exam-results/subjects").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Class id is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_entry_sheet_is_a_consistent_snapshot(pool: PgPool) {
    let class_id = seed_class(&pool, "Class Five").await;
    seed_exam(&pool, class_id, "First Term").await;
    seed_student(&pool, class_id, "Arif Hossain", "arif@school.example", 1).await;
    seed_student(&pool, class_id, "Sadia Khatun", "sadia@school.example", 2).await;

    let response = get(&pool, &format!("/api/exam-results/subjects?class_id={class_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["exams"].as_array().unwrap().len(), 1);
    assert_eq!(body["students"].as_array().unwrap().len(), 2);
    assert_eq!(body["subjects"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_result_detail_not_found(pool: PgPool) {
    let response = get(&pool, "/api/exam-results/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "No result found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_list_results_share_the_filter(pool: PgPool) {
    let class_id = seed_class(&pool, "Class Five").await;
    let other_class = seed_class(&pool, "Class Six").await;
    let exam_id = seed_exam(&pool, class_id, "First Term").await;
    let student_id = seed_student(&pool, class_id, "Arif Hossain", "arif@school.example", 1).await;

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exam-results")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::from(
                    json!({
                        "exam_id": exam_id,
                        "class_id": class_id,
                        "student_id": student_id,
                        "subjects_marks": {"MATH-5": 78}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Subject mark added");

    let response = get(&pool, &format!("/api/exam-results?class_id={class_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"]["results"][0]["student_roll"], 1);
    assert_eq!(body["data"]["exams"].as_array().unwrap().len(), 1);

    let response = get(&pool, &format!("/api/exam-results?class_id={other_class}")).await;
    let body = json_body(response).await;
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_bad_references_collects_violations(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exam-results")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::from(
                    json!({
                        "exam_id": 9999,
                        "class_id": 9998,
                        "student_id": 9997,
                        "subjects_marks": {}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publishing_total_is_computed(pool: PgPool) {
    let class_id = seed_class(&pool, "Class Five").await;
    for i in 0..3 {
        let exam_id = seed_exam(&pool, class_id, &format!("Term {i}")).await;
        sqlx::query("INSERT INTO exam_results_publishing (exam_id) VALUES ($1)")
            .bind(exam_id)
            .execute(&pool)
            .await
            .unwrap();
    }

    let response = get(&pool, "/api/exam-results/publishing?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["data"][0]["status"], "UNPUBLISHED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_updates_status(pool: PgPool) {
    let class_id = seed_class(&pool, "Class Five").await;
    let exam_id = seed_exam(&pool, class_id, "First Term").await;
    let publishing_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO exam_results_publishing (exam_id) VALUES ($1) RETURNING id",
    )
    .bind(exam_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/exam-results/publishing/{publishing_id}"))
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::from(json!({"status": "PUBLISHED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Result Publish Updated");

    let status = sqlx::query_scalar::<_, String>(
        "SELECT status::text FROM exam_results_publishing WHERE id = $1",
    )
    .bind(publishing_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "PUBLISHED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_missing_entry_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/exam-results/publishing/9999")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", auth_token()))
                .body(Body::from(json!({"status": "PUBLISHED"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["message"],
        "Publishable result not found"
    );
}
