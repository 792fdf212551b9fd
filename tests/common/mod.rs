#![allow(dead_code)]

use axum::Router;
use classhub::router::init_router;
use classhub::state::AppState;
use classhub::utils::jwt::create_access_token;
use classhub_config::JwtConfig;
use sqlx::PgPool;

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    init_router(AppState::from_env(pool))
}

/// Mints a token the auth middleware accepts; issuance itself lives outside
/// this service, only the secret is shared.
pub fn auth_token() -> String {
    dotenvy::dotenv().ok();
    create_access_token(1, "Test Admin", "admin", &JwtConfig::from_env()).unwrap()
}

pub async fn seed_class(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar::<_, i32>("INSERT INTO classes (class_name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_section(pool: &PgPool, class_id: i32, name: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO sections (section_name, class_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_subject(pool: &PgPool, class_id: i32, name: &str, code: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO subjects (name, code, class_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(code)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_teacher(pool: &PgPool, name: &str, email: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO teachers \
         (name, email, password, designation, gender, date_of_birth, joining_date, \
          phone_number, address) \
         VALUES ($1, $2, 'hashed-password', 'Teacher', 'FEMALE', '1985-01-01', '2015-01-01', \
                 '01700000000', 'Test Address') \
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_student(pool: &PgPool, class_id: i32, name: &str, email: &str, roll: i32) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO students \
         (name, email, password, roll, gender, date_of_birth, admission_date, class_id) \
         VALUES ($1, $2, 'hashed-password', $3, 'MALE', '2012-01-01', '2020-01-10', $4) \
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(roll)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_assignment(pool: &PgPool, class_id: i32, subject_id: i32, title: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO assignments \
         (class_id, subject_id, title, assignment_time, submission_time, status) \
         VALUES ($1, $2, $3, now() + interval '1 day', now() + interval '7 days', 'ACTIVE') \
         RETURNING id",
    )
    .bind(class_id)
    .bind(subject_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_submission(pool: &PgPool, assignment_id: i32, student_id: i32) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO homework_submissions (assignment_id, student_id, attachment) \
         VALUES ($1, $2, 'answers.pdf') RETURNING id",
    )
    .bind(assignment_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_exam(pool: &PgPool, class_id: i32, name: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO exams (exam_name, class_id, status) VALUES ($1, $2, 'ACTIVE') RETURNING id",
    )
    .bind(name)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}
