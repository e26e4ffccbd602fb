use axum::http::{Method, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::db::models::QuizResult;
use crate::db::types::RoleKind;
use crate::repositories::{
    self,
    quizzes::CreateQuiz,
    results::CreateResult,
};
use crate::test_support::{self, TestContext};

async fn seed_result(
    pool: &PgPool,
    user_id: i64,
    group_id: Option<i64>,
    subject_id: Option<i64>,
    grade: i32,
) -> QuizResult {
    let quiz = repositories::quizzes::create(
        pool,
        CreateQuiz {
            title: "Seeded",
            question_number: 10,
            duration: 10,
            pin: "SEED01",
            is_active: true,
            attempt: 1,
            user_id: None,
            group_id,
            subject_id,
        },
    )
    .await
    .expect("seed quiz");
    repositories::results::create(
        pool,
        CreateResult {
            user_id,
            quiz_id: quiz.id,
            group_id,
            subject_id,
            correct_answers: grade / 10,
            wrong_answers: 10 - grade / 10,
            grade,
        },
    )
    .await
    .expect("seed result")
}

async fn send(ctx: &TestContext, method: Method, uri: &str, token: &str) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(method, uri, Some(token), None))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

#[tokio::test]
async fn results_follow_the_caller_scope() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let own = test_support::insert_group(pool, "A-1").await;
    let other = test_support::insert_group(pool, "B-2").await;
    let subject = test_support::insert_subject(pool, "Physics").await;

    let student = test_support::insert_user(pool, "student", "pw", &[RoleKind::Student]).await;
    test_support::insert_student(pool, student.id, "Ivanov", Some(own.id)).await;
    let visible = seed_result(pool, student.id, Some(own.id), None, 90).await;
    let hidden = seed_result(pool, student.id, Some(other.id), Some(subject.id), 40).await;

    let token = test_support::bearer_token(student.id, ctx.state.settings());
    let (status, listing) = send(&ctx, Method::GET, "/api/v1/results", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["id"], visible.id);
    assert_eq!(listing["items"][0]["group"]["name"], "A-1");
    assert_eq!(listing["items"][0]["user"]["name"], "student");

    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/results/{}", hidden.id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let teacher_user =
        test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let teacher = test_support::insert_teacher(pool, teacher_user.id, "Smirnov").await;
    test_support::assign_teacher(pool, &teacher, &[], &[subject.id]).await;
    let teacher_token = test_support::bearer_token(teacher_user.id, ctx.state.settings());

    let (_, listing) = send(&ctx, Method::GET, "/api/v1/results", &teacher_token).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["id"], hidden.id);

    let (_, listing) =
        send(&ctx, Method::GET, "/api/v1/results?grade=90", &teacher_token).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn only_staff_delete_results() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let student = test_support::insert_user(pool, "student", "pw", &[RoleKind::Student]).await;
    let admin = test_support::insert_user(pool, "admin", "pw", &[RoleKind::Admin]).await;
    let result = seed_result(pool, student.id, None, None, 50).await;
    let uri = format!("/api/v1/results/{}", result.id);

    let student_token = test_support::bearer_token(student.id, ctx.state.settings());
    let (status, _) = send(&ctx, Method::DELETE, &uri, &student_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = test_support::bearer_token(admin.id, ctx.state.settings());
    let (status, body) = send(&ctx, Method::DELETE, &uri, &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = send(&ctx, Method::DELETE, &uri, &admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teacher_cannot_delete_result_outside_scope() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let group = test_support::insert_group(pool, "A-1").await;
    let student = test_support::insert_user(pool, "student", "pw", &[RoleKind::Student]).await;
    let result = seed_result(pool, student.id, Some(group.id), None, 70).await;
    let uri = format!("/api/v1/results/{}", result.id);

    let teacher = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let (status, _) = send(&ctx, Method::DELETE, &uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = repositories::results::find_row(pool, result.id).await.expect("fetch result");
    assert!(remaining.is_some());
}
