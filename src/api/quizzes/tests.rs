use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use crate::db::models::Quiz;
use crate::db::types::RoleKind;
use crate::services::quiz_composition::{self, NewQuiz};
use crate::test_support::{self, TestContext};

async fn seed_quiz(
    pool: &PgPool,
    title: &str,
    group_id: Option<i64>,
    subject_id: Option<i64>,
) -> Quiz {
    quiz_composition::create(
        pool,
        NewQuiz {
            title: title.to_string(),
            question_number: 3,
            duration: 15,
            pin: None,
            is_active: true,
            user_id: None,
            group_id,
            subject_id,
        },
    )
    .await
    .expect("seed quiz")
}

async fn get_json(ctx: &TestContext, uri: &str, token: &str) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, uri, Some(token), None))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

fn titles(listing: &Value) -> Vec<String> {
    listing["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["title"].as_str().expect("title").to_string())
        .collect()
}

#[tokio::test]
async fn student_sees_only_quizzes_of_own_group() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let own = test_support::insert_group(pool, "A-1").await;
    let other = test_support::insert_group(pool, "B-2").await;
    seed_quiz(pool, "Own group", Some(own.id), None).await;
    seed_quiz(pool, "Other group", Some(other.id), None).await;
    seed_quiz(pool, "No group", None, None).await;

    let user = test_support::insert_user(pool, "student", "pw", &[RoleKind::Student]).await;
    test_support::insert_student(pool, user.id, "Ivanov", Some(own.id)).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let (status, listing) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
    assert_eq!(titles(&listing), vec!["Own group"]);
}

#[tokio::test]
async fn student_without_group_sees_nothing() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let group = test_support::insert_group(pool, "A-1").await;
    seed_quiz(pool, "Quiz", Some(group.id), None).await;

    let user = test_support::insert_user(pool, "student", "pw", &[RoleKind::Student]).await;
    test_support::insert_student(pool, user.id, "Ivanov", None).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let (status, listing) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 0);
    assert_eq!(listing["items"], json!([]));
}

#[tokio::test]
async fn teacher_sees_assigned_groups_or_subjects() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let assigned_group = test_support::insert_group(pool, "A-1").await;
    let other_group = test_support::insert_group(pool, "B-2").await;
    let assigned_subject = test_support::insert_subject(pool, "Physics").await;
    let other_subject = test_support::insert_subject(pool, "History").await;
    seed_quiz(pool, "By group", Some(assigned_group.id), Some(other_subject.id)).await;
    seed_quiz(pool, "By subject", Some(other_group.id), Some(assigned_subject.id)).await;
    seed_quiz(pool, "Neither", Some(other_group.id), Some(other_subject.id)).await;

    let user = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let teacher = test_support::insert_teacher(pool, user.id, "Smirnov").await;
    test_support::assign_teacher(pool, &teacher, &[assigned_group.id], &[assigned_subject.id])
        .await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let (status, listing) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 2);
    assert_eq!(titles(&listing), vec!["By group", "By subject"]);

    let (status, _) = get_json(&ctx, "/api/v1/quizzes/3", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teacher_without_assignments_sees_nothing() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let group = test_support::insert_group(pool, "A-1").await;
    seed_quiz(pool, "Quiz", Some(group.id), None).await;

    let user = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let (_, listing) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn total_does_not_depend_on_page_window() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    for title in ["Alpha quiz", "Beta quiz", "Gamma quiz"] {
        seed_quiz(pool, title, None, None).await;
    }
    let admin = test_support::insert_user(pool, "admin", "pw", &[RoleKind::Admin]).await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let (_, first) = get_json(&ctx, "/api/v1/quizzes?page=1&limit=2", &token).await;
    let (_, second) = get_json(&ctx, "/api/v1/quizzes?page=2&limit=2", &token).await;
    assert_eq!(first["total"], 3);
    assert_eq!(second["total"], 3);
    assert_eq!(titles(&first), vec!["Alpha quiz", "Beta quiz"]);
    assert_eq!(titles(&second), vec!["Gamma quiz"]);

    let (_, filtered) = get_json(&ctx, "/api/v1/quizzes?title=GAMMA&limit=5000", &token).await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["limit"], 1000);
}

#[tokio::test]
async fn create_links_owned_questions_and_teacher_group_once() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let user = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let someone_else = test_support::insert_user(pool, "other", "pw", &[RoleKind::Teacher]).await;
    let group = test_support::insert_group(pool, "A-1").await;
    let subject = test_support::insert_subject(pool, "Physics").await;
    let unrelated = test_support::insert_subject(pool, "History").await;
    test_support::insert_question(pool, user.id, subject.id, "Q1").await;
    test_support::insert_question(pool, user.id, subject.id, "Q2").await;
    test_support::insert_question(pool, user.id, unrelated.id, "Q3").await;
    test_support::insert_question(pool, someone_else.id, subject.id, "Q4").await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let mut quiz_ids = Vec::new();
    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/quizzes",
                Some(&token),
                Some(json!({
                    "title": "Kinematics",
                    "question_number": 2,
                    "duration": 20,
                    "user_id": user.id,
                    "group_id": group.id,
                    "subject_id": subject.id
                })),
            ))
            .await
            .expect("create quiz");
        assert_eq!(response.status(), StatusCode::CREATED);
        let quiz = test_support::read_json(response).await;
        assert_eq!(quiz["user_id"], user.id);
        assert_eq!(quiz["attempt"], 1);
        assert_eq!(quiz["pin"].as_str().map(str::len), Some(6));
        quiz_ids.push(quiz["id"].as_i64().expect("quiz id"));
    }

    let (status, detail) = get_json(&ctx, &format!("/api/v1/quizzes/{}", quiz_ids[0]), &token).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = detail["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .filter_map(|question| question["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["Q1", "Q2"]);

    let links: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM group_teachers WHERE teacher_id = $1 AND group_id = $2",
    )
    .bind(user.id)
    .bind(group.id)
    .fetch_one(pool)
    .await
    .expect("count links");
    assert_eq!(links, 1);
}

#[tokio::test]
async fn repeat_clones_quiz_with_fresh_pin_and_links() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let user = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let group = test_support::insert_group(pool, "A-1").await;
    let subject = test_support::insert_subject(pool, "Physics").await;
    for text in ["Q1", "Q2", "Q3"] {
        test_support::insert_question(pool, user.id, subject.id, text).await;
    }
    let source = quiz_composition::create(
        pool,
        NewQuiz {
            title: "Optics".to_string(),
            question_number: 3,
            duration: 30,
            pin: Some("ABC123".to_string()),
            is_active: true,
            user_id: Some(user.id),
            group_id: Some(group.id),
            subject_id: Some(subject.id),
        },
    )
    .await
    .expect("source quiz");
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/repeat", source.id),
            Some(&token),
            None,
        ))
        .await
        .expect("repeat quiz");
    assert_eq!(response.status(), StatusCode::CREATED);
    let repeated = test_support::read_json(response).await;
    assert_ne!(repeated["id"], source.id);
    assert_eq!(repeated["attempt"], 2);
    assert_ne!(repeated["pin"], "ABC123");
    assert_eq!(repeated["title"], "Optics");
    assert_eq!(repeated["duration"], 30);
    assert_eq!(repeated["group_id"], group.id);
    assert_eq!(repeated["subject_id"], subject.id);
    let repeated_id = repeated["id"].as_i64().expect("repeated id");

    let links_of = |quiz_id: i64| {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, question_id FROM quiz_questions WHERE quiz_id = $1 ORDER BY question_id",
        )
        .bind(quiz_id)
        .fetch_all(pool)
    };
    let source_links = links_of(source.id).await.expect("source links");
    let copied_links = links_of(repeated_id).await.expect("copied links");
    assert_eq!(source_links.len(), 3);
    assert_eq!(copied_links.len(), 3);
    for ((source_link, source_question), (copied_link, copied_question)) in
        source_links.iter().zip(&copied_links)
    {
        assert_eq!(source_question, copied_question);
        assert_ne!(source_link, copied_link);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/quizzes/9999/repeat",
            Some(&token),
            None,
        ))
        .await
        .expect("repeat missing quiz");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn students_cannot_create_quizzes() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "student", "pw", &[RoleKind::Student]).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/quizzes",
            Some(&token),
            Some(json!({"title": "Nope", "question_number": 1, "duration": 5})),
        ))
        .await
        .expect("create quiz");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_stores_file_and_returns_public_url() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "teacher", "pw", &[RoleKind::Teacher]).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let boundary = "quizdesk-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"diagram.PNG\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fake-png-bytes\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/quizzes/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .expect("request");

    let response = ctx.app.clone().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded = test_support::read_json(response).await;
    let url = uploaded["url"].as_str().expect("url");
    let filename = url.strip_prefix("http://localhost:8000/uploads/").expect("public prefix");
    assert!(filename.ends_with(".png"));

    let stored = ctx.state.uploads().root().join(filename);
    assert_eq!(std::fs::read(stored).expect("stored file"), b"fake-png-bytes");
}

#[tokio::test]
async fn create_without_owner_skips_linking() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let admin = test_support::insert_user(pool, "admin", "pw", &[RoleKind::Admin]).await;
    let group = test_support::insert_group(pool, "A-1").await;
    let subject = test_support::insert_subject(pool, "Physics").await;
    test_support::insert_question(pool, admin.id, subject.id, "Q1").await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/quizzes",
            Some(&token),
            Some(json!({
                "title": "Ownerless",
                "question_number": 1,
                "duration": 10,
                "user_id": null,
                "group_id": group.id,
                "subject_id": subject.id
            })),
        ))
        .await
        .expect("create quiz");
    assert_eq!(response.status(), StatusCode::CREATED);
    let quiz = test_support::read_json(response).await;
    assert_eq!(quiz["user_id"], Value::Null);

    let group_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM group_teachers")
        .fetch_one(pool)
        .await
        .expect("count group links");
    let question_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_questions")
        .fetch_one(pool)
        .await
        .expect("count question links");
    assert_eq!(group_links, 0);
    assert_eq!(question_links, 0);
}

#[tokio::test]
async fn hidden_quiz_cannot_be_changed_by_unassigned_teacher() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let group = test_support::insert_group(pool, "A-1").await;
    let quiz = seed_quiz(pool, "Foreign", Some(group.id), None).await;
    let user = test_support::insert_user(pool, "teacher", "pw", &[RoleKind::Teacher]).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());
    let uri = format!("/api/v1/quizzes/{}", quiz.id);

    let attempts = [
        (Method::PUT, uri.clone(), Some(json!({"title": "Renamed"}))),
        (Method::POST, format!("{uri}/repeat"), None),
        (Method::DELETE, uri.clone(), None),
    ];
    for (method, uri, body) in attempts {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(method.clone(), &uri, Some(&token), body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM quizzes ORDER BY id")
        .fetch_all(pool)
        .await
        .expect("quiz titles");
    assert_eq!(titles, vec!["Foreign"]);
}

#[tokio::test]
async fn student_role_outranks_teacher_role_in_listings() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    let own = test_support::insert_group(pool, "A-1").await;
    let other = test_support::insert_group(pool, "B-2").await;
    let subject = test_support::insert_subject(pool, "Physics").await;
    seed_quiz(pool, "Own group", Some(own.id), None).await;
    seed_quiz(pool, "Assigned subject", Some(other.id), Some(subject.id)).await;

    let user = test_support::insert_user(
        pool,
        "assistant",
        "pw",
        &[RoleKind::Teacher, RoleKind::Student],
    )
    .await;
    test_support::insert_student(pool, user.id, "Petrov", Some(own.id)).await;
    let teacher = test_support::insert_teacher(pool, user.id, "Petrov").await;
    test_support::assign_teacher(pool, &teacher, &[], &[subject.id]).await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let (status, listing) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
    assert_eq!(titles(&listing), vec!["Own group"]);
}

#[tokio::test]
async fn explicit_inactive_filter_is_applied() {
    let ctx = test_support::setup_test_context().await;
    let pool = ctx.state.db();
    seed_quiz(pool, "Open", None, None).await;
    let closed = seed_quiz(pool, "Closed", None, None).await;
    sqlx::query("UPDATE quizzes SET is_active = FALSE WHERE id = $1")
        .bind(closed.id)
        .execute(pool)
        .await
        .expect("deactivate quiz");
    let admin = test_support::insert_user(pool, "admin", "pw", &[RoleKind::Admin]).await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let (_, inactive) = get_json(&ctx, "/api/v1/quizzes?is_active=false", &token).await;
    assert_eq!(inactive["total"], 1);
    assert_eq!(titles(&inactive), vec!["Closed"]);

    let (_, active) = get_json(&ctx, "/api/v1/quizzes?is_active=true", &token).await;
    assert_eq!(titles(&active), vec!["Open"]);

    let (_, all) = get_json(&ctx, "/api/v1/quizzes", &token).await;
    assert_eq!(all["total"], 2);
}
