use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security::{self, TokenKind};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, MeResponse, RefreshRequest, TokenResponse};
use crate::schemas::people::{StudentResponse, TeacherResponse};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = payload.username.trim().to_lowercase();

    let user = repositories::users::find_by_username(state.db(), &username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or(ApiError::Unauthorized("Incorrect username or password"))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let pair = security::issue_token_pair(user.id, state.settings())
        .map_err(|e| ApiError::internal(e, "Failed to create tokens"))?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse::from(pair)))
}

async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id =
        security::verify_token(&payload.refresh_token, TokenKind::Refresh, state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token"))?;

    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .filter(|user| user.is_active)
        .ok_or(ApiError::Unauthorized("Invalid refresh token"))?;

    let pair = security::issue_token_pair(user.id, state.settings())
        .map_err(|e| ApiError::internal(e, "Failed to create tokens"))?;

    Ok(Json(TokenResponse::from(pair)))
}

async fn me(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, ApiError> {
    let roles = repositories::roles::for_user(state.db(), actor.id())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch roles"))?;
    let teacher = repositories::teachers::find_by_user_id(state.db(), actor.id())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher profile"))?;
    let student = repositories::students::find_by_user_id(state.db(), actor.id())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student profile"))?;

    Ok(Json(MeResponse {
        user: UserResponse::from_db(actor.user, roles),
        teacher: teacher.map(TeacherResponse::from_db),
        student: student.map(StudentResponse::from_db),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::db::types::RoleKind;
    use crate::test_support;

    #[tokio::test]
    async fn login_refresh_and_me_flow() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "Teacher.One", "s3cret", &[RoleKind::Teacher])
            .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({"username": " teacher.one ", "password": "s3cret"})),
            ))
            .await
            .expect("login");
        assert_eq!(response.status(), StatusCode::OK);
        let tokens = test_support::read_json(response).await;
        assert_eq!(tokens["type"], "Bearer");
        let access = tokens["access_token"].as_str().expect("access").to_string();
        let refresh = tokens["refresh_token"].as_str().expect("refresh").to_string();

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", Some(&access), None))
            .await
            .expect("me");
        assert_eq!(response.status(), StatusCode::OK);
        let me = test_support::read_json(response).await;
        assert_eq!(me["username"], "teacher.one");
        assert_eq!(me["roles"][0]["name"], "teacher");

        // A refresh token is not an access token.
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", Some(&refresh), None))
            .await
            .expect("me with refresh");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/refresh",
                None,
                Some(serde_json::json!({"refresh_token": refresh})),
            ))
            .await
            .expect("refresh");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "student.one", "right", &[RoleKind::Student])
            .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({"username": "student.one", "password": "wrong"})),
            ))
            .await
            .expect("login");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
