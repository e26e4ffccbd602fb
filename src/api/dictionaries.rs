//! `/groups`, `/subjects`, `/faculties` and `/permissions`: the same handlers instantiated
//! per table.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::{required_text, validate_payload};
use crate::core::state::AppState;
use crate::repositories::{
    self,
    dictionaries::{Dictionary, NameFilter},
};
use crate::schemas::dictionary::{ListNamedQuery, NamedEntityInput, NamedEntityResponse};
use crate::schemas::DeletedResponse;

pub(crate) trait DictionaryRoute: Send + Sync + 'static {
    const DICTIONARY: Dictionary;
}

pub(crate) struct Groups;
pub(crate) struct Subjects;
pub(crate) struct Faculties;
pub(crate) struct Permissions;

impl DictionaryRoute for Groups {
    const DICTIONARY: Dictionary = Dictionary::Groups;
}

impl DictionaryRoute for Subjects {
    const DICTIONARY: Dictionary = Dictionary::Subjects;
}

impl DictionaryRoute for Faculties {
    const DICTIONARY: Dictionary = Dictionary::Faculties;
}

impl DictionaryRoute for Permissions {
    const DICTIONARY: Dictionary = Dictionary::Permissions;
}

pub(crate) fn router<D: DictionaryRoute>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries::<D>).post(create_entry::<D>))
        .route(
            "/:id",
            get(get_entry::<D>).put(rename_entry::<D>).delete(delete_entry::<D>),
        )
}

fn conflict(dictionary: Dictionary) -> ApiError {
    ApiError::Conflict(format!("{} with this name already exists", dictionary.label()))
}

fn write_error(dictionary: Dictionary, err: sqlx::Error, context: &str) -> ApiError {
    match ApiError::from_write(err, context) {
        ApiError::Conflict(_) => conflict(dictionary),
        other => other,
    }
}

async fn create_entry<D: DictionaryRoute>(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<NamedEntityInput>,
) -> Result<(StatusCode, Json<NamedEntityResponse>), ApiError> {
    validate_payload(&payload)?;
    let name = required_text("name", &payload.name)?;

    let entry = repositories::dictionaries::create(state.db(), D::DICTIONARY, &name)
        .await
        .map_err(|e| write_error(D::DICTIONARY, e, "Failed to create entry"))?;

    Ok((StatusCode::CREATED, Json(NamedEntityResponse::from_db(entry))))
}

async fn list_entries<D: DictionaryRoute>(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListNamedQuery>,
) -> Result<Json<PaginatedResponse<NamedEntityResponse>>, ApiError> {
    let window = page.window();
    let listing = repositories::dictionaries::list(
        state.db(),
        D::DICTIONARY,
        &NameFilter { name: params.name },
        window,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list entries"))?;

    Ok(Json(PaginatedResponse::new(listing.map(NamedEntityResponse::from_db), window)))
}

async fn get_entry<D: DictionaryRoute>(
    Path(id): Path<i64>,
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<NamedEntityResponse>, ApiError> {
    let entry = repositories::dictionaries::find_by_id(state.db(), D::DICTIONARY, id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch entry"))?
        .ok_or_else(|| ApiError::NotFound(D::DICTIONARY.not_found().to_string()))?;

    Ok(Json(NamedEntityResponse::from_db(entry)))
}

async fn rename_entry<D: DictionaryRoute>(
    Path(id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<NamedEntityInput>,
) -> Result<Json<NamedEntityResponse>, ApiError> {
    validate_payload(&payload)?;
    let name = required_text("name", &payload.name)?;

    let entry = repositories::dictionaries::rename(state.db(), D::DICTIONARY, id, &name)
        .await
        .map_err(|e| write_error(D::DICTIONARY, e, "Failed to update entry"))?
        .ok_or_else(|| ApiError::NotFound(D::DICTIONARY.not_found().to_string()))?;

    Ok(Json(NamedEntityResponse::from_db(entry)))
}

async fn delete_entry<D: DictionaryRoute>(
    Path(id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::dictionaries::delete(state.db(), D::DICTIONARY, id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete entry"))?;
    if !deleted {
        return Err(ApiError::NotFound(D::DICTIONARY.not_found().to_string()));
    }

    Ok(Json(DeletedResponse::new(id)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::db::types::RoleKind;
    use crate::test_support;

    #[tokio::test]
    async fn duplicate_group_name_conflicts() {
        let ctx = test_support::setup_test_context().await;
        let admin =
            test_support::insert_user(ctx.state.db(), "admin", "pw", &[RoleKind::Admin]).await;
        let token = test_support::bearer_token(admin.id, ctx.state.settings());

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let response = ctx
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    "/api/v1/groups",
                    Some(&token),
                    Some(serde_json::json!({"name": "CS-101"})),
                ))
                .await
                .expect("create group");
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn students_can_read_but_not_write_subjects() {
        let ctx = test_support::setup_test_context().await;
        let student =
            test_support::insert_user(ctx.state.db(), "student", "pw", &[RoleKind::Student]).await;
        test_support::insert_subject(ctx.state.db(), "Algebra").await;
        test_support::insert_subject(ctx.state.db(), "Geometry").await;
        let token = test_support::bearer_token(student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/subjects?name=alg",
                Some(&token),
                None,
            ))
            .await
            .expect("list subjects");
        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Algebra");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/subjects",
                Some(&token),
                Some(serde_json::json!({"name": "Physics"})),
            ))
            .await
            .expect("create subject");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
