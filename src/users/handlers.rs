use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{Pagination, UserListResponse};
use super::repo_types::User;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
}

/// GET /users/:user_id
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<User>> {
    let Path(id) = id?;
    let user = state.users.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user))
}

/// GET /users?limit=&offset=
///
/// Page and count are two independent reads; the count may not match the
/// page under concurrent writes.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<UserListResponse>> {
    let Query(page) = page?;
    let Pagination { limit, offset } = page.validate()?;

    let items = state.users.list_page(limit, offset).await?;
    let total = state.users.count().await?;
    debug!(returned = items.len(), total, "listed users");

    Ok(Json(UserListResponse { items, limit, offset, total }))
}
