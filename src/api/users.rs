use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::extract::{JsonBody, PathParam, QueryParams};
use crate::api::server::AppState;
use crate::error::Result;
use crate::users::{
    self, CreateUserInput, DeleteUserInput, RetrieveUserInput, UpdateUserInput, UserView,
};

#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OldNameQuery {
    pub old_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(default)]
    pub new_name: Option<String>,
}

/// POST /user/create
pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = users::create_user(state.store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /user/retrieve
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<NameQuery>,
) -> Result<Json<Vec<UserView>>> {
    retrieve_inner(&state, None, query).await
}

/// GET /user/retrieve/{id}
pub async fn retrieve_by_id(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
    QueryParams(query): QueryParams<NameQuery>,
) -> Result<Json<Vec<UserView>>> {
    retrieve_inner(&state, Some(id), query).await
}

async fn retrieve_inner(
    state: &AppState,
    id: Option<String>,
    query: NameQuery,
) -> Result<Json<Vec<UserView>>> {
    let input = RetrieveUserInput {
        id,
        name: query.name,
    };
    Ok(Json(users::retrieve_users(state.store.as_ref(), input).await?))
}

/// PUT /user/update
pub async fn update(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<OldNameQuery>,
    JsonBody(payload): JsonBody<UpdatePayload>,
) -> Result<Json<UserView>> {
    update_inner(&state, None, query, payload).await
}

/// PUT /user/update/{id}
pub async fn update_by_id(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
    QueryParams(query): QueryParams<OldNameQuery>,
    JsonBody(payload): JsonBody<UpdatePayload>,
) -> Result<Json<UserView>> {
    update_inner(&state, Some(id), query, payload).await
}

async fn update_inner(
    state: &AppState,
    id: Option<String>,
    query: OldNameQuery,
    payload: UpdatePayload,
) -> Result<Json<UserView>> {
    let input = UpdateUserInput {
        id,
        old_name: query.old_name,
        new_name: payload.new_name,
    };
    Ok(Json(users::update_user(state.store.as_ref(), input).await?))
}

/// DELETE /user/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<NameQuery>,
) -> Result<Json<&'static str>> {
    delete_inner(&state, None, query).await
}

/// DELETE /user/delete/{id}
pub async fn delete_by_id(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
    QueryParams(query): QueryParams<NameQuery>,
) -> Result<Json<&'static str>> {
    delete_inner(&state, Some(id), query).await
}

async fn delete_inner(
    state: &AppState,
    id: Option<String>,
    query: NameQuery,
) -> Result<Json<&'static str>> {
    let input = DeleteUserInput {
        id,
        name: query.name,
    };
    Ok(Json(users::delete_user(state.store.as_ref(), input).await?))
}
