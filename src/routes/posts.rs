use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extractors::{CurrentUser, PostPayload};
use crate::posts::Post;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/test", get(health))
        .route("/api/posts/{id}", get(get_post).delete(delete_post))
        .route("/api/posts/like/{id}", post(like_post))
        .route("/api/posts/unlike/{id}", post(unlike_post))
        .route("/api/posts/comment/{id}", post(add_comment))
        .route(
            "/api/posts/comment/{id}/{comment_id}",
            delete(remove_comment),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "msg": "Posts Works" }))
}

async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(state.posts.list().await?))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.posts.get(&id).await?))
}

async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostPayload(input): PostPayload,
) -> AppResult<Json<Post>> {
    let post = state.posts.create(&user, input).await?;
    tracing::debug!(post_id = %post.id, user_id = %user.id, "Created post");
    Ok(Json(post))
}

async fn like_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.posts.like(&user, &id).await?))
}

async fn unlike_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.posts.unlike(&user, &id).await?))
}

async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    PostPayload(input): PostPayload,
) -> AppResult<Json<Post>> {
    Ok(Json(state.posts.add_comment(&user, &id, input).await?))
}

async fn remove_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state.posts.remove_comment(&user, &id, &comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.posts.delete(&user, &id).await?;
    tracing::debug!(post_id = %id, user_id = %user.id, "Deleted post");
    Ok(StatusCode::NO_CONTENT)
}
