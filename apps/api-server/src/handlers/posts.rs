//! Post CRUD handlers.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::Post;
use quill_core::ports::BaseRepository;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn find_all(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn find_by_id(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::post_not_found(id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create(state: web::Data<AppState>, body: web::Json<Post>) -> AppResult<HttpResponse> {
    let post = body.into_inner();
    post.ensure_valid()?;

    let saved = state.posts.save(post).await?;
    tracing::info!(post_id = ?saved.id, "Post created");

    Ok(HttpResponse::Created().json(saved))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<Post>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner();
    changes.ensure_valid()?;

    let existing = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::post_not_found(id))?;

    let saved = state.posts.save(existing.revise(changes)).await?;
    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete_by_id(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
