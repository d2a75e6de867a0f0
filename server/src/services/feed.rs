//! Feed services - Post, like e commenti

use crate::core::{AppError, AppState};
use crate::dtos::{
    BeforeDateQuery, CommentDTO, CreateCommentDTO, CreatePostDTO, PostDTO, PostDetailDTO,
};
use crate::entities::{Profile, User};
use crate::repositories::{Create, Delete, Read};
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

pub const FEED_PAGE_SIZE: i64 = 20;

async fn load_post(state: &AppState, post_id: i64, viewer_id: i64) -> Result<PostDTO, AppError> {
    state
        .post
        .find_with_stats(&post_id, &viewer_id)
        .await?
        .map(PostDTO::from)
        .ok_or_else(|| AppError::not_found("Post not found"))
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Json(mut body): Json<CreatePostDTO>,
) -> Result<(StatusCode, Json<PostDTO>), AppError> {
    body.validate()?;
    body.author_id = profile.profile_id;

    let post = state.post.create(&body).await?;
    info!(post_id = post.post_id, "Post created");

    let dto = load_post(&state, post.post_id, profile.profile_id).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Query(query): Query<BeforeDateQuery>,
) -> Result<Json<Vec<PostDTO>>, AppError> {
    let posts = state
        .post
        .find_feed(&profile.profile_id, query.before_date.as_ref(), FEED_PAGE_SIZE)
        .await?;
    debug!(count = posts.len(), "Feed loaded");
    Ok(Json(posts.into_iter().map(PostDTO::from).collect()))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDetailDTO>, AppError> {
    let post = load_post(&state, post_id, profile.profile_id).await?;
    let comments = state.post.find_comments(&post_id).await?;
    Ok(Json(PostDetailDTO {
        post,
        comments: comments.into_iter().map(CommentDTO::from).collect(),
    }))
}

/// L'autore o un utente staff
#[instrument(skip(state, user, profile), fields(profile_id = profile.profile_id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Extension(profile): Extension<Profile>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let post = state
        .post
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if post.author_id != profile.profile_id && !user.is_staff {
        warn!("Attempt to delete someone else's post");
        return Err(AppError::forbidden("You can only delete your own posts"));
    }

    state.post.delete(&post_id).await?;
    info!("Post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDTO>, AppError> {
    let post = state
        .post
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if !state.post.like(&post_id, &profile.profile_id).await? {
        return Err(AppError::conflict("You already like this post"));
    }

    if post.author_id != profile.profile_id {
        notify(
            &state,
            post.author_id,
            "New like",
            format!("{} liked your post", profile.username),
            format!("/posts/{}", post_id),
        )
        .await;
    }

    Ok(Json(load_post(&state, post_id, profile.profile_id).await?))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn unlike_post(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDTO>, AppError> {
    if !state.post.unlike(&post_id, &profile.profile_id).await? {
        return Err(AppError::not_found("Like not found"));
    }
    Ok(Json(load_post(&state, post_id, profile.profile_id).await?))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentDTO>>, AppError> {
    if state.post.read(&post_id).await?.is_none() {
        return Err(AppError::not_found("Post not found"));
    }
    let comments = state.post.find_comments(&post_id).await?;
    Ok(Json(comments.into_iter().map(CommentDTO::from).collect()))
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(post_id): Path<i64>,
    Json(mut body): Json<CreateCommentDTO>,
) -> Result<(StatusCode, Json<CommentDTO>), AppError> {
    body.validate()?;

    let post = state
        .post
        .read(&post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    body.post_id = post_id;
    body.author_id = profile.profile_id;
    let comment = state.post.create_comment(&body).await?;

    if post.author_id != profile.profile_id {
        notify(
            &state,
            post.author_id,
            "New comment",
            format!("{} commented on your post", profile.username),
            format!("/posts/{}", post_id),
        )
        .await;
    }

    info!(comment_id = comment.comment_id, "Comment created");
    Ok((StatusCode::CREATED, Json(CommentDTO::from(comment))))
}

/// L'autore del commento o l'autore del post
#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let comment = state
        .post
        .find_comment(&comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    let post_author = state
        .post
        .read(&comment.post_id)
        .await?
        .map(|p| p.author_id);

    if comment.author_id != profile.profile_id && post_author != Some(profile.profile_id) {
        return Err(AppError::forbidden("You cannot delete this comment"));
    }

    state.post.delete_comment(&comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
