//! Feed DTOs - Post, like e commenti

use crate::entities::{Comment, PostWithStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostDTO {
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
}

impl From<PostWithStats> for PostDTO {
    fn from(value: PostWithStats) -> Self {
        Self {
            post_id: value.post.post_id,
            author_id: value.post.author_id,
            author_username: value.post.author_username,
            content: value.post.content,
            created_at: value.post.created_at,
            like_count: value.like_count,
            comment_count: value.comment_count,
            liked_by_me: value.liked_by_me != 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostDetailDTO {
    #[serde(flatten)]
    pub post: PostDTO,
    pub comments: Vec<CommentDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentDTO {
    pub comment_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDTO {
    fn from(value: Comment) -> Self {
        Self {
            comment_id: value.comment_id,
            post_id: value.post_id,
            author_id: value.author_id,
            author_username: value.author_username,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Body di POST /posts
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreatePostDTO {
    #[serde(default)]
    pub author_id: i64,

    #[validate(length(min = 1, max = 5000, message = "Post content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// Body di POST /posts/{id}/comments
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateCommentDTO {
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub author_id: i64,

    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub content: String,
}
