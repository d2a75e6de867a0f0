//! Post, Comment e statistiche del feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub post_id: i64,
    pub author_id: i64,
    // letto in join da profiles/users
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post con contatori, calcolati rispetto al profilo che legge il feed
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct PostWithStats {
    #[sqlx(flatten)]
    pub post: Post,
    pub like_count: i64,
    pub comment_count: i64,
    // 0/1 calcolato con EXISTS
    pub liked_by_me: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
