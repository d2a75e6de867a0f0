//! ReviewRepository - Repository per le recensioni delle sessioni

use super::{Create, Read};
use crate::dtos::CreateReviewDTO;
use crate::entities::{Review, ReviewWithSession};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const REVIEW_WITH_SESSION_SELECT: &str = r#"
    SELECT r.review_id, r.session_id, r.rating, r.comment, r.created_at,
           s.mentor_id, s.topic, u.username AS reviewer_username
    FROM reviews r
    JOIN sessions s ON s.session_id = r.session_id
    JOIN profiles p ON p.profile_id = s.mentee_id
    JOIN users u ON u.user_id = p.user_id
"#;

pub struct ReviewRepository {
    connection_pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_by_session_id(&self, session_id: &i64) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(
            "SELECT review_id, session_id, rating, comment, created_at FROM reviews WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Recensioni ricevute da un mentor, dalla più recente
    pub async fn find_many_by_mentor(
        &self,
        mentor_id: &i64,
        limit: i64,
    ) -> Result<Vec<ReviewWithSession>, Error> {
        sqlx::query_as::<_, ReviewWithSession>(&format!(
            "{REVIEW_WITH_SESSION_SELECT} WHERE s.mentor_id = ? ORDER BY r.created_at DESC LIMIT ?"
        ))
        .bind(mentor_id)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_many(&self, rating: Option<i64>) -> Result<Vec<ReviewWithSession>, Error> {
        sqlx::query_as::<_, ReviewWithSession>(&format!(
            "{REVIEW_WITH_SESSION_SELECT} WHERE (? IS NULL OR r.rating = ?) ORDER BY r.created_at DESC"
        ))
        .bind(rating)
        .bind(rating)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Review, CreateReviewDTO> for ReviewRepository {
    async fn create(&self, data: &CreateReviewDTO) -> Result<Review, Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO reviews (session_id, rating, comment, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.session_id)
        .bind(data.rating)
        .bind(&data.comment)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Review {
            review_id: result.last_insert_rowid(),
            session_id: data.session_id,
            rating: data.rating,
            comment: data.comment.clone(),
            created_at: now,
        })
    }
}

impl Read<Review, i64> for ReviewRepository {
    async fn read(&self, id: &i64) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(
            "SELECT review_id, session_id, rating, comment, created_at FROM reviews WHERE review_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
