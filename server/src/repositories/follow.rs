//! FollowRepository - Relazione asimmetrica "segue"

use super::{Create, Delete, Read};
use crate::dtos::ProfileSummaryDTO;
use crate::entities::Follow;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct FollowRepository {
    connection_pool: SqlitePool,
}

impl FollowRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Profili che seguono `profile_id`
    pub async fn find_followers(&self, profile_id: &i64) -> Result<Vec<ProfileSummaryDTO>, Error> {
        sqlx::query_as::<_, ProfileSummaryDTO>(
            r#"
            SELECT p.profile_id, u.username, p.role
            FROM follows f
            JOIN profiles p ON p.profile_id = f.follower_id
            JOIN users u ON u.user_id = p.user_id
            WHERE f.following_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Profili seguiti da `profile_id`
    pub async fn find_following(&self, profile_id: &i64) -> Result<Vec<ProfileSummaryDTO>, Error> {
        sqlx::query_as::<_, ProfileSummaryDTO>(
            r#"
            SELECT p.profile_id, u.username, p.role
            FROM follows f
            JOIN profiles p ON p.profile_id = f.following_id
            JOIN users u ON u.user_id = p.user_id
            WHERE f.follower_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// (followers, following)
    pub async fn count_for(&self, profile_id: &i64) -> Result<(i64, i64), Error> {
        sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM follows WHERE following_id = ?),
                (SELECT COUNT(*) FROM follows WHERE follower_id = ?)
            "#,
        )
        .bind(profile_id)
        .bind(profile_id)
        .fetch_one(&self.connection_pool)
        .await
    }
}

/// La chiave è la coppia (follower_id, following_id)
impl Create<Follow, (i64, i64)> for FollowRepository {
    async fn create(&self, data: &(i64, i64)) -> Result<Follow, Error> {
        let (follower_id, following_id) = *data;
        let created_at = Utc::now();
        sqlx::query("INSERT INTO follows (follower_id, following_id, created_at) VALUES (?, ?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .bind(created_at)
            .execute(&self.connection_pool)
            .await?;

        Ok(Follow {
            follower_id,
            following_id,
            created_at,
        })
    }
}

impl Read<Follow, (i64, i64)> for FollowRepository {
    async fn read(&self, id: &(i64, i64)) -> Result<Option<Follow>, Error> {
        sqlx::query_as::<_, Follow>(
            r#"
            SELECT follower_id, following_id, created_at
            FROM follows
            WHERE follower_id = ? AND following_id = ?
            "#,
        )
        .bind(id.0)
        .bind(id.1)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<(i64, i64)> for FollowRepository {
    async fn delete(&self, id: &(i64, i64)) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(id.0)
            .bind(id.1)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
