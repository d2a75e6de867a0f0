//! PostRepository - Post, like e commenti del feed

use super::{Create, Delete, Read};
use crate::dtos::{CreateCommentDTO, CreatePostDTO};
use crate::entities::{Comment, Post, PostWithStats};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

/// Il primo parametro è il profilo che legge (per `liked_by_me`)
const POST_WITH_STATS_SELECT: &str = r#"
    SELECT p.post_id, p.author_id, u.username AS author_username, p.content, p.created_at,
           (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.post_id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.post_id) AS comment_count,
           EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.post_id AND l.profile_id = ?)
               AS liked_by_me
    FROM posts p
    JOIN profiles pr ON pr.profile_id = p.author_id
    JOIN users u ON u.user_id = pr.user_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.comment_id, c.post_id, c.author_id, u.username AS author_username,
           c.content, c.created_at
    FROM comments c
    JOIN profiles pr ON pr.profile_id = c.author_id
    JOIN users u ON u.user_id = pr.user_id
"#;

pub struct PostRepository {
    connection_pool: SqlitePool,
}

impl PostRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Feed del profilo: i suoi post, quelli dei profili seguiti e dei collegamenti accettati
    pub async fn find_feed(
        &self,
        viewer_id: &i64,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<PostWithStats>, Error> {
        sqlx::query_as::<_, PostWithStats>(&format!(
            r#"{POST_WITH_STATS_SELECT}
            WHERE (
                p.author_id = ?
                OR p.author_id IN (SELECT following_id FROM follows WHERE follower_id = ?)
                OR p.author_id IN (
                    SELECT CASE WHEN requester_id = ? THEN addressee_id ELSE requester_id END
                    FROM connections
                    WHERE (requester_id = ? OR addressee_id = ?) AND status = 'ACCEPTED'
                )
            )
            AND (? IS NULL OR p.created_at < ?)
            ORDER BY p.created_at DESC, p.post_id DESC
            LIMIT ?"#
        ))
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(before_date)
        .bind(before_date)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_with_stats(
        &self,
        post_id: &i64,
        viewer_id: &i64,
    ) -> Result<Option<PostWithStats>, Error> {
        sqlx::query_as::<_, PostWithStats>(&format!(
            "{POST_WITH_STATS_SELECT} WHERE p.post_id = ?"
        ))
        .bind(viewer_id)
        .bind(post_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Ritorna `false` se il like era già presente
    pub async fn like(&self, post_id: &i64, profile_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, profile_id, created_at) VALUES (?, ?, ?)
            ON CONFLICT (post_id, profile_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(profile_id)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unlike(&self, post_id: &i64, profile_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND profile_id = ?")
            .bind(post_id)
            .bind(profile_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_comments(&self, post_id: &i64) -> Result<Vec<Comment>, Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at ASC, c.comment_id ASC"
        ))
        .bind(post_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_comment(&self, comment_id: &i64) -> Result<Option<Comment>, Error> {
        sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.comment_id = ?"))
            .bind(comment_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn create_comment(&self, data: &CreateCommentDTO) -> Result<Comment, Error> {
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.post_id)
        .bind(data.author_id)
        .bind(&data.content)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        self.find_comment(&result.last_insert_rowid())
            .await?
            .ok_or(Error::RowNotFound)
    }

    pub async fn delete_comment(&self, comment_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?")
            .bind(comment_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Create<Post, CreatePostDTO> for PostRepository {
    async fn create(&self, data: &CreatePostDTO) -> Result<Post, Error> {
        let result =
            sqlx::query("INSERT INTO posts (author_id, content, created_at) VALUES (?, ?, ?)")
                .bind(data.author_id)
                .bind(&data.content)
                .bind(Utc::now())
                .execute(&self.connection_pool)
                .await?;

        self.read(&result.last_insert_rowid())
            .await?
            .ok_or(Error::RowNotFound)
    }
}

impl Read<Post, i64> for PostRepository {
    async fn read(&self, id: &i64) -> Result<Option<Post>, Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.post_id, p.author_id, u.username AS author_username, p.content, p.created_at
            FROM posts p
            JOIN profiles pr ON pr.profile_id = p.author_id
            JOIN users u ON u.user_id = pr.user_id
            WHERE p.post_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

/// Like e commenti vengono rimossi in cascata
impl Delete<i64> for PostRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "social")))]
    async fn test_feed_includes_follows_and_connections(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        // bob: post proprio (4), segue alice (1), collegato a carol (2)
        let feed = repo.find_feed(&2, None, 20).await?;
        let ids: Vec<i64> = feed.iter().map(|p| p.post.post_id).collect();
        assert_eq!(ids, vec![4, 2, 1]);

        let alice_post = feed.iter().find(|p| p.post.post_id == 1).unwrap();
        assert_eq!(alice_post.like_count, 2);
        assert_eq!(alice_post.comment_count, 1);
        assert_eq!(alice_post.liked_by_me, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "social")))]
    async fn test_feed_pagination(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        let first = repo.find_feed(&2, None, 2).await?;
        assert_eq!(first.len(), 2);
        let cursor = first[1].post.created_at;

        let second = repo.find_feed(&2, Some(&cursor), 2).await?;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].post.post_id, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "social")))]
    async fn test_like_is_idempotent(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        assert!(repo.like(&2, &1).await?);
        assert!(!repo.like(&2, &1).await?);
        let stats = repo.find_with_stats(&2, &1).await?.unwrap();
        assert_eq!(stats.like_count, 1);
        assert_eq!(stats.liked_by_me, 1);

        assert!(repo.unlike(&2, &1).await?);
        assert!(!repo.unlike(&2, &1).await?);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "social")))]
    async fn test_delete_post_cascades(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        assert!(repo.delete(&1).await?);
        assert!(repo.find_comment(&1).await?.is_none());
        assert!(repo.read(&1).await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_post_and_comment(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = PostRepository::new(pool);

        let post = repo
            .create(&CreatePostDTO {
                author_id: 3,
                content: "Ownership in five minutes".to_string(),
            })
            .await?;
        assert_eq!(post.author_username, "carol");

        let comment = repo
            .create_comment(&CreateCommentDTO {
                post_id: post.post_id,
                author_id: 4,
                content: "Great read".to_string(),
            })
            .await?;
        assert_eq!(comment.author_username, "dave");
        assert_eq!(repo.find_comments(&post.post_id).await?.len(), 1);
        Ok(())
    }
}
