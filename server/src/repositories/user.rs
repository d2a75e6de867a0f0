//! UserRepository - Repository per la gestione degli utenti

use super::{Create, Delete, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, SqlitePool};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match (username is unique)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, is_staff, date_joined FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn exists_by_username(&self, username: &str) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// Inserisce utente e profilo nella stessa transazione
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO users (username, password, is_staff, date_joined) VALUES (?, ?, 0, ?)",
        )
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.date_joined)
        .execute(&mut *tx)
        .await?;
        let user_id = result.last_insert_rowid();

        sqlx::query("INSERT INTO profiles (user_id, role) VALUES (?, ?)")
            .bind(user_id)
            .bind(data.role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(User {
            user_id,
            username: data.username.clone(),
            password: data.password.clone(),
            is_staff: false,
            date_joined: data.date_joined,
        })
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, is_staff, date_joined FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for UserRepository {
    /// ON DELETE CASCADE rimuove profilo e tutto ciò che ne dipende
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProfileRole;
    use crate::repositories::ProfileRepository;
    use chrono::Utc;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_username(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let alice = repo.find_by_username("alice").await?.expect("alice exists");
        assert_eq!(alice.user_id, 1);
        assert!(!alice.is_staff);

        let root = repo.find_by_username("root").await?.expect("root exists");
        assert!(root.is_staff);

        assert!(repo.find_by_username("nobody").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_and_delete(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let created = repo
            .create(&CreateUserDTO {
                username: "erin".to_string(),
                password: "hash".to_string(),
                date_joined: Utc::now(),
                role: ProfileRole::Mentee,
            })
            .await?;
        assert!(created.user_id > 5);
        assert!(repo.exists_by_username("erin").await?);

        assert!(repo.delete(&created.user_id).await?);
        assert!(repo.read(&created.user_id).await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_inserts_profile(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool.clone());
        let profiles = ProfileRepository::new(pool);

        let created = repo
            .create(&CreateUserDTO {
                username: "frank".to_string(),
                password: "hash".to_string(),
                date_joined: Utc::now(),
                role: ProfileRole::Mentor,
            })
            .await?;

        let profile = profiles
            .find_by_user_id(&created.user_id)
            .await?
            .expect("profile created with the user");
        assert_eq!(profile.role, ProfileRole::Mentor);
        assert_eq!(profile.username, "frank");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_failed_profile_insert_rolls_back_user(pool: SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "CREATE TRIGGER reject_profiles BEFORE INSERT ON profiles \
             BEGIN SELECT RAISE(ABORT, 'profiles disabled'); END",
        )
        .execute(&pool)
        .await?;
        let repo = UserRepository::new(pool);

        let result = repo
            .create(&CreateUserDTO {
                username: "grace".to_string(),
                password: "hash".to_string(),
                date_joined: Utc::now(),
                role: ProfileRole::Mentee,
            })
            .await;
        assert!(result.is_err());

        // nessun utente orfano senza profilo
        assert!(!repo.exists_by_username("grace").await?);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_duplicate_username_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let err = repo
            .create(&CreateUserDTO {
                username: "alice".to_string(),
                password: "hash".to_string(),
                date_joined: Utc::now(),
                role: ProfileRole::Mentee,
            })
            .await
            .expect_err("username is unique");
        match err {
            Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }
}
