//! ProfileRepository - Repository per profili e statistiche dei mentor

use super::{Read, Update};
use crate::dtos::UpdateProfileDTO;
use crate::entities::{MentorSummary, Profile, ProfileRole};
use sqlx::{Error, SqlitePool};

const PROFILE_SELECT: &str = r#"
    SELECT p.profile_id, p.user_id, u.username, p.role, p.bio, p.skills, p.hourly_rate
    FROM profiles p
    JOIN users u ON u.user_id = p.user_id
"#;

// media e numero di recensioni su tutte le sessioni in cui il profilo è mentor
const MENTOR_SUMMARY_SELECT: &str = r#"
    SELECT p.profile_id, p.user_id, u.username, p.role, p.bio, p.skills, p.hourly_rate,
           AVG(r.rating) AS avg_rating,
           COUNT(r.review_id) AS review_count
    FROM profiles p
    JOIN users u ON u.user_id = p.user_id
    LEFT JOIN sessions s ON s.mentor_id = p.profile_id
    LEFT JOIN reviews r ON r.session_id = s.session_id
"#;

/// `%` e `_` nell'input dell'utente vanno cercati come caratteri normali
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub struct ProfileRepository {
    connection_pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_by_user_id(&self, user_id: &i64) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Lista dei mentor con filtri opzionali su skill (sottostringa) e username (prefisso)
    pub async fn find_mentors(
        &self,
        skill: Option<&str>,
        username_prefix: Option<&str>,
    ) -> Result<Vec<MentorSummary>, Error> {
        let skill_pattern = skill.map(|s| format!("%{}%", escape_like(&s.trim().to_lowercase())));
        let username_pattern = username_prefix.map(|s| format!("{}%", escape_like(s.trim())));

        sqlx::query_as::<_, MentorSummary>(&format!(
            r#"{MENTOR_SUMMARY_SELECT}
            WHERE p.role = 'MENTOR'
              AND (? IS NULL OR LOWER(p.skills) LIKE ? ESCAPE '\')
              AND (? IS NULL OR u.username LIKE ? ESCAPE '\')
            GROUP BY p.profile_id
            ORDER BY u.username ASC"#
        ))
        .bind(&skill_pattern)
        .bind(&skill_pattern)
        .bind(&username_pattern)
        .bind(&username_pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Statistiche di un singolo profilo mentor, None se non esiste o non è mentor
    pub async fn find_mentor_summary(&self, profile_id: &i64) -> Result<Option<MentorSummary>, Error> {
        sqlx::query_as::<_, MentorSummary>(&format!(
            r#"{MENTOR_SUMMARY_SELECT}
            WHERE p.profile_id = ? AND p.role = 'MENTOR'
            GROUP BY p.profile_id"#
        ))
        .bind(profile_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn find_many(&self, role: Option<ProfileRole>) -> Result<Vec<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "{PROFILE_SELECT} WHERE (? IS NULL OR p.role = ?) ORDER BY p.profile_id ASC"
        ))
        .bind(role)
        .bind(role)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Read<Profile, i64> for ProfileRepository {
    async fn read(&self, id: &i64) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.profile_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Profile, UpdateProfileDTO, i64> for ProfileRepository {
    async fn update(&self, id: &i64, data: &UpdateProfileDTO) -> Result<Profile, Error> {
        // COALESCE mantiene il valore corrente per i campi non forniti
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET bio = COALESCE(?, bio),
                skills = COALESCE(?, skills),
                hourly_rate = COALESCE(?, hourly_rate)
            WHERE profile_id = ?
            "#,
        )
        .bind(&data.bio)
        .bind(&data.skills)
        .bind(data.hourly_rate)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
