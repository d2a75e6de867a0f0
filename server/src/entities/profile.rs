//! Profile entity - Profilo mentor/mentee associato 1:1 a un utente

use super::enums::ProfileRole;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub profile_id: i64,
    pub user_id: i64,
    // letto in join da users
    pub username: String,
    pub role: ProfileRole,
    pub bio: String,
    /// Skill separate da virgola, es. "Python, Data Science, Resume Review"
    pub skills: String,
    /// Solo per i mentor
    pub hourly_rate: Option<f64>,
}

impl Profile {
    pub fn is_mentor(&self) -> bool {
        self.role == ProfileRole::Mentor
    }

    pub fn skill_list(&self) -> Vec<String> {
        split_skills(&self.skills)
    }
}

/// Divide una stringa di skill separate da virgola scartando gli elementi vuoti
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Forma canonica salvata a database: "a, b, c"
pub fn normalize_skills(skills: &str) -> String {
    split_skills(skills).join(", ")
}

/// Un mentor con le statistiche aggregate delle recensioni ricevute
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct MentorSummary {
    #[sqlx(flatten)]
    pub profile: Profile,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_skills() {
        assert_eq!(
            normalize_skills(" Python,, Data Science ,Resume Review,"),
            "Python, Data Science, Resume Review"
        );
        assert_eq!(normalize_skills(" , "), "");
    }

    #[test]
    fn test_skill_list() {
        let profile = Profile {
            profile_id: 1,
            user_id: 1,
            username: "alice".to_string(),
            role: ProfileRole::Mentor,
            bio: String::new(),
            skills: "Rust".to_string(),
            hourly_rate: Some(40.0),
        };
        assert!(profile.is_mentor());
        assert_eq!(profile.skill_list(), vec!["Rust".to_string()]);
    }
}
