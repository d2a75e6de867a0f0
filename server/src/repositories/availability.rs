//! AvailabilityRepository - Fasce orarie settimanali dei mentor

use super::{Delete, Read};
use crate::dtos::CreateAvailabilityDTO;
use crate::entities::Availability;
use sqlx::{Error, SqlitePool};

const AVAILABILITY_SELECT: &str =
    "SELECT availability_id, mentor_id, weekday, start_time, end_time FROM availabilities";

pub struct AvailabilityRepository {
    connection_pool: SqlitePool,
}

impl AvailabilityRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Fasce del mentor ordinate per giorno e ora di inizio
    pub async fn find_many_by_mentor(&self, mentor_id: &i64) -> Result<Vec<Availability>, Error> {
        sqlx::query_as::<_, Availability>(&format!(
            "{AVAILABILITY_SELECT} WHERE mentor_id = ? ORDER BY weekday ASC, start_time ASC"
        ))
        .bind(mentor_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Inserisce la fascia solo se non si sovrappone ad altre dello stesso giorno
    ///
    /// Due fasce si sovrappongono se gli intervalli [start, end) si intersecano. Controllo
    /// e insert sono un'unica istruzione; None se la fascia è occupata.
    pub async fn create_if_free(
        &self,
        data: &CreateAvailabilityDTO,
    ) -> Result<Option<Availability>, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO availabilities (mentor_id, weekday, start_time, end_time)
            SELECT ?, ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM availabilities
                WHERE mentor_id = ? AND weekday = ? AND start_time < ? AND ? < end_time
            )
            "#,
        )
        .bind(data.mentor_id)
        .bind(data.weekday)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.mentor_id)
        .bind(data.weekday)
        .bind(data.end_time)
        .bind(data.start_time)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Availability {
            availability_id: result.last_insert_rowid(),
            mentor_id: data.mentor_id,
            weekday: data.weekday,
            start_time: data.start_time,
            end_time: data.end_time,
        }))
    }
}

impl Read<Availability, i64> for AvailabilityRepository {
    async fn read(&self, id: &i64) -> Result<Option<Availability>, Error> {
        sqlx::query_as::<_, Availability>(&format!(
            "{AVAILABILITY_SELECT} WHERE availability_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for AvailabilityRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM availabilities WHERE availability_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "sessions")))]
    async fn test_find_by_mentor_is_ordered(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AvailabilityRepository::new(pool);

        let slots = repo.find_many_by_mentor(&1).await?;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].weekday, 0);
        assert_eq!(slots[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slots[1].weekday, 2);

        assert!(repo.find_many_by_mentor(&2).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_and_delete(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AvailabilityRepository::new(pool);

        let slot = repo
            .create_if_free(&CreateAvailabilityDTO {
                mentor_id: 3,
                weekday: 5,
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            })
            .await?
            .expect("no other slot on saturday");

        let stored = repo.read(&slot.availability_id).await?.unwrap();
        assert_eq!(stored.end_time, NaiveTime::from_hms_opt(11, 30, 0).unwrap());

        assert!(repo.delete(&slot.availability_id).await?);
        assert!(!repo.delete(&slot.availability_id).await?);
        Ok(())
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn alice_slot(weekday: i64, start: NaiveTime, end: NaiveTime) -> CreateAvailabilityDTO {
        CreateAvailabilityDTO {
            mentor_id: 1,
            weekday,
            start_time: start,
            end_time: end,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "sessions")))]
    async fn test_overlapping_slot_is_not_inserted(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AvailabilityRepository::new(pool);

        // alice ha lunedì 09:00-12:00
        for (start, end) in [(t(11, 0), t(13, 0)), (t(8, 0), t(9, 30)), (t(10, 0), t(11, 0))] {
            assert!(repo.create_if_free(&alice_slot(0, start, end)).await?.is_none());
        }
        assert_eq!(repo.find_many_by_mentor(&1).await?.len(), 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "sessions")))]
    async fn test_adjacent_or_other_day_slot_is_inserted(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AvailabilityRepository::new(pool);

        assert!(repo.create_if_free(&alice_slot(0, t(12, 0), t(13, 0))).await?.is_some());
        assert!(repo.create_if_free(&alice_slot(0, t(7, 0), t(9, 0))).await?.is_some());
        assert!(repo.create_if_free(&alice_slot(1, t(9, 0), t(12, 0))).await?.is_some());
        // lo stesso orario di carol non conta
        assert!(repo.create_if_free(&alice_slot(4, t(18, 0), t(20, 0))).await?.is_some());
        assert_eq!(repo.find_many_by_mentor(&1).await?.len(), 6);
        Ok(())
    }
}
