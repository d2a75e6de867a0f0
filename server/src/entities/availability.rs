//! Availability entity - Fascia oraria settimanale in cui un mentor è disponibile

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Availability {
    pub availability_id: i64,
    pub mentor_id: i64,
    /// 0 = lunedì ... 6 = domenica
    pub weekday: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
