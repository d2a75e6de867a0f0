//! Availability DTOs

use crate::entities::Availability;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AvailabilityDTO {
    pub availability_id: i64,
    pub mentor_id: i64,
    pub weekday: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<Availability> for AvailabilityDTO {
    fn from(value: Availability) -> Self {
        Self {
            availability_id: value.availability_id,
            mentor_id: value.mentor_id,
            weekday: value.weekday,
            start_time: value.start_time,
            end_time: value.end_time,
        }
    }
}

/// Body di POST /availability. `mentor_id` viene preso dal profilo autenticato
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateAvailabilityDTO {
    #[serde(default)]
    pub mentor_id: i64,

    #[validate(range(min = 0, max = 6, message = "Weekday must be between 0 (Monday) and 6 (Sunday)"))]
    pub weekday: i64,

    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
