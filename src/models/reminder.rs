use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderType {
    Daily,
    Weekly,
}

/// Time of day the reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReminderTime {
    #[validate(range(max = 23, message = "Hour must be between 0 and 23"))]
    pub hour: u8,
    #[validate(range(max = 59, message = "Minute must be between 0 and 59"))]
    pub minute: u8,
}

/// Reminder document (collection "reminders")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    /// 0 = Sunday .. 6 = Saturday; set for weekly reminders
    #[serde(default)]
    pub weekday: Option<u8>,
    pub time: ReminderTime,
    pub goal: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(goal: ObjectId, request: ReminderRequest, now: DateTime<Utc>) -> Self {
        Reminder {
            id: ObjectId::new(),
            reminder_type: request.reminder_type,
            weekday: request.weekday,
            time: request.time,
            goal,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, request: ReminderRequest, now: DateTime<Utc>) {
        self.reminder_type = request.reminder_type;
        self.weekday = request.weekday;
        self.time = request.time;
        self.updated_at = now;
    }
}

/// Body for both creating and replacing a reminder.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReminderRequest {
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    #[validate(range(max = 6, message = "Weekday must be between 0 and 6"))]
    pub weekday: Option<u8>,
    #[validate(nested)]
    pub time: ReminderTime,
}

impl ReminderRequest {
    pub fn requires_weekday(&self) -> bool {
        self.reminder_type == ReminderType::Weekly && self.weekday.is_none()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReminderResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub weekday: Option<u8>,
    pub time: ReminderTime,
    pub goal: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderResponse {
    fn from(reminder: Reminder) -> Self {
        ReminderResponse {
            id: reminder.id.to_hex(),
            reminder_type: reminder.reminder_type,
            weekday: reminder.weekday,
            time: reminder.time,
            goal: reminder.goal.to_hex(),
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_and_validates() {
        let request: ReminderRequest = serde_json::from_value(serde_json::json!({
            "type": "WEEKLY",
            "weekday": 2,
            "time": { "hour": 7, "minute": 30 }
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(!request.requires_weekday());
    }

    #[test]
    fn test_out_of_range_time_rejected() {
        let request = ReminderRequest {
            reminder_type: ReminderType::Daily,
            weekday: None,
            time: ReminderTime { hour: 24, minute: 0 },
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_weekly_without_weekday() {
        let request = ReminderRequest {
            reminder_type: ReminderType::Weekly,
            weekday: None,
            time: ReminderTime { hour: 8, minute: 0 },
        };
        assert!(request.requires_weekday());
    }
}
