use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::trim_opt;

/// Lifecycle status of a goal.
///
/// Serialized by name (`"IN_PROGRESS"`); older documents and clients that
/// sent the numeric code (0..=5, in declaration order) are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "RawStatus")]
pub enum GoalStatus {
    NotStarted,
    Started,
    InProgress,
    Paused,
    Accomplished,
    Aborted,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 6] = [
        GoalStatus::NotStarted,
        GoalStatus::Started,
        GoalStatus::InProgress,
        GoalStatus::Paused,
        GoalStatus::Accomplished,
        GoalStatus::Aborted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "NOT_STARTED",
            GoalStatus::Started => "STARTED",
            GoalStatus::InProgress => "IN_PROGRESS",
            GoalStatus::Paused => "PAUSED",
            GoalStatus::Accomplished => "ACCOMPLISHED",
            GoalStatus::Aborted => "ABORTED",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown goal status: {}", s))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(u8),
    Name(String),
}

impl TryFrom<RawStatus> for GoalStatus {
    type Error = String;

    fn try_from(raw: RawStatus) -> Result<Self, Self::Error> {
        match raw {
            RawStatus::Code(code) => {
                GoalStatus::from_code(code).ok_or_else(|| format!("Unknown goal status code: {}", code))
            }
            RawStatus::Name(name) => name.parse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalCategory {
    PersonalDevelopment,
    Education,
    Hobby,
    Business,
    Health,
}

#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatus { from: GoalStatus, to: GoalStatus },

    #[error("Day already recorded: {0}")]
    DayAlreadyRecorded(NaiveDate),

    #[error("Day not recorded: {0}")]
    DayNotRecorded(NaiveDate),
}

/// Goal document (collection "goals")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub status: GoalStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub goal_type: i32,
    #[serde(default)]
    pub frequency: Option<i32>,
    /// Recorded days, kept sorted and unique.
    #[serde(default)]
    pub events: Vec<NaiveDate>,
    pub author: ObjectId,
    #[serde(default)]
    pub reminders: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(author: ObjectId, request: CreateGoalRequest, now: DateTime<Utc>) -> Self {
        Goal {
            id: ObjectId::new(),
            title: request.title,
            description: request.description,
            category: request.category,
            status: GoalStatus::NotStarted,
            start_date: None,
            end_date: None,
            goal_type: request.goal_type.unwrap_or_default(),
            frequency: request.frequency,
            events: Vec::new(),
            author,
            reminders: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &ObjectId) -> bool {
        &self.author == user_id
    }

    /// Moves the goal to `requested`, adjusting timestamps and events.
    pub fn transition(&mut self, requested: GoalStatus, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        use GoalStatus::*;

        match (self.status, requested) {
            (_, Aborted) => {
                self.status = NotStarted;
                self.start_date = None;
                self.end_date = None;
                self.events.clear();
            }
            (_, Accomplished) => {
                self.status = Accomplished;
                self.end_date = Some(now);
            }
            (NotStarted, Started) | (NotStarted, InProgress) | (Started, InProgress) => {
                self.status = requested;
                self.start_date.get_or_insert(now);
            }
            (Started, Paused) | (InProgress, Paused) => {
                self.status = Paused;
                self.start_date = None;
            }
            (Paused, InProgress) => {
                self.status = InProgress;
                self.events.clear();
                self.start_date = Some(now);
            }
            (from, to) => return Err(WorkflowError::InvalidStatus { from, to }),
        }

        self.updated_at = now;
        Ok(())
    }

    /// Records a completed day; a STARTED goal becomes IN_PROGRESS.
    pub fn record_day(&mut self, day: NaiveDate, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        match self.events.binary_search(&day) {
            Ok(_) => return Err(WorkflowError::DayAlreadyRecorded(day)),
            Err(pos) => self.events.insert(pos, day),
        }

        if self.status == GoalStatus::Started {
            self.status = GoalStatus::InProgress;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn remove_day(&mut self, day: NaiveDate, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        let pos = self
            .events
            .binary_search(&day)
            .map_err(|_| WorkflowError::DayNotRecorded(day))?;
        self.events.remove(pos);
        self.updated_at = now;
        Ok(())
    }

    pub fn apply_update(&mut self, request: UpdateGoalRequest, now: DateTime<Utc>) {
        if let Some(title) = request.title {
            self.title = title;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(category) = request.category {
            self.category = category;
        }
        if let Some(goal_type) = request.goal_type {
            self.goal_type = goal_type;
        }
        if let Some(frequency) = request.frequency {
            self.frequency = Some(frequency);
        }
        self.updated_at = now;
    }
}

/// Request para criar meta
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGoalRequest {
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
    pub category: GoalCategory,
    #[serde(rename = "type", default)]
    #[validate(range(min = 0, message = "Type must not be negative"))]
    pub goal_type: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Frequency must be at least 1"))]
    pub frequency: Option<i32>,
}

impl CreateGoalRequest {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

/// Request para atualizar meta
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: Option<String>,
    pub category: Option<GoalCategory>,
    #[serde(rename = "type", default)]
    #[validate(range(min = 0, message = "Type must not be negative"))]
    pub goal_type: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Frequency must be at least 1"))]
    pub frequency: Option<i32>,
}

impl UpdateGoalRequest {
    pub fn normalized(mut self) -> Self {
        trim_opt(&mut self.title);
        trim_opt(&mut self.description);
        self
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecordDayRequest {
    /// Day to record (YYYY-MM-DD); today (UTC) when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoalResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub status: GoalStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub goal_type: i32,
    pub frequency: Option<i32>,
    pub events: Vec<NaiveDate>,
    pub author: String,
    pub reminders: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        GoalResponse {
            id: goal.id.to_hex(),
            title: goal.title,
            description: goal.description,
            category: goal.category,
            status: goal.status,
            start_date: goal.start_date,
            end_date: goal.end_date,
            goal_type: goal.goal_type,
            frequency: goal.frequency,
            events: goal.events,
            author: goal.author.to_hex(),
            reminders: goal.reminders.iter().map(|id| id.to_hex()).collect(),
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_goal(author: ObjectId) -> Goal {
    Goal::new(
        author,
        CreateGoalRequest {
            title: "Learn Rust".into(),
            description: "Finish the async chapter".into(),
            category: GoalCategory::Education,
            goal_type: None,
            frequency: Some(3),
        },
        Utc::now(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_accepts_names_and_codes() {
        let by_name: GoalStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        let by_code: GoalStatus = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, GoalStatus::InProgress);
        assert_eq!(by_code, GoalStatus::InProgress);
        assert_eq!(serde_json::to_string(&GoalStatus::NotStarted).unwrap(), "\"NOT_STARTED\"");

        assert!(serde_json::from_str::<GoalStatus>("9").is_err());
        assert!(serde_json::from_str::<GoalStatus>("\"DONE\"").is_err());
    }

    #[test]
    fn test_start_pause_abort_scenario() {
        let mut goal = sample_goal(ObjectId::new());
        let now = Utc::now();
        assert_eq!(goal.status, GoalStatus::NotStarted);

        goal.transition(GoalStatus::InProgress, now).unwrap();
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert_eq!(goal.start_date, Some(now));

        goal.record_day(day("2024-03-01"), now).unwrap();
        goal.transition(GoalStatus::Paused, now).unwrap();
        assert_eq!(goal.status, GoalStatus::Paused);
        assert!(goal.start_date.is_none());

        goal.transition(GoalStatus::Aborted, now).unwrap();
        assert_eq!(goal.status, GoalStatus::NotStarted);
        assert!(goal.start_date.is_none());
        assert!(goal.events.is_empty());
    }

    #[test]
    fn test_start_keeps_existing_timestamp() {
        let mut goal = sample_goal(ObjectId::new());
        let first = Utc::now();
        goal.transition(GoalStatus::Started, first).unwrap();
        goal.transition(GoalStatus::InProgress, first + Duration::days(2)).unwrap();
        assert_eq!(goal.start_date, Some(first));
    }

    #[test]
    fn test_resume_clears_events_and_restarts() {
        let mut goal = sample_goal(ObjectId::new());
        let start = Utc::now();
        goal.transition(GoalStatus::InProgress, start).unwrap();
        goal.record_day(day("2024-03-01"), start).unwrap();
        goal.transition(GoalStatus::Paused, start).unwrap();

        let resumed = start + Duration::days(5);
        goal.transition(GoalStatus::InProgress, resumed).unwrap();
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert_eq!(goal.start_date, Some(resumed));
        assert!(goal.events.is_empty());
    }

    #[test]
    fn test_accomplished_from_any_state_sets_end() {
        for from in [GoalStatus::NotStarted, GoalStatus::Paused, GoalStatus::InProgress] {
            let mut goal = sample_goal(ObjectId::new());
            goal.status = from;
            let now = Utc::now();
            goal.transition(GoalStatus::Accomplished, now).unwrap();
            assert_eq!(goal.status, GoalStatus::Accomplished);
            assert_eq!(goal.end_date, Some(now));
        }
    }

    #[test]
    fn test_abort_always_clears_start_and_events() {
        for from in GoalStatus::ALL {
            let mut goal = sample_goal(ObjectId::new());
            goal.status = from;
            goal.start_date = Some(Utc::now());
            goal.events = vec![day("2024-01-01"), day("2024-01-02")];

            goal.transition(GoalStatus::Aborted, Utc::now()).unwrap();
            assert_eq!(goal.status, GoalStatus::NotStarted, "from {}", from);
            assert!(goal.start_date.is_none());
            assert!(goal.events.is_empty());
        }
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let cases = [
            (GoalStatus::NotStarted, GoalStatus::Paused),
            (GoalStatus::NotStarted, GoalStatus::NotStarted),
            (GoalStatus::Paused, GoalStatus::Started),
            (GoalStatus::Accomplished, GoalStatus::InProgress),
            (GoalStatus::InProgress, GoalStatus::Started),
        ];

        for (from, to) in cases {
            let mut goal = sample_goal(ObjectId::new());
            goal.status = from;
            assert_eq!(
                goal.transition(to, Utc::now()),
                Err(WorkflowError::InvalidStatus { from, to })
            );
            assert_eq!(goal.status, from);
        }
    }

    #[test]
    fn test_record_day_twice_rejected() {
        let mut goal = sample_goal(ObjectId::new());
        let now = Utc::now();
        goal.record_day(day("2024-05-10"), now).unwrap();
        assert_eq!(
            goal.record_day(day("2024-05-10"), now),
            Err(WorkflowError::DayAlreadyRecorded(day("2024-05-10")))
        );
        assert_eq!(goal.events.len(), 1);
    }

    #[test]
    fn test_record_day_keeps_order_and_promotes_started() {
        let mut goal = sample_goal(ObjectId::new());
        let now = Utc::now();
        goal.transition(GoalStatus::Started, now).unwrap();

        goal.record_day(day("2024-05-10"), now).unwrap();
        goal.record_day(day("2024-05-08"), now).unwrap();
        assert_eq!(goal.events, vec![day("2024-05-08"), day("2024-05-10")]);
        assert_eq!(goal.status, GoalStatus::InProgress);
    }

    #[test]
    fn test_remove_day() {
        let mut goal = sample_goal(ObjectId::new());
        let now = Utc::now();
        goal.record_day(day("2024-05-10"), now).unwrap();
        goal.remove_day(day("2024-05-10"), now).unwrap();
        assert!(goal.events.is_empty());
        assert_eq!(
            goal.remove_day(day("2024-05-10"), now),
            Err(WorkflowError::DayNotRecorded(day("2024-05-10")))
        );
    }

    #[test]
    fn test_update_request_trims_and_validates() {
        let request = UpdateGoalRequest {
            title: Some("  Read  ".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(request.title.as_deref(), Some("Read"));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_uses_hex_ids() {
        let mut goal = sample_goal(ObjectId::new());
        let reminder = ObjectId::new();
        goal.reminders.push(reminder);

        let response = GoalResponse::from(goal.clone());
        assert_eq!(response.id, goal.id.to_hex());
        assert_eq!(response.author, goal.author.to_hex());
        assert_eq!(response.reminders, vec![reminder.to_hex()]);
    }
}
