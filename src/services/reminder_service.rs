use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use super::goal_service::load_owned_goal;
use crate::database::Store;
use crate::models::{Reminder, ReminderRequest};
use crate::utils::{validate_request, AppError};

fn check_request(request: &ReminderRequest) -> Result<(), AppError> {
    validate_request(request)?;
    if request.requires_weekday() {
        return Err(AppError::invalid_field(
            "weekday",
            "Weekday is required for weekly reminders",
        ));
    }
    Ok(())
}

/// Loads a reminder whose goal belongs to `user_id`.
async fn load_owned_reminder(
    store: &dyn Store,
    user_id: &ObjectId,
    reminder_id: &ObjectId,
) -> Result<Reminder, AppError> {
    let reminder = store
        .find_reminder(reminder_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reminder"))?;

    load_owned_goal(store, user_id, &reminder.goal).await?;
    Ok(reminder)
}

pub async fn get_reminder(store: &dyn Store, user_id: &ObjectId, reminder_id: &ObjectId) -> Result<Reminder, AppError> {
    load_owned_reminder(store, user_id, reminder_id).await
}

pub async fn create_reminder(
    store: &dyn Store,
    user_id: &ObjectId,
    goal_id: &ObjectId,
    request: ReminderRequest,
) -> Result<Reminder, AppError> {
    check_request(&request)?;

    let mut goal = load_owned_goal(store, user_id, goal_id).await?;
    let now = Utc::now();
    let reminder = Reminder::new(goal.id, request, now);
    store.insert_reminder(&reminder).await?;

    goal.reminders.push(reminder.id);
    goal.updated_at = now;
    store.save_goal(&goal).await?;

    log::info!("⏰ Reminder {} created for goal {}", reminder.id, goal_id);
    Ok(reminder)
}

pub async fn update_reminder(
    store: &dyn Store,
    user_id: &ObjectId,
    reminder_id: &ObjectId,
    request: ReminderRequest,
) -> Result<Reminder, AppError> {
    check_request(&request)?;

    let mut reminder = load_owned_reminder(store, user_id, reminder_id).await?;
    reminder.apply(request, Utc::now());
    store.save_reminder(&reminder).await?;
    Ok(reminder)
}

pub async fn delete_reminder(store: &dyn Store, user_id: &ObjectId, reminder_id: &ObjectId) -> Result<(), AppError> {
    let reminder = load_owned_reminder(store, user_id, reminder_id).await?;
    store.delete_reminder(&reminder.id).await?;

    if let Some(mut goal) = store.find_goal(&reminder.goal).await? {
        goal.reminders.retain(|id| id != reminder_id);
        goal.updated_at = Utc::now();
        store.save_goal(&goal).await?;
    }

    log::info!("🗑️ Reminder {} deleted", reminder_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::goal::sample_goal;
    use crate::models::{Goal, ReminderTime, ReminderType};

    async fn seed_goal(store: &MemoryStore) -> Goal {
        let goal = sample_goal(ObjectId::new());
        store.insert_goal(&goal).await.unwrap();
        goal
    }

    fn weekly(weekday: Option<u8>) -> ReminderRequest {
        ReminderRequest {
            reminder_type: ReminderType::Weekly,
            weekday,
            time: ReminderTime { hour: 18, minute: 30 },
        }
    }

    #[tokio::test]
    async fn test_create_links_reminder_to_goal() {
        let store = MemoryStore::new();
        let goal = seed_goal(&store).await;

        let reminder = create_reminder(&store, &goal.author, &goal.id, weekly(Some(1))).await.unwrap();
        assert_eq!(reminder.goal, goal.id);

        let stored = store.find_goal(&goal.id).await.unwrap().unwrap();
        assert_eq!(stored.reminders, vec![reminder.id]);
    }

    #[tokio::test]
    async fn test_weekly_requires_weekday() {
        let store = MemoryStore::new();
        let goal = seed_goal(&store).await;

        let result = create_reminder(&store, &goal.author, &goal.id, weekly(None)).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(store.reminder_count(), 0);
    }

    #[tokio::test]
    async fn test_other_users_cannot_read_or_change() {
        let store = MemoryStore::new();
        let goal = seed_goal(&store).await;
        let reminder = create_reminder(&store, &goal.author, &goal.id, weekly(Some(3))).await.unwrap();
        let stranger = ObjectId::new();

        assert!(matches!(
            get_reminder(&store, &stranger, &reminder.id).await,
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            create_reminder(&store, &stranger, &goal.id, weekly(Some(3))).await,
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            delete_reminder(&store, &stranger, &reminder.id).await,
            Err(AppError::NotAuthorized)
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let goal = seed_goal(&store).await;
        let reminder = create_reminder(&store, &goal.author, &goal.id, weekly(Some(3))).await.unwrap();

        let daily = ReminderRequest {
            reminder_type: ReminderType::Daily,
            weekday: None,
            time: ReminderTime { hour: 6, minute: 0 },
        };
        let updated = update_reminder(&store, &goal.author, &reminder.id, daily).await.unwrap();
        assert_eq!(updated.reminder_type, ReminderType::Daily);
        assert_eq!(updated.time.hour, 6);

        delete_reminder(&store, &goal.author, &reminder.id).await.unwrap();
        assert!(store.find_reminder(&reminder.id).await.unwrap().is_none());
        let stored = store.find_goal(&goal.id).await.unwrap().unwrap();
        assert!(stored.reminders.is_empty());
    }

    #[tokio::test]
    async fn test_missing_reminder() {
        let store = MemoryStore::new();
        let result = get_reminder(&store, &ObjectId::new(), &ObjectId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Reminder not found"));
    }
}
