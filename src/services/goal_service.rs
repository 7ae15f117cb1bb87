use chrono::{NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;

use crate::database::Store;
use crate::models::{CreateGoalRequest, Goal, GoalStatus, UpdateGoalRequest, User};
use crate::utils::{validate_request, AppError};

/// Loads a goal and checks that `user_id` authored it.
pub async fn load_owned_goal(store: &dyn Store, user_id: &ObjectId, goal_id: &ObjectId) -> Result<Goal, AppError> {
    let goal = store
        .find_goal(goal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Goal"))?;

    if !goal.is_authored_by(user_id) {
        log::warn!("⛔ User {} tried to access goal {} owned by {}", user_id, goal_id, goal.author);
        return Err(AppError::NotAuthorized);
    }
    Ok(goal)
}

pub async fn list_goals(store: &dyn Store, user_id: &ObjectId) -> Result<Vec<Goal>, AppError> {
    store.find_goals_by_author(user_id).await
}

pub async fn create_goal(
    store: &dyn Store,
    user_id: &ObjectId,
    request: CreateGoalRequest,
) -> Result<(Goal, User), AppError> {
    let request = request.normalized();
    validate_request(&request)?;

    let mut user = store
        .find_user(user_id)
        .await?
        .filter(|u| !u.deleted)
        .ok_or_else(|| AppError::not_found("User"))?;

    let now = Utc::now();
    let goal = Goal::new(*user_id, request, now);
    store.insert_goal(&goal).await?;

    user.goals.push(goal.id);
    user.updated_at = now;
    store.save_user(&user).await?;

    log::info!("✅ Goal {} created for user {}", goal.id, user_id);
    Ok((goal, user))
}

pub async fn update_goal(
    store: &dyn Store,
    user_id: &ObjectId,
    goal_id: &ObjectId,
    request: UpdateGoalRequest,
) -> Result<Goal, AppError> {
    let request = request.normalized();
    validate_request(&request)?;

    let mut goal = load_owned_goal(store, user_id, goal_id).await?;
    goal.apply_update(request, Utc::now());
    store.save_goal(&goal).await?;
    Ok(goal)
}

/// Deletes the goal and its reminders, then drops it from the author's list.
pub async fn delete_goal(store: &dyn Store, user_id: &ObjectId, goal_id: &ObjectId) -> Result<(), AppError> {
    let goal = load_owned_goal(store, user_id, goal_id).await?;

    let reminders = store.delete_reminders_for_goals(&[goal.id]).await?;
    store.delete_goal(&goal.id).await?;

    if let Some(mut user) = store.find_user(user_id).await? {
        user.goals.retain(|id| id != goal_id);
        user.updated_at = Utc::now();
        store.save_user(&user).await?;
    }

    log::info!("🗑️ Goal {} deleted ({} reminders)", goal_id, reminders);
    Ok(())
}

pub async fn change_status(
    store: &dyn Store,
    user_id: &ObjectId,
    goal_id: &ObjectId,
    status: GoalStatus,
) -> Result<Goal, AppError> {
    let mut goal = load_owned_goal(store, user_id, goal_id).await?;
    let previous = goal.status;

    goal.transition(status, Utc::now())?;
    store.save_goal(&goal).await?;

    log::info!("🔄 Goal {} status {} -> {} (requested {})", goal_id, previous, goal.status, status);
    Ok(goal)
}

pub async fn record_day(
    store: &dyn Store,
    user_id: &ObjectId,
    goal_id: &ObjectId,
    day: Option<NaiveDate>,
) -> Result<Goal, AppError> {
    let mut goal = load_owned_goal(store, user_id, goal_id).await?;
    let now = Utc::now();

    goal.record_day(day.unwrap_or_else(|| now.date_naive()), now)?;
    store.save_goal(&goal).await?;
    Ok(goal)
}

pub async fn remove_day(
    store: &dyn Store,
    user_id: &ObjectId,
    goal_id: &ObjectId,
    day: NaiveDate,
) -> Result<Goal, AppError> {
    let mut goal = load_owned_goal(store, user_id, goal_id).await?;
    goal.remove_day(day, Utc::now())?;
    store.save_goal(&goal).await?;
    Ok(goal)
}
