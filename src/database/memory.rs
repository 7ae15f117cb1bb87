//! In-memory `Store` for unit and HTTP tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Store, StoreResult};
use crate::models::{Goal, Reminder, Token, TokenPurpose, User};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<ObjectId, User>>,
    goals: Mutex<HashMap<ObjectId, Goal>>,
    reminders: Mutex<HashMap<ObjectId, Reminder>>,
    tokens: Mutex<HashMap<ObjectId, Token>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goal_count(&self) -> usize {
        self.goals.lock().unwrap().len()
    }

    pub fn reminder_count(&self) -> usize {
        self.reminders.lock().unwrap().len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    /// Overwrites a stored token, e.g. to backdate it.
    pub fn put_token(&self, token: Token) {
        self.tokens.lock().unwrap().insert(token.id, token);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.insert_user(user).await
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.users.lock().unwrap().remove(id).is_some())
    }

    async fn find_goal(&self, id: &ObjectId) -> StoreResult<Option<Goal>> {
        Ok(self.goals.lock().unwrap().get(id).cloned())
    }

    async fn find_goals_by_author(&self, author: &ObjectId) -> StoreResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|g| &g.author == author)
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn insert_goal(&self, goal: &Goal) -> StoreResult<()> {
        self.goals.lock().unwrap().insert(goal.id, goal.clone());
        Ok(())
    }

    async fn save_goal(&self, goal: &Goal) -> StoreResult<()> {
        self.insert_goal(goal).await
    }

    async fn delete_goal(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.goals.lock().unwrap().remove(id).is_some())
    }

    async fn delete_goals_by_author(&self, author: &ObjectId) -> StoreResult<u64> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|_, g| &g.author != author);
        Ok((before - goals.len()) as u64)
    }

    async fn find_reminder(&self, id: &ObjectId) -> StoreResult<Option<Reminder>> {
        Ok(self.reminders.lock().unwrap().get(id).cloned())
    }

    async fn insert_reminder(&self, reminder: &Reminder) -> StoreResult<()> {
        self.reminders.lock().unwrap().insert(reminder.id, reminder.clone());
        Ok(())
    }

    async fn save_reminder(&self, reminder: &Reminder) -> StoreResult<()> {
        self.insert_reminder(reminder).await
    }

    async fn delete_reminder(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.reminders.lock().unwrap().remove(id).is_some())
    }

    async fn delete_reminders_for_goals(&self, goals: &[ObjectId]) -> StoreResult<u64> {
        let mut reminders = self.reminders.lock().unwrap();
        let before = reminders.len();
        reminders.retain(|_, r| !goals.contains(&r.goal));
        Ok((before - reminders.len()) as u64)
    }

    async fn find_token(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<Option<Token>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| &t.user_id == user_id && t.purpose == purpose)
            .cloned())
    }

    async fn insert_token(&self, token: &Token) -> StoreResult<()> {
        self.put_token(token.clone());
        Ok(())
    }

    async fn delete_token(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.tokens.lock().unwrap().remove(id).is_some())
    }

    async fn delete_tokens(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| !(&t.user_id == user_id && t.purpose == purpose));
        Ok((before - tokens.len()) as u64)
    }
}
