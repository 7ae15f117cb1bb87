use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Goal, Reminder, Token, TokenPurpose, User};
use crate::utils::AppError;

pub type StoreResult<T> = Result<T, AppError>;

/// Document reads and writes for every entity the service persists.
///
/// Each call is a single-document (or single-filter) operation; callers that
/// touch several entities do so sequentially with no transaction.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn save_user(&self, user: &User) -> StoreResult<()>;
    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool>;

    // Goals
    async fn find_goal(&self, id: &ObjectId) -> StoreResult<Option<Goal>>;
    async fn find_goals_by_author(&self, author: &ObjectId) -> StoreResult<Vec<Goal>>;
    async fn insert_goal(&self, goal: &Goal) -> StoreResult<()>;
    async fn save_goal(&self, goal: &Goal) -> StoreResult<()>;
    async fn delete_goal(&self, id: &ObjectId) -> StoreResult<bool>;
    async fn delete_goals_by_author(&self, author: &ObjectId) -> StoreResult<u64>;

    // Reminders
    async fn find_reminder(&self, id: &ObjectId) -> StoreResult<Option<Reminder>>;
    async fn insert_reminder(&self, reminder: &Reminder) -> StoreResult<()>;
    async fn save_reminder(&self, reminder: &Reminder) -> StoreResult<()>;
    async fn delete_reminder(&self, id: &ObjectId) -> StoreResult<bool>;
    async fn delete_reminders_for_goals(&self, goals: &[ObjectId]) -> StoreResult<u64>;

    // One-time tokens
    async fn find_token(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<Option<Token>>;
    async fn insert_token(&self, token: &Token) -> StoreResult<()>;
    async fn delete_token(&self, id: &ObjectId) -> StoreResult<bool>;
    async fn delete_tokens(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<u64>;
}
