use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::{MongoDB, Store, StoreResult};
use crate::models::{Goal, Reminder, Token, TokenPurpose, User};

const USERS: &str = "users";
const GOALS: &str = "goals";
const REMINDERS: &str = "reminders";
const TOKENS: &str = "tokens";

/// `Store` backed by the MongoDB collections.
#[derive(Clone)]
pub struct MongoStore {
    db: MongoDB,
}

impl MongoStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(self.db.ping().await?)
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        Ok(self.db.collection::<User>(USERS).find_one(doc! { "_id": *id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .db
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.db.collection::<User>(USERS).insert_one(user).await?;
        Ok(())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.db
            .collection::<User>(USERS)
            .replace_one(doc! { "_id": user.id }, user)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.db.collection::<User>(USERS).delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_goal(&self, id: &ObjectId) -> StoreResult<Option<Goal>> {
        Ok(self.db.collection::<Goal>(GOALS).find_one(doc! { "_id": *id }).await?)
    }

    async fn find_goals_by_author(&self, author: &ObjectId) -> StoreResult<Vec<Goal>> {
        let cursor = self
            .db
            .collection::<Goal>(GOALS)
            .find(doc! { "author": *author })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_goal(&self, goal: &Goal) -> StoreResult<()> {
        self.db.collection::<Goal>(GOALS).insert_one(goal).await?;
        Ok(())
    }

    async fn save_goal(&self, goal: &Goal) -> StoreResult<()> {
        self.db
            .collection::<Goal>(GOALS)
            .replace_one(doc! { "_id": goal.id }, goal)
            .await?;
        Ok(())
    }

    async fn delete_goal(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.db.collection::<Goal>(GOALS).delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_goals_by_author(&self, author: &ObjectId) -> StoreResult<u64> {
        let result = self
            .db
            .collection::<Goal>(GOALS)
            .delete_many(doc! { "author": *author })
            .await?;
        Ok(result.deleted_count)
    }

    async fn find_reminder(&self, id: &ObjectId) -> StoreResult<Option<Reminder>> {
        Ok(self
            .db
            .collection::<Reminder>(REMINDERS)
            .find_one(doc! { "_id": *id })
            .await?)
    }

    async fn insert_reminder(&self, reminder: &Reminder) -> StoreResult<()> {
        self.db.collection::<Reminder>(REMINDERS).insert_one(reminder).await?;
        Ok(())
    }

    async fn save_reminder(&self, reminder: &Reminder) -> StoreResult<()> {
        self.db
            .collection::<Reminder>(REMINDERS)
            .replace_one(doc! { "_id": reminder.id }, reminder)
            .await?;
        Ok(())
    }

    async fn delete_reminder(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .db
            .collection::<Reminder>(REMINDERS)
            .delete_one(doc! { "_id": *id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_reminders_for_goals(&self, goals: &[ObjectId]) -> StoreResult<u64> {
        if goals.is_empty() {
            return Ok(0);
        }
        let result = self
            .db
            .collection::<Reminder>(REMINDERS)
            .delete_many(doc! { "goal": { "$in": goals.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn find_token(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<Option<Token>> {
        Ok(self
            .db
            .collection::<Token>(TOKENS)
            .find_one(doc! { "user_id": *user_id, "purpose": purpose.as_str() })
            .await?)
    }

    async fn insert_token(&self, token: &Token) -> StoreResult<()> {
        self.db.collection::<Token>(TOKENS).insert_one(token).await?;
        Ok(())
    }

    async fn delete_token(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.db.collection::<Token>(TOKENS).delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_tokens(&self, user_id: &ObjectId, purpose: TokenPurpose) -> StoreResult<u64> {
        let result = self
            .db
            .collection::<Token>(TOKENS)
            .delete_many(doc! { "user_id": *user_id, "purpose": purpose.as_str() })
            .await?;
        Ok(result.deleted_count)
    }
}
