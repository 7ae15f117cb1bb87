pub mod mongo_store;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::{Store, StoreResult};

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str, token_ttl_minutes: i64) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("goals-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes(token_ttl_minutes).await;

        Ok(mongodb)
    }

    /// Creates the indexes the store's lookups rely on. Failures are logged, not fatal.
    async fn ensure_indexes(&self, token_ttl_minutes: i64) {
        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();
        self.create_index("users", doc! { "email": 1 }, Some(unique)).await;
        self.create_index("goals", doc! { "author": 1 }, None).await;
        self.create_index("reminders", doc! { "goal": 1 }, None).await;
        self.create_index("tokens", doc! { "user_id": 1, "purpose": 1 }, None).await;

        let ttl_secs = token_ttl_minutes.max(1) as u64 * 60;
        let ttl = IndexOptions::builder()
            .expire_after(Duration::from_secs(ttl_secs))
            .build();
        self.create_index("tokens", doc! { "created_at": 1 }, Some(ttl)).await;

        log::info!("✅ Database indexes ready");
    }

    async fn create_index(&self, collection: &str, keys: mongodb::bson::Document, options: Option<IndexOptions>) {
        let description = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
        let index = IndexModel::builder().keys(keys).options(options).build();

        match self
            .collection::<mongodb::bson::Document>(collection)
            .create_index(index)
            .await
        {
            Ok(_) => log::info!("   ✅ Index created: {}", description),
            Err(e) => log::warn!("   ⚠️  Index {} not created: {}", description, e),
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Pings the server; used by the health endpoint.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await.map(|_| ())
    }
}
