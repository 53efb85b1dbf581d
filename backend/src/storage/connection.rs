use std::sync::Arc;

use anyhow::Result;
use shared::{
    Appointment, BehaviorEntry, CommunityPost, CrisisRecord, DiaryEntry, MedicalReport, Medication, Record,
    Routine, SchoolCommunication, SensoryTrigger, Therapy,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

/// Every collection that gets its own table.
pub const COLLECTIONS: &[&str] = &[
    DiaryEntry::COLLECTION,
    BehaviorEntry::COLLECTION,
    Routine::COLLECTION,
    Medication::COLLECTION,
    Therapy::COLLECTION,
    SensoryTrigger::COLLECTION,
    CrisisRecord::COLLECTION,
    SchoolCommunication::COLLECTION,
    MedicalReport::COLLECTION,
    CommunityPost::COLLECTION,
    Appointment::COLLECTION,
];

/// Shared handle to the SQLite pool
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
    // SQLite allows one writer at a time
    writer: Arc<Mutex<()>>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure every
    /// collection table exists.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            writer: Arc::new(Mutex::new(())),
        })
    }

    /// Fresh in-memory database, unique per call
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Held for the duration of every write.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for collection in COLLECTIONS {
            // Table names come from the compile-time COLLECTION constants.
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {collection} (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    recency TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    body TEXT NOT NULL
                );
                "#
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                r#"
                CREATE INDEX IF NOT EXISTS idx_{collection}_owner_recency
                ON {collection}(user_id, recency DESC);
                "#
            ))
            .execute(pool)
            .await?;
        }

        Ok(())
    }
}
