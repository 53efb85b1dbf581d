use std::marker::PhantomData;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{record::timestamp_key, Record};
use sqlx::{sqlite::SqliteRow, Row};

use crate::storage::connection::DbConnection;
use crate::storage::traits::{EntityStore, RecordChange};

/// SQLite repository for one collection. The record is kept as a JSON body
/// next to the columns used for scoping and ordering.
pub struct EntityRepository<E> {
    db: DbConnection,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

impl<E: Record> EntityRepository<E> {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    fn decode(row: &SqliteRow) -> Result<E> {
        let body: String = row.try_get("body")?;
        serde_json::from_str(&body)
            .with_context(|| format!("Corrupt record body in {}", E::COLLECTION))
    }
}

#[async_trait]
impl<E: Record> EntityStore<E> for EntityRepository<E> {
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<E>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT body FROM {}
            WHERE user_id = ?
            ORDER BY recency DESC, created_at DESC
            "#,
            E::COLLECTION
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::decode).collect()
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<E>> {
        let row = sqlx::query(&format!(
            "SELECT body FROM {} WHERE id = ? AND user_id = ?",
            E::COLLECTION
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn insert(&self, record: &E) -> Result<()> {
        let body = serde_json::to_string(record)?;
        let _writer = self.db.write_lock().await;
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, user_id, recency, created_at, body)
            VALUES (?, ?, ?, ?, ?)
            "#,
            E::COLLECTION
        ))
        .bind(record.id())
        .bind(record.user_id())
        .bind(record.recency_key())
        .bind(timestamp_key(record.created_at()))
        .bind(body)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn update_with<'a>(
        &'a self,
        user_id: &'a str,
        id: &'a str,
        change: RecordChange<'a, E>,
    ) -> Result<Option<E>> {
        let _writer = self.db.write_lock().await;
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!(
            "SELECT body FROM {} WHERE id = ? AND user_id = ?",
            E::COLLECTION
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` without commit rolls back
        let mut record = match row {
            Some(row) => Self::decode(&row)?,
            None => return Ok(None),
        };
        change(&mut record)?;

        let body = serde_json::to_string(&record)?;
        sqlx::query(&format!(
            r#"
            UPDATE {}
            SET recency = ?, body = ?
            WHERE id = ? AND user_id = ?
            "#,
            E::COLLECTION
        ))
        .bind(record.recency_key())
        .bind(body)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let _writer = self.db.write_lock().await;
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ? AND user_id = ?",
            E::COLLECTION
        ))
        .bind(id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{DiaryDraft, DiaryEntry, Mood, Record, RecordMeta};

    fn diary(user_id: &str, date: &str, notes: &str) -> DiaryEntry {
        DiaryEntry::from_draft(
            RecordMeta::new(user_id),
            DiaryDraft {
                date: date.parse::<NaiveDate>().unwrap(),
                mood: Mood::Happy,
                food: vec!["rice".to_string()],
                meals: Default::default(),
                crisis: Default::default(),
                sleep: None,
                notes: notes.to_string(),
            },
        )
    }

    fn edit<'a>(f: impl FnOnce(&mut DiaryEntry) -> Result<()> + Send + 'a) -> RecordChange<'a, DiaryEntry> {
        Box::new(f)
    }

    async fn setup_repo() -> EntityRepository<DiaryEntry> {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        EntityRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let repo = setup_repo().await;
        repo.insert(&diary("parent-1", "2026-03-01", "first")).await.unwrap();
        repo.insert(&diary("parent-1", "2026-03-05", "latest")).await.unwrap();
        repo.insert(&diary("parent-1", "2026-03-03", "middle")).await.unwrap();

        let notes: Vec<String> = repo
            .list_by_owner("parent-1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.notes)
            .collect();
        assert_eq!(notes, vec!["latest", "middle", "first"]);
    }

    #[tokio::test]
    async fn test_same_date_breaks_ties_by_creation() {
        let repo = setup_repo().await;
        let older = diary("parent-1", "2026-03-01", "older");
        let mut newer = diary("parent-1", "2026-03-01", "newer");
        newer.created_at = older.created_at + chrono::Duration::seconds(5);

        repo.insert(&newer).await.unwrap();
        repo.insert(&older).await.unwrap();

        let list = repo.list_by_owner("parent-1").await.unwrap();
        assert_eq!(list[0].notes, "newer");
        assert_eq!(list[1].notes, "older");
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let repo = setup_repo().await;
        let mine = diary("parent-1", "2026-03-01", "mine");
        repo.insert(&mine).await.unwrap();
        repo.insert(&diary("parent-2", "2026-03-01", "theirs")).await.unwrap();

        let list = repo.list_by_owner("parent-1").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].notes, "mine");

        assert!(repo.get("parent-2", &mine.id).await.unwrap().is_none());
        assert!(!repo.delete("parent-2", &mine.id).await.unwrap());

        let hijacked = repo
            .update_with("parent-2", &mine.id, edit(|entry| {
                entry.notes = "changed".to_string();
                Ok(())
            }))
            .await
            .unwrap();
        assert!(hijacked.is_none());

        let stored = repo.get("parent-1", &mine.id).await.unwrap().unwrap();
        assert_eq!(stored.notes, "mine");
    }

    #[tokio::test]
    async fn test_update_with_changes_body_and_recency() {
        let repo = setup_repo().await;
        let entry = diary("parent-1", "2026-03-01", "draft");
        repo.insert(&entry).await.unwrap();
        repo.insert(&diary("parent-1", "2026-03-02", "other")).await.unwrap();

        let updated = repo
            .update_with("parent-1", &entry.id, edit(|e| {
                e.notes = "final".to_string();
                e.date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
                Ok(())
            }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes, "final");

        let list = repo.list_by_owner("parent-1").await.unwrap();
        assert_eq!(list[0].id, entry.id);
        assert_eq!(list[0].notes, "final");
    }

    #[tokio::test]
    async fn test_failed_change_writes_nothing() {
        let repo = setup_repo().await;
        let entry = diary("parent-1", "2026-03-01", "untouched");
        repo.insert(&entry).await.unwrap();

        let result = repo
            .update_with("parent-1", &entry.id, edit(|e| {
                e.notes = "half done".to_string();
                Err(anyhow::anyhow!("rejected"))
            }))
            .await;
        assert!(result.is_err());

        let stored = repo.get("parent-1", &entry.id).await.unwrap().unwrap();
        assert_eq!(stored.notes, "untouched");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let repo = setup_repo().await;
        let entry = diary("parent-1", "2026-03-01", "counter");
        repo.insert(&entry).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let repo = repo.clone();
            let id = entry.id.clone();
            tasks.push(tokio::spawn(async move {
                repo.update_with("parent-1", &id, edit(|e| {
                    e.food.push("apple".to_string());
                    Ok(())
                }))
                .await
                .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let stored = repo.get("parent-1", &entry.id).await.unwrap().unwrap();
        // "rice" from the fixture plus one item per update
        assert_eq!(stored.food.len(), 11);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_found() {
        let repo = setup_repo().await;
        let entry = diary("parent-1", "2026-03-01", "gone soon");
        repo.insert(&entry).await.unwrap();

        assert!(repo.delete("parent-1", &entry.id).await.unwrap());
        assert!(!repo.delete("parent-1", &entry.id).await.unwrap());
        assert!(repo.list_by_owner("parent-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_on_disk_database_survives_reconnect() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", temp_dir.path().join("carenest.db").display());

        let entry = diary("parent-1", "2026-03-01", "persisted");
        {
            let repo: EntityRepository<DiaryEntry> = EntityRepository::new(DbConnection::new(&url).await.unwrap());
            repo.insert(&entry).await.unwrap();
        }

        let repo: EntityRepository<DiaryEntry> = EntityRepository::new(DbConnection::new(&url).await.unwrap());
        let stored = repo.get("parent-1", &entry.id).await.unwrap().unwrap();
        assert_eq!(stored, entry);
    }
}
