use std::sync::Arc;

use shared::{Record, RecordMeta, Validate};
use tracing::{info, warn};

use crate::domain::errors::AppError;
use crate::storage::{EntityStore, RecordChange};

/// Owner-scoped CRUD for one collection.
///
/// The service holds no per-user state; every call names the owner it acts
/// for. When no store is configured every call fails with
/// `AppError::NotConfigured` and `is_available` reports false.
pub struct EntityService<E: Record> {
    store: Option<Arc<dyn EntityStore<E>>>,
}

impl<E: Record> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<E: Record> EntityService<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&Arc<dyn EntityStore<E>>, AppError> {
        self.store.as_ref().ok_or(AppError::NotConfigured)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<E>, AppError> {
        info!("Listing {} for user {}", E::COLLECTION, user_id);
        let records = self.store()?.list_by_owner(user_id).await?;
        info!("Found {} {} records", records.len(), E::COLLECTION);
        Ok(records)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<E, AppError> {
        match self.store()?.get(user_id, id).await? {
            Some(record) => Ok(record),
            None => {
                warn!("{} record not found: {}", E::COLLECTION, id);
                Err(AppError::not_found(E::COLLECTION, id))
            }
        }
    }

    pub async fn create(&self, user_id: &str, draft: E::Draft) -> Result<E, AppError> {
        draft.validate()?;
        let store = self.store()?;

        let record = E::from_draft(RecordMeta::new(user_id), draft);
        store.insert(&record).await?;

        info!("Created {} record {} for user {}", E::COLLECTION, record.id(), user_id);
        Ok(record)
    }

    /// Full-record replace of the caller-supplied fields.
    pub async fn update(&self, user_id: &str, id: &str, draft: E::Draft) -> Result<E, AppError> {
        draft.validate()?;
        let record = self
            .modify(user_id, id, move |record| {
                record.replace(draft);
                Ok(())
            })
            .await?;

        info!("Updated {} record {}", E::COLLECTION, id);
        Ok(record)
    }

    /// Apply `change` to the stored record and write it back atomically.
    pub async fn modify<'a, F>(&'a self, user_id: &'a str, id: &'a str, change: F) -> Result<E, AppError>
    where
        F: FnOnce(&mut E) -> Result<(), AppError> + Send + 'a,
    {
        let change: RecordChange<'a, E> =
            Box::new(move |record: &mut E| change(record).map_err(anyhow::Error::from));

        match self.store()?.update_with(user_id, id, change).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                warn!("{} record not found: {}", E::COLLECTION, id);
                Err(AppError::not_found(E::COLLECTION, id))
            }
            // Errors raised by `change` come back wrapped
            Err(err) => Err(err.downcast::<AppError>().unwrap_or_else(AppError::Store)),
        }
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        if self.store()?.delete(user_id, id).await? {
            info!("Deleted {} record {}", E::COLLECTION, id);
        } else {
            info!("Delete of missing {} record {} ignored", E::COLLECTION, id);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::*;

    /// In-memory store that can be switched into failing mode.
    pub struct FlakyStore<E> {
        records: Mutex<HashMap<String, E>>,
        failing: AtomicBool,
    }

    impl<E: Record> FlakyStore<E> {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(HashMap::new()),
                failing: AtomicBool::new(false),
            })
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(anyhow!("connection reset by peer"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl<E: Record> EntityStore<E> for FlakyStore<E> {
        async fn list_by_owner(&self, user_id: &str) -> Result<Vec<E>> {
            self.check()?;
            let mut list: Vec<E> = self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.user_id() == user_id)
                .cloned()
                .collect();
            list.sort_by(|a, b| {
                (b.recency_key(), b.created_at()).cmp(&(a.recency_key(), a.created_at()))
            });
            Ok(list)
        }

        async fn get(&self, user_id: &str, id: &str) -> Result<Option<E>> {
            self.check()?;
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(id)
                .filter(|r| r.user_id() == user_id)
                .cloned())
        }

        async fn insert(&self, record: &E) -> Result<()> {
            self.check()?;
            self.records
                .lock()
                .unwrap()
                .insert(record.id().to_string(), record.clone());
            Ok(())
        }

        async fn update_with<'a>(
            &'a self,
            user_id: &'a str,
            id: &'a str,
            change: RecordChange<'a, E>,
        ) -> Result<Option<E>> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let Some(existing) = records.get_mut(id).filter(|r| r.user_id() == user_id) else {
                return Ok(None);
            };
            let mut record = existing.clone();
            change(&mut record)?;
            *existing = record.clone();
            Ok(Some(record))
        }

        async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            if records.get(id).is_some_and(|r| r.user_id() == user_id) {
                records.remove(id);
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, EntityRepository};
    use shared::{BehaviorDraft, BehaviorEntry, ValidationError};

    async fn setup_service() -> EntityService<BehaviorEntry> {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        EntityService::new(Arc::new(EntityRepository::<BehaviorEntry>::new(db)))
    }

    fn draft(behavior: &str) -> BehaviorDraft {
        BehaviorDraft {
            date: "2026-05-02".parse().unwrap(),
            behavior: behavior.to_string(),
            notes: "At the supermarket".to_string(),
            medical_report: Some("  ".to_string()),
            doctor_name: None,
            consultation_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_owner() {
        let service = setup_service().await;
        let created = service.create("parent-1", draft("Hand flapping")).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.user_id, "parent-1");
        assert_eq!(created.medical_report, None);

        let listed = service.list("parent-1").await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_blank_required_field_never_reaches_store() {
        let store = test_support::FlakyStore::<BehaviorEntry>::new();
        store.set_failing(true);
        let service = EntityService::new(store.clone());

        // A failing store would turn any store call into a Store error
        let err = service.create("parent-1", draft("   ")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingField { ref field }) if field == "behavior"
        ));
    }

    #[tokio::test]
    async fn test_update_is_owner_scoped() {
        let service = setup_service().await;
        let created = service.create("parent-1", draft("Covering ears")).await.unwrap();

        let err = service
            .update("parent-2", &created.id, draft("Hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let updated = service
            .update("parent-1", &created.id, draft("Covering ears at lunch"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(service.get("parent-1", &created.id).await.unwrap().behavior, "Covering ears at lunch");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = setup_service().await;
        let created = service.create("parent-1", draft("Echolalia")).await.unwrap();

        service.delete("parent-1", &created.id).await.unwrap();
        service.delete("parent-1", &created.id).await.unwrap();
        service.delete("parent-1", "never-existed").await.unwrap();
        assert!(service.list("parent-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_service() {
        let service = EntityService::<BehaviorEntry>::unconfigured();
        assert!(!service.is_available());
        assert!(matches!(service.list("parent-1").await, Err(AppError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let store = test_support::FlakyStore::<BehaviorEntry>::new();
        let service = EntityService::new(store.clone());
        store.set_failing(true);

        let err = service.create("parent-1", draft("Hand flapping")).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }
}
