//! Per-session list state for one feature screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::{Notice, Record, RecordMeta, Validate, LOCAL_OWNER};
use tracing::{error, info};

use crate::domain::entity_service::EntityService;
use crate::domain::errors::AppError;

/// How the controller reaches its data, decided from store availability and
/// the session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    /// No store configured: changes live only in memory.
    Local { owner: String },
    Remote { user_id: String },
    /// Store configured but nobody signed in.
    SignedOut,
}

/// Sets a flag for as long as it lives.
struct ActivityGuard(Arc<AtomicBool>);

impl ActivityGuard {
    fn acquire(flag: &Arc<AtomicBool>, other: &Arc<AtomicBool>) -> Result<Self, AppError> {
        if other.load(Ordering::SeqCst) || flag.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy);
        }
        Ok(Self(flag.clone()))
    }
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Loading/saving indicators that can be watched from outside the controller.
#[derive(Clone, Default)]
pub struct ActivityStatus {
    loading: Arc<AtomicBool>,
    saving: Arc<AtomicBool>,
}

impl ActivityStatus {
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }
}

/// Holds the ordered in-memory list of one collection for one session and
/// keeps it in step with the store.
///
/// Successful mutations update the list before returning. A failed store call
/// leaves the list as it was and records a [`Notice`] for the screen.
pub struct EntityController<E: Record> {
    service: EntityService<E>,
    session: Option<String>,
    items: Vec<E>,
    status: ActivityStatus,
    notice: Option<Notice>,
}

impl<E: Record> EntityController<E> {
    pub fn new(service: EntityService<E>, session: Option<String>) -> Self {
        let notice = (!service.is_available()).then_some(Notice::ConfigurationNeeded);
        Self {
            service,
            session,
            items: Vec::new(),
            status: ActivityStatus::default(),
            notice,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn status(&self) -> ActivityStatus {
        self.status.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn is_saving(&self) -> bool {
        self.status.is_saving()
    }

    /// Outcome of the last action that needs the user's attention.
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn owner_id(&self) -> String {
        self.session.clone().unwrap_or_else(|| LOCAL_OWNER.to_string())
    }

    fn mode(&self) -> Mode {
        match (self.service.is_available(), &self.session) {
            (false, session) => Mode::Local {
                owner: session.clone().unwrap_or_else(|| LOCAL_OWNER.to_string()),
            },
            (true, Some(user_id)) => Mode::Remote {
                user_id: user_id.clone(),
            },
            (true, None) => Mode::SignedOut,
        }
    }

    fn remote_user(&mut self) -> Result<Option<String>, AppError> {
        match self.mode() {
            Mode::Local { .. } => Ok(None),
            Mode::Remote { user_id } => Ok(Some(user_id)),
            Mode::SignedOut => {
                self.notice = Some(Notice::SignInRequired);
                Err(AppError::AuthRequired)
            }
        }
    }

    fn record_failure(&mut self, action: &str, err: &AppError) {
        if let AppError::Store(cause) = err {
            error!("Failed to {} {}: {:#}", action, E::COLLECTION, cause);
            self.notice = Some(if action == "load" {
                Notice::LoadFailed
            } else {
                Notice::SaveFailed
            });
        }
    }

    fn settle_notice(&mut self) {
        self.notice = (!self.service.is_available()).then_some(Notice::ConfigurationNeeded);
    }

    /// Refresh the list from the store.
    ///
    /// Yields an empty list without a session, and the current in-memory list
    /// when no store is configured.
    pub async fn load(&mut self) -> Result<&[E], AppError> {
        let _guard = ActivityGuard::acquire(&self.status.loading, &self.status.saving)?;

        match self.mode() {
            Mode::Local { .. } => {}
            Mode::SignedOut => {
                self.items.clear();
                self.notice = Some(Notice::SignInRequired);
            }
            Mode::Remote { user_id } => match self.service.list(&user_id).await {
                Ok(items) => {
                    self.items = items;
                    self.settle_notice();
                }
                Err(err) => {
                    self.record_failure("load", &err);
                    return Err(err);
                }
            },
        }
        Ok(&self.items)
    }

    pub async fn create(&mut self, draft: E::Draft) -> Result<E, AppError> {
        draft.validate()?;
        let _guard = ActivityGuard::acquire(&self.status.saving, &self.status.loading)?;

        let record = match self.mode() {
            Mode::Local { owner } => E::from_draft(RecordMeta::new(&owner), draft),
            _ => {
                let user_id = self.remote_user()?.unwrap_or_default();
                match self.service.create(&user_id, draft).await {
                    Ok(record) => record,
                    Err(err) => {
                        self.record_failure("create", &err);
                        return Err(err);
                    }
                }
            }
        };

        self.items.insert(0, record.clone());
        self.settle_notice();
        Ok(record)
    }

    pub async fn update(&mut self, id: &str, draft: E::Draft) -> Result<E, AppError> {
        draft.validate()?;
        self.apply(id, "update", move |record| {
            record.replace(draft);
            Ok(())
        })
        .await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let _guard = ActivityGuard::acquire(&self.status.saving, &self.status.loading)?;

        if let Some(user_id) = self.remote_user()? {
            if let Err(err) = self.service.delete(&user_id, id).await {
                self.record_failure("delete", &err);
                return Err(err);
            }
        }

        self.items.retain(|item| item.id() != id);
        info!("Removed {} record {} from list", E::COLLECTION, id);
        self.settle_notice();
        Ok(())
    }

    /// Change one listed record and persist it. Remote changes are applied
    /// to the stored copy, so edits from other sessions are kept.
    pub(crate) async fn apply<F>(&mut self, id: &str, action: &str, change: F) -> Result<E, AppError>
    where
        F: FnOnce(&mut E) -> Result<(), AppError> + Send + 'static,
    {
        let _guard = ActivityGuard::acquire(&self.status.saving, &self.status.loading)?;
        let remote = self.remote_user()?;

        let position = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(E::COLLECTION, id))?;

        let record = match remote {
            Some(user_id) => match self.service.modify(&user_id, id, change).await {
                Ok(record) => record,
                Err(err) => {
                    self.record_failure(action, &err);
                    return Err(err);
                }
            },
            None => {
                let mut record = self.items[position].clone();
                change(&mut record)?;
                record
            }
        };

        self.items[position] = record.clone();
        self.settle_notice();
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity_service::test_support::FlakyStore;
    use crate::storage::{DbConnection, EntityRepository};
    use shared::{DiaryDraft, DiaryEntry, Mood, ValidationError};

    fn draft(date: &str, notes: &str) -> DiaryDraft {
        DiaryDraft {
            date: date.parse().unwrap(),
            mood: Mood::Sad,
            food: vec![],
            meals: Default::default(),
            crisis: Default::default(),
            sleep: None,
            notes: notes.to_string(),
        }
    }

    async fn sqlite_service() -> EntityService<DiaryEntry> {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        EntityService::new(Arc::new(EntityRepository::<DiaryEntry>::new(db)))
    }

    #[tokio::test]
    async fn test_create_then_list_shows_record_first() {
        let service = sqlite_service().await;
        let mut controller = EntityController::new(service.clone(), Some("parent-1".to_string()));
        controller.create(draft("2026-03-01", "older")).await.unwrap();
        let created = controller.create(draft("2026-03-02", "Calm morning")).await.unwrap();

        assert_eq!(controller.items()[0].id, created.id);

        let mut fresh = EntityController::new(service, Some("parent-1".to_string()));
        let listed = fresh.load().await.unwrap();
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].user_id, "parent-1");
        assert_eq!(controller.notice(), None);
    }

    #[tokio::test]
    async fn test_validation_rejected_before_store() {
        let store = FlakyStore::<DiaryEntry>::new();
        store.set_failing(true);
        let mut controller = EntityController::new(EntityService::new(store), Some("parent-1".to_string()));

        let err = controller.create(draft("2026-03-01", "  ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingField { .. })));
        assert!(controller.items().is_empty());
        assert_eq!(controller.notice(), None);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_list_unchanged() {
        let store = FlakyStore::<DiaryEntry>::new();
        let mut controller = EntityController::new(EntityService::new(store.clone()), Some("parent-1".to_string()));
        let kept = controller.create(draft("2026-03-01", "kept")).await.unwrap();

        store.set_failing(true);
        let before = controller.items().to_vec();

        assert!(matches!(controller.create(draft("2026-03-02", "lost")).await, Err(AppError::Store(_))));
        assert!(matches!(controller.update(&kept.id, draft("2026-03-01", "edited")).await, Err(AppError::Store(_))));
        assert!(matches!(controller.delete(&kept.id).await, Err(AppError::Store(_))));
        assert_eq!(controller.items(), before.as_slice());
        assert_eq!(controller.notice(), Some(Notice::SaveFailed));

        assert!(matches!(controller.load().await, Err(AppError::Store(_))));
        assert_eq!(controller.items(), before.as_slice());
        assert_eq!(controller.notice(), Some(Notice::LoadFailed));

        assert!(!controller.is_saving());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_delete_removes_and_is_idempotent() {
        let service = sqlite_service().await;
        let mut controller = EntityController::new(service.clone(), Some("parent-1".to_string()));
        let entry = controller.create(draft("2026-03-01", "to delete")).await.unwrap();

        controller.delete(&entry.id).await.unwrap();
        controller.delete(&entry.id).await.unwrap();
        assert!(controller.items().is_empty());
        assert!(service.list("parent-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = sqlite_service().await;
        let mut controller = EntityController::new(service, Some("parent-1".to_string()));
        let err = controller.update("missing", draft("2026-03-01", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_local_only_without_store() {
        let mut controller = EntityController::<DiaryEntry>::new(EntityService::unconfigured(), None);
        assert_eq!(controller.notice(), Some(Notice::ConfigurationNeeded));

        let entry = controller.create(draft("2026-03-01", "kept in memory")).await.unwrap();
        assert_eq!(entry.user_id, LOCAL_OWNER);

        let updated = controller.update(&entry.id, draft("2026-03-01", "edited")).await.unwrap();
        assert_eq!(updated.notes, "edited");
        assert_eq!(controller.load().await.unwrap().len(), 1);

        controller.delete(&entry.id).await.unwrap();
        assert!(controller.items().is_empty());
        assert_eq!(controller.notice(), Some(Notice::ConfigurationNeeded));
    }

    #[tokio::test]
    async fn test_signed_out_requires_auth() {
        let service = sqlite_service().await;
        let mut controller = EntityController::new(service, None);

        assert!(controller.load().await.unwrap().is_empty());
        let err = controller.create(draft("2026-03-01", "no session")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));
        assert!(matches!(controller.delete("any").await, Err(AppError::AuthRequired)));
        assert_eq!(controller.notice(), Some(Notice::SignInRequired));
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_save_clears_busy_flag() {
        let service = sqlite_service().await;
        let mut controller = EntityController::new(service, Some("parent-1".to_string()));
        let status = controller.status();

        // Polled once, then dropped if still pending
        let _ = tokio::time::timeout(
            std::time::Duration::ZERO,
            controller.create(draft("2026-03-01", "abandoned")),
        )
        .await;
        assert!(!status.is_saving());
        controller.create(draft("2026-03-01", "next")).await.unwrap();
    }

    #[test]
    fn test_overlapping_activity_is_busy() {
        let status = ActivityStatus::default();
        let _saving = ActivityGuard::acquire(&status.saving, &status.loading).unwrap();
        assert!(status.is_saving());
        assert!(matches!(
            ActivityGuard::acquire(&status.saving, &status.loading),
            Err(AppError::Busy)
        ));
        assert!(matches!(
            ActivityGuard::acquire(&status.loading, &status.saving),
            Err(AppError::Busy)
        ));
    }
}
