//! Crisis mode: a running timer plus the checklist filled in afterwards.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use shared::api::{CrisisModeStatus, FinishCrisisRequest};
use shared::crisis::TRIGGER_CHECKLIST;
use shared::{CrisisRecord, CrisisRecordDraft, Effectiveness, Severity, ValidationError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use crate::domain::entity_service::EntityService;
use crate::domain::errors::AppError;

const TICK: Duration = Duration::from_secs(1);

/// Counts whole seconds while active.
///
/// Ticking runs on a spawned task that is aborted by `stop` and on drop, so
/// the timer must be started from inside a tokio runtime.
#[derive(Default)]
pub struct CrisisTimer {
    elapsed: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl CrisisTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting an active timer does nothing.
    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }
        let elapsed = self.elapsed.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticks.tick().await;
                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));
        info!("Crisis timer started");
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            info!("Crisis timer stopped after {}s", self.elapsed_secs());
        }
        self.reset();
    }

    /// Clear the count; an active timer keeps ticking from zero.
    pub fn reset(&mut self) {
        self.elapsed.store(0, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// `mm:ss`; minutes keep counting past 59.
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }
}

impl Drop for CrisisTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// State of the crisis screen from activation until the episode is logged.
#[derive(Default)]
pub struct CrisisModeSession {
    timer: CrisisTimer,
    checked_triggers: Vec<&'static str>,
    strategies_used: Vec<String>,
    effectiveness: Effectiveness,
    intensity: Option<Severity>,
    notes: Option<String>,
}

impl CrisisModeSession {
    pub fn start() -> Self {
        let mut session = Self::default();
        session.timer.start();
        session
    }

    /// Tick or untick a checklist trigger. Returns false for text that is not
    /// on the checklist.
    pub fn toggle_trigger(&mut self, trigger: &str) -> bool {
        let Some(item) = TRIGGER_CHECKLIST.iter().find(|t| **t == trigger) else {
            return false;
        };
        if let Some(pos) = self.checked_triggers.iter().position(|t| t == item) {
            self.checked_triggers.remove(pos);
        } else {
            self.checked_triggers.push(item);
        }
        true
    }

    pub fn checked_triggers(&self) -> Vec<&'static str> {
        TRIGGER_CHECKLIST
            .iter()
            .copied()
            .filter(|t| self.checked_triggers.contains(t))
            .collect()
    }

    pub fn use_strategy(&mut self, strategy: &str) {
        let strategy = strategy.trim();
        if !strategy.is_empty() && !self.strategies_used.iter().any(|s| s == strategy) {
            self.strategies_used.push(strategy.to_string());
        }
    }

    pub fn set_effectiveness(&mut self, effectiveness: Effectiveness) {
        self.effectiveness = effectiveness;
    }

    pub fn set_intensity(&mut self, intensity: Severity) {
        self.intensity = Some(intensity);
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    pub fn status(&self) -> CrisisModeStatus {
        CrisisModeStatus {
            elapsed_secs: self.timer.elapsed_secs(),
            display: self.timer.display(),
            checked_triggers: self.checked_triggers().into_iter().map(str::to_string).collect(),
        }
    }

    /// Record draft dated `date` for the episode so far. Duration is rounded
    /// up to whole minutes.
    pub fn draft(&self, date: NaiveDate) -> CrisisRecordDraft {
        let secs = self.timer.elapsed_secs();
        CrisisRecordDraft {
            date,
            duration: u32::try_from(secs.div_ceil(60)).unwrap_or(u32::MAX),
            triggers: self.checked_triggers().into_iter().map(str::to_string).collect(),
            strategies_used: self.strategies_used.clone(),
            effectiveness: self.effectiveness,
            intensity: self.intensity.unwrap_or(Severity::Medium),
            notes: self.notes.clone(),
        }
    }

    pub fn finish(mut self, date: NaiveDate) -> CrisisRecordDraft {
        let draft = self.draft(date);
        self.timer.stop();
        draft
    }
}

/// Open crisis screens, at most one per user. Finishing one logs a
/// `CrisisRecord`.
#[derive(Clone)]
pub struct CrisisModeService {
    sessions: Arc<Mutex<HashMap<String, CrisisModeSession>>>,
    records: EntityService<CrisisRecord>,
}

impl CrisisModeService {
    pub fn new(records: EntityService<CrisisRecord>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            records,
        }
    }

    /// Opens crisis mode, or returns the status of the one already open.
    pub async fn start(&self, user_id: &str) -> CrisisModeStatus {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id.to_string()).or_insert_with(|| {
            info!("Crisis mode started for user {}", user_id);
            CrisisModeSession::start()
        });
        session.status()
    }

    pub async fn status(&self, user_id: &str) -> Result<CrisisModeStatus, AppError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(user_id)
            .map(CrisisModeSession::status)
            .ok_or_else(|| AppError::not_found("crisis_mode", user_id))
    }

    pub async fn toggle_trigger(&self, user_id: &str, trigger: &str) -> Result<CrisisModeStatus, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(user_id)
            .ok_or_else(|| AppError::not_found("crisis_mode", user_id))?;
        if !session.toggle_trigger(trigger) {
            return Err(ValidationError::UnknownValue {
                field: "trigger".to_string(),
                value: trigger.to_string(),
            }
            .into());
        }
        Ok(session.status())
    }

    /// Logs the open session as a crisis record and closes it. The session
    /// stays open when the record is rejected.
    pub async fn finish(
        &self,
        user_id: &str,
        request: FinishCrisisRequest,
        today: NaiveDate,
    ) -> Result<CrisisRecord, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(user_id)
            .ok_or_else(|| AppError::not_found("crisis_mode", user_id))?;

        for strategy in &request.strategies_used {
            session.use_strategy(strategy);
        }
        session.set_effectiveness(request.effectiveness);
        if let Some(intensity) = request.intensity {
            session.set_intensity(intensity);
        }
        if let Some(notes) = &request.notes {
            session.set_notes(notes);
        }

        let draft = session.draft(request.date.unwrap_or(today));
        let record = self.records.create(user_id, draft).await?;
        if let Some(session) = sessions.remove(user_id) {
            session.finish(record.date);
        }
        Ok(record)
    }

    pub async fn cancel(&self, user_id: &str) -> bool {
        let closed = self.sessions.lock().await.remove(user_id);
        if closed.is_none() {
            warn!("No crisis mode open for user {}", user_id);
        }
        closed.is_some()
    }
}
