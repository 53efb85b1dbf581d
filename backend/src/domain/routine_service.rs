//! Step tracking on routines.

use shared::Routine;
use tracing::info;

use crate::domain::controller::EntityController;
use crate::domain::entity_service::EntityService;
use crate::domain::errors::AppError;

fn toggle(routine: &mut Routine, step_id: &str) -> Result<(), AppError> {
    if routine.toggle_step(step_id) {
        Ok(())
    } else {
        Err(AppError::not_found("routine_steps", step_id))
    }
}

impl EntityService<Routine> {
    pub async fn toggle_step(&self, user_id: &str, routine_id: &str, step_id: &str) -> Result<Routine, AppError> {
        let routine = self
            .modify(user_id, routine_id, |routine| toggle(routine, step_id))
            .await?;
        info!("Routine {} progress {:.0}%", routine_id, routine.progress() * 100.0);
        Ok(routine)
    }
}

impl EntityController<Routine> {
    /// Flip one step's `completed` flag and persist the routine.
    pub async fn toggle_step(&mut self, routine_id: &str, step_id: &str) -> Result<Routine, AppError> {
        let step_id = step_id.to_string();
        self.apply(routine_id, "update", move |routine| toggle(routine, &step_id))
            .await
    }
}
