mod conflicts;
mod mutate;
mod types;
mod week;

pub use conflicts::{find_overlap, validate_create, validate_mutation, validate_time_range};
pub use types::{Mutation, ShiftError};
pub use week::{is_week_published, week_status, WeekStatus, WeekWindow};

use crate::model::{NewShift, Shift, ShiftId, ShiftPatch};
use crate::query::{Direction, Field, Predicate, Query};
use crate::storage::ShiftStore;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Scheduler : applique les règles métier avant de déléguer au store.
///
/// Chaque opération relit l'état du store ; aucun état n'est conservé entre
/// deux appels. Deux créations concurrentes sur deux stores partageant les
/// mêmes données peuvent donc passer la validation puis se chevaucher.
#[derive(Debug, Default)]
pub struct Scheduler<S> {
    store: S,
}

impl<S: ShiftStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Liste les shifts (date décroissante, puis heure de début croissante),
    /// éventuellement restreints à `[from, to]`.
    pub fn find_shifts(&self, range: Option<(NaiveDate, NaiveDate)>) -> Result<Vec<Shift>, ShiftError> {
        info!(?range, "find shifts");
        let query = match range {
            Some((from, to)) => Query::filter(Predicate::between(Field::Date, from, to)),
            None => Query::all(),
        };
        let query = query
            .order_by(Field::Date, Direction::Desc)
            .order_by(Field::StartTime, Direction::Asc);
        Ok(self.store.find(&query)?)
    }

    pub fn find_shift(&self, id: &ShiftId) -> Result<Shift, ShiftError> {
        info!(shift = %id, "find shift by id");
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ShiftError::NotFound(id.clone()))
    }

    pub fn is_week_published(&self, date: NaiveDate) -> Result<bool, ShiftError> {
        week::is_week_published(&self.store, date)
    }

    pub fn week_status(&self, date: NaiveDate) -> Result<WeekStatus, ShiftError> {
        week::week_status(&self.store, date)
    }

    pub fn create_shift(&mut self, candidate: NewShift) -> Result<Shift, ShiftError> {
        info!(name = %candidate.name, date = %candidate.date, "create shift");
        mutate::create_shift(self, candidate).inspect_err(|err| warn!(%err, "create rejected"))
    }

    pub fn update_shift(&mut self, id: &ShiftId, patch: ShiftPatch) -> Result<Shift, ShiftError> {
        info!(shift = %id, "update shift by id");
        mutate::update_shift(self, id, patch).inspect_err(|err| warn!(%err, "update rejected"))
    }

    pub fn delete_shift(&mut self, id: &ShiftId) -> Result<Shift, ShiftError> {
        info!(shift = %id, "delete shift by id");
        mutate::delete_shift(self, id).inspect_err(|err| warn!(%err, "delete rejected"))
    }

    pub fn publish_shifts(&mut self, ids: &[ShiftId]) -> Result<Vec<Shift>, ShiftError> {
        info!(count = ids.len(), "publish shifts");
        let published = mutate::publish_shifts(self, ids)?;
        info!(requested = ids.len(), published = published.len(), "publish done");
        Ok(published)
    }

    /// Publie tous les shifts de la semaine contenant `date`.
    pub fn publish_week(&mut self, date: NaiveDate) -> Result<Vec<Shift>, ShiftError> {
        info!(%date, "publish week");
        mutate::publish_week(self, date)
    }
}
