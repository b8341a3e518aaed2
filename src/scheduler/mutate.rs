use super::{conflicts, week::WeekWindow, Mutation, Scheduler, ShiftError};
use crate::model::{NewShift, Shift, ShiftId, ShiftPatch};
use crate::storage::ShiftStore;
use chrono::NaiveDate;
use tracing::debug;

pub(super) fn create_shift<S: ShiftStore>(
    scheduler: &mut Scheduler<S>,
    candidate: NewShift,
) -> Result<Shift, ShiftError> {
    conflicts::validate_create(&scheduler.store, &candidate, None)?;
    Ok(scheduler.store.create(candidate)?)
}

pub(super) fn update_shift<S: ShiftStore>(
    scheduler: &mut Scheduler<S>,
    id: &ShiftId,
    mut patch: ShiftPatch,
) -> Result<Shift, ShiftError> {
    let existing = scheduler.store.find_by_id(id)?;
    let shift = conflicts::validate_mutation(existing.as_ref(), id, Mutation::Update)?;

    // la publication passe uniquement par `publish_shifts`
    if patch.is_published.take().is_some() {
        debug!(shift = %id, "ignoring is_published in update payload");
    }
    if patch.is_empty() {
        return Ok(shift.clone());
    }

    let merged = NewShift::from(&shift.merged(&patch));
    conflicts::validate_create(&scheduler.store, &merged, Some(id))?;

    scheduler
        .store
        .update_by_id(id, &patch)?
        .ok_or_else(|| ShiftError::NotFound(id.clone()))
}

pub(super) fn delete_shift<S: ShiftStore>(
    scheduler: &mut Scheduler<S>,
    id: &ShiftId,
) -> Result<Shift, ShiftError> {
    let existing = scheduler.store.find_by_id(id)?;
    conflicts::validate_mutation(existing.as_ref(), id, Mutation::Delete)?;
    scheduler
        .store
        .delete_by_id(id)?
        .ok_or_else(|| ShiftError::NotFound(id.clone()))
}

/// Publication best-effort : chaque id est traité indépendamment, les ids
/// inconnus sont omis du résultat sans erreur. Une panne du store interrompt
/// le lot.
pub(super) fn publish_shifts<S: ShiftStore>(
    scheduler: &mut Scheduler<S>,
    ids: &[ShiftId],
) -> Result<Vec<Shift>, ShiftError> {
    let patch = ShiftPatch::publish();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match scheduler.store.update_by_id(id, &patch)? {
            Some(shift) => out.push(shift),
            None => debug!(shift = %id, "publish skipped: not found"),
        }
    }
    Ok(out)
}

pub(super) fn publish_week<S: ShiftStore>(
    scheduler: &mut Scheduler<S>,
    date: NaiveDate,
) -> Result<Vec<Shift>, ShiftError> {
    let window = WeekWindow::try_containing(date)?;
    let ids: Vec<ShiftId> = scheduler
        .store
        .find(&window.query())?
        .into_iter()
        .map(|s| s.id)
        .collect();
    publish_shifts(scheduler, &ids)
}
