use super::{week, Mutation, ShiftError};
use crate::model::{NewShift, Shift, ShiftId};
use crate::query::{Field, Predicate, Query};
use crate::storage::ShiftStore;

/// Vérifie qu'une fin combinée à la date est strictement après le début.
pub fn validate_time_range(candidate: &NewShift) -> Result<(), ShiftError> {
    if candidate.ends_at() <= candidate.starts_at() {
        return Err(ShiftError::InvalidTimeRange);
    }
    Ok(())
}

/// Premier shift du même jour qui chevauche le candidat (`[start, end)`).
/// `exclude` écarte le shift en cours de modification.
pub fn find_overlap<S: ShiftStore + ?Sized>(
    store: &S,
    candidate: &NewShift,
    exclude: Option<&ShiftId>,
) -> anyhow::Result<Option<Shift>> {
    let same_day = store.find(&Query::filter(Predicate::eq(Field::Date, candidate.date)))?;
    let start = candidate.starts_at();
    let end = candidate.ends_at();
    Ok(same_day
        .into_iter()
        .filter(|s| exclude != Some(&s.id))
        .find(|s| s.overlaps(start, end)))
}

/// Règles de création, dans l'ordre : plage horaire, semaine publiée,
/// chevauchement. Ne modifie rien.
pub fn validate_create<S: ShiftStore + ?Sized>(
    store: &S,
    candidate: &NewShift,
    exclude: Option<&ShiftId>,
) -> Result<(), ShiftError> {
    validate_time_range(candidate)?;

    let status = week::week_status(store, candidate.date)?;
    if status.is_published() {
        return Err(ShiftError::WeekAlreadyPublished {
            week_start: status.window.start,
        });
    }

    if let Some(existing) = find_overlap(store, candidate, exclude)? {
        return Err(ShiftError::OverlappingShift(existing.id));
    }
    Ok(())
}

/// Garde commune à update/delete : le shift doit exister et ne pas être publié.
pub fn validate_mutation<'a>(
    existing: Option<&'a Shift>,
    id: &ShiftId,
    action: Mutation,
) -> Result<&'a Shift, ShiftError> {
    let shift = existing.ok_or_else(|| ShiftError::NotFound(id.clone()))?;
    if shift.is_published {
        return Err(ShiftError::PublishedImmutable {
            id: shift.id.clone(),
            action,
        });
    }
    Ok(shift)
}
