use super::ShiftError;
use crate::model::Shift;
use crate::query::{Field, Predicate, Query};
use crate::storage::ShiftStore;
use chrono::{Datelike, Days, NaiveDate};

/// Semaine ISO : du lundi au dimanche inclus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// `None` pour une semaine qui déborde des bornes de dates de chrono.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let start = date.checked_sub_days(Days::new(offset))?;
        let end = start.checked_add_days(Days::new(6))?;
        Some(Self { start, end })
    }

    /// Comme [`WeekWindow::containing`], avec un rejet `DateOutOfRange`.
    pub fn try_containing(date: NaiveDate) -> Result<Self, ShiftError> {
        Self::containing(date).ok_or(ShiftError::DateOutOfRange(date))
    }

    pub fn next(&self) -> Option<Self> {
        Self::containing(self.start.checked_add_days(Days::new(7))?)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::containing(self.start.checked_sub_days(Days::new(7))?)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(7)
    }

    pub fn query(&self) -> Query {
        Query::filter(Predicate::between(Field::Date, self.start, self.end))
    }
}

/// État de publication d'une semaine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekStatus {
    pub window: WeekWindow,
    pub total: usize,
    pub published: usize,
}

impl WeekStatus {
    pub fn from_shifts(window: WeekWindow, shifts: &[Shift]) -> Self {
        Self {
            window,
            total: shifts.len(),
            published: shifts.iter().filter(|s| s.is_published).count(),
        }
    }

    /// Une semaine vide n'est pas publiée : l'absence de shifts ne doit pas
    /// bloquer les créations futures.
    pub fn is_published(&self) -> bool {
        self.total > 0 && self.published == self.total
    }
}

pub fn week_status<S: ShiftStore + ?Sized>(
    store: &S,
    date: NaiveDate,
) -> Result<WeekStatus, ShiftError> {
    let window = WeekWindow::try_containing(date)?;
    let shifts = store.find(&window.query())?;
    Ok(WeekStatus::from_shifts(window, &shifts))
}

pub fn is_week_published<S: ShiftStore + ?Sized>(
    store: &S,
    date: NaiveDate,
) -> Result<bool, ShiftError> {
    Ok(week_status(store, date)?.is_published())
}
