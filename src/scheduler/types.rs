use crate::model::ShiftId;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Mutation demandée sur un shift existant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Update => f.write_str("update"),
            Mutation::Delete => f.write_str("delete"),
        }
    }
}

/// Rejets métier + échec du store (transmis tel quel).
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("invalid time range: end time must be after start time")]
    InvalidTimeRange,
    #[error("cannot change shifts of published week (week of {week_start})")]
    WeekAlreadyPublished { week_start: NaiveDate },
    #[error("date out of supported range: {0}")]
    DateOutOfRange(NaiveDate),
    #[error("overlapping schedule with shift {0}")]
    OverlappingShift(ShiftId),
    #[error("shift not found: {0}")]
    NotFound(ShiftId),
    #[error("cannot {action} published shift {id}")]
    PublishedImmutable { id: ShiftId, action: Mutation },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ShiftError {
    /// Vrai pour les rejets de validation (tout sauf une panne du store).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, ShiftError::Store(_))
    }
}
