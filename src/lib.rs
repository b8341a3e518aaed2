#![forbid(unsafe_code)]
//! Quart — planification hebdomadaire de quarts de travail avec publication.
//!
//! - Validation à la création : plage horaire, semaine publiée, chevauchement `[start, end)`.
//! - Un shift publié est figé (ni modification ni suppression).
//! - Une semaine (lundi → dimanche) est publiée quand tous ses shifts le sont ;
//!   une semaine vide ne l'est jamais.
//! - Stockage derrière le trait [`ShiftStore`] (mémoire ou fichier JSON).

pub mod io;
pub mod model;
pub mod query;
pub mod scheduler;
pub mod storage;

pub use model::{NewShift, Shift, ShiftId, ShiftPatch};
pub use query::{CmpOp, Direction, Field, Predicate, Query, Value};
pub use scheduler::{Mutation, Scheduler, ShiftError, WeekStatus, WeekWindow};
pub use storage::{JsonStore, MemoryStore, ShiftStore};
