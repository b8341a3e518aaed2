//! Filtres composables pour interroger un [`ShiftStore`](crate::storage::ShiftStore).
//!
//! Une requête est un arbre : des feuilles `{champ, opérateur, valeur}`
//! combinées par des nœuds `And` / `Or`, plus un ordre de tri optionnel.

use crate::model::Shift;
use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Date,
    StartTime,
    EndTime,
    IsPublished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Bool(bool),
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Cmp { field: Field, op: CmpOp, value: Value },
    /// Intervalle inclusif `[low, high]`.
    Between { field: Field, low: Value, high: Value },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn cmp<V: Into<Value>>(field: Field, op: CmpOp, value: V) -> Self {
        Predicate::Cmp {
            field,
            op,
            value: value.into(),
        }
    }

    pub fn eq<V: Into<Value>>(field: Field, value: V) -> Self {
        Self::cmp(field, CmpOp::Eq, value)
    }

    pub fn between<V: Into<Value>>(field: Field, low: V, high: V) -> Self {
        Predicate::Between {
            field,
            low: low.into(),
            high: high.into(),
        }
    }

    /// Évalue le prédicat sur un shift. Une comparaison entre types
    /// incompatibles (ex. `Date` contre `Time`) ne matche jamais.
    pub fn matches(&self, shift: &Shift) -> bool {
        match self {
            Predicate::Cmp { field, op, value } => {
                compare(shift, *field, value).is_some_and(|ord| op.accepts(ord))
            }
            Predicate::Between { field, low, high } => {
                compare(shift, *field, low).is_some_and(|o| o != Ordering::Less)
                    && compare(shift, *field, high).is_some_and(|o| o != Ordering::Greater)
            }
            // `And([])` est vrai, `Or([])` est faux
            Predicate::And(all) => all.iter().all(|p| p.matches(shift)),
            Predicate::Or(any) => any.iter().any(|p| p.matches(shift)),
        }
    }
}

fn compare(shift: &Shift, field: Field, value: &Value) -> Option<Ordering> {
    match (field, value) {
        (Field::Id, Value::Text(v)) => Some(shift.id.as_str().cmp(v.as_str())),
        (Field::Name, Value::Text(v)) => Some(shift.name.as_str().cmp(v.as_str())),
        (Field::Date, Value::Date(v)) => Some(shift.date.cmp(v)),
        (Field::StartTime, Value::Time(v)) => Some(shift.start_time.cmp(v)),
        (Field::EndTime, Value::Time(v)) => Some(shift.end_time.cmp(v)),
        (Field::IsPublished, Value::Bool(v)) => Some(shift.is_published.cmp(v)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Requête complète : filtre + tri.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Option<Predicate>,
    pub order: Vec<(Field, Direction)>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(predicate: Predicate) -> Self {
        Self {
            filter: Some(predicate),
            order: Vec::new(),
        }
    }

    pub fn order_by(mut self, field: Field, direction: Direction) -> Self {
        self.order.push((field, direction));
        self
    }

    pub fn matches(&self, shift: &Shift) -> bool {
        self.filter.as_ref().map_or(true, |p| p.matches(shift))
    }

    /// Trie selon `order` (tri stable, les clés sont appliquées dans l'ordre).
    pub fn sort(&self, shifts: &mut [Shift]) {
        if self.order.is_empty() {
            return;
        }
        shifts.sort_by(|a, b| {
            self.order
                .iter()
                .map(|(field, dir)| {
                    let ord = field_ordering(a, b, *field);
                    match dir {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }
}

fn field_ordering(a: &Shift, b: &Shift, field: Field) -> Ordering {
    match field {
        Field::Id => a.id.cmp(&b.id),
        Field::Name => a.name.cmp(&b.name),
        Field::Date => a.date.cmp(&b.date),
        Field::StartTime => a.start_time.cmp(&b.start_time),
        Field::EndTime => a.end_time.cmp(&b.end_time),
        Field::IsPublished => a.is_published.cmp(&b.is_published),
    }
}
