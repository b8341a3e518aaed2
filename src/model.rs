use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quart de travail tel que conservé par le store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Instant de début (date + heure de début).
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Instant de fin (date + heure de fin).
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    /// Chevauchement `[start, end)` avec un autre créneau du même jour.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        overlaps(self.starts_at(), self.ends_at(), start, end)
    }

    /// Applique un patch partiel ; `id`, `created_at` et `updated_at` restent intacts.
    pub fn merged(&self, patch: &ShiftPatch) -> Shift {
        let mut out = self.clone();
        if let Some(name) = &patch.name {
            out.name = name.clone();
        }
        if let Some(date) = patch.date {
            out.date = date;
        }
        if let Some(start) = patch.start_time {
            out.start_time = start;
        }
        if let Some(end) = patch.end_time {
            out.end_time = end;
        }
        if let Some(published) = patch.is_published {
            out.is_published = published;
        }
        out
    }
}

/// Données de création d'un quart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShift {
    pub name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl NewShift {
    pub fn new<N: Into<String>>(
        name: N,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            start_time,
            end_time,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }
}

impl From<&Shift> for NewShift {
    fn from(shift: &Shift) -> Self {
        Self {
            name: shift.name.clone(),
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
        }
    }
}

/// Mise à jour partielle ; les champs `None` ne sont pas touchés.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_published: Option<bool>,
}

impl ShiftPatch {
    /// Patch de publication (le seul qui touche `is_published`).
    pub fn publish() -> Self {
        Self {
            is_published: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub(crate) fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Parse une heure `HH:MM` (ou `HH:MM:SS`).
pub fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

/// Parse une date `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
}

/// Sérialisation des heures au format `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn back_to_back_intervals_do_not_overlap() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(!overlaps(d.and_time(t(9, 0)), d.and_time(t(12, 0)), d.and_time(t(12, 0)), d.and_time(t(13, 0))));
        assert!(overlaps(d.and_time(t(9, 0)), d.and_time(t(12, 0)), d.and_time(t(11, 59)), d.and_time(t(13, 0))));
        assert!(overlaps(d.and_time(t(9, 0)), d.and_time(t(12, 0)), d.and_time(t(9, 0)), d.and_time(t(12, 0))));
    }

    #[test]
    fn parse_time_accepts_minutes_and_seconds() {
        assert_eq!(parse_time("09:30").unwrap(), t(9, 30));
        assert_eq!(parse_time(" 17:05:00 ").unwrap(), t(17, 5));
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn shift_serializes_times_as_hhmm() {
        let now = Utc::now();
        let shift = Shift {
            id: ShiftId::new("s1"),
            name: "matin".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: t(9, 0),
            end_time: t(12, 30),
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["end_time"], "12:30");
        assert_eq!(json["date"], "2024-01-01");

        let back: Shift = serde_json::from_value(json).unwrap();
        assert_eq!(back, shift);
    }

    #[test]
    fn merged_keeps_identity_and_applies_fields() {
        let now = Utc::now();
        let shift = Shift {
            id: ShiftId::new("s1"),
            name: "matin".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: t(9, 0),
            end_time: t(12, 0),
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        let patch = ShiftPatch {
            end_time: Some(t(13, 0)),
            ..ShiftPatch::default()
        };
        let merged = shift.merged(&patch);
        assert_eq!(merged.id, shift.id);
        assert_eq!(merged.name, "matin");
        assert_eq!(merged.end_time, t(13, 0));
        assert_eq!(merged.created_at, shift.created_at);
    }
}
