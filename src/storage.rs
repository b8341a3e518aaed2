use crate::model::{NewShift, Shift, ShiftId, ShiftPatch};
use crate::query::Query;
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Accès aux enregistrements de shifts. Les erreurs sont opaques pour le cœur
/// et remontées telles quelles à l'appelant.
pub trait ShiftStore {
    /// Shifts correspondant au filtre, triés selon `query.order`.
    fn find(&self, query: &Query) -> anyhow::Result<Vec<Shift>>;
    fn find_by_id(&self, id: &ShiftId) -> anyhow::Result<Option<Shift>>;
    /// Insère un nouveau shift (id attribué ici, non publié).
    fn create(&mut self, fields: NewShift) -> anyhow::Result<Shift>;
    fn update_by_id(&mut self, id: &ShiftId, patch: &ShiftPatch) -> anyhow::Result<Option<Shift>>;
    fn delete_by_id(&mut self, id: &ShiftId) -> anyhow::Result<Option<Shift>>;
}

/// Store en mémoire : tests et intégration dans un autre processus.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shifts: Vec<Shift>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shifts(shifts: Vec<Shift>) -> Self {
        Self { shifts }
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    fn position(&self, id: &ShiftId) -> Option<usize> {
        self.shifts.iter().position(|s| &s.id == id)
    }
}

impl ShiftStore for MemoryStore {
    fn find(&self, query: &Query) -> anyhow::Result<Vec<Shift>> {
        let mut out: Vec<Shift> = self
            .shifts
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        query.sort(&mut out);
        Ok(out)
    }

    fn find_by_id(&self, id: &ShiftId) -> anyhow::Result<Option<Shift>> {
        Ok(self.position(id).map(|pos| self.shifts[pos].clone()))
    }

    fn create(&mut self, fields: NewShift) -> anyhow::Result<Shift> {
        let now = Utc::now();
        let shift = Shift {
            id: ShiftId::random(),
            name: fields.name,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        self.shifts.push(shift.clone());
        Ok(shift)
    }

    fn update_by_id(&mut self, id: &ShiftId, patch: &ShiftPatch) -> anyhow::Result<Option<Shift>> {
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };
        let mut updated = self.shifts[pos].merged(patch);
        updated.updated_at = Utc::now();
        self.shifts[pos] = updated.clone();
        Ok(Some(updated))
    }

    fn delete_by_id(&mut self, id: &ShiftId) -> anyhow::Result<Option<Shift>> {
        Ok(self.position(id).map(|pos| self.shifts.remove(pos)))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShiftFile {
    #[serde(default)]
    shifts: Vec<Shift>,
}

/// Store fichier JSON : tout est chargé à l'ouverture, chaque écriture
/// réécrit le fichier de manière atomique.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Ouvre (ou prépare) le fichier ; un fichier absent donne un store vide.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read(&path) {
            Ok(data) => serde_json::from_slice::<ShiftFile>(&data)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => ShiftFile::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self {
            path,
            inner: MemoryStore::with_shifts(file.shifts),
        })
    }

    pub fn shifts(&self) -> &[Shift] {
        self.inner.shifts()
    }

    /// Applique `op` sur une copie, l'écrit sur disque, puis seulement
    /// remplace l'état en mémoire : un échec d'écriture ne laisse rien.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> anyhow::Result<T>,
        changed: impl Fn(&T) -> bool,
    ) -> anyhow::Result<T> {
        let mut staged = self.inner.clone();
        let out = op(&mut staged)?;
        if changed(&out) {
            self.save(staged.shifts())?;
            self.inner = staged;
        }
        Ok(out)
    }

    fn save(&self, shifts: &[Shift]) -> anyhow::Result<()> {
        let file = ShiftFile {
            shifts: shifts.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&file)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl ShiftStore for JsonStore {
    fn find(&self, query: &Query) -> anyhow::Result<Vec<Shift>> {
        self.inner.find(query)
    }

    fn find_by_id(&self, id: &ShiftId) -> anyhow::Result<Option<Shift>> {
        self.inner.find_by_id(id)
    }

    fn create(&mut self, fields: NewShift) -> anyhow::Result<Shift> {
        self.commit(|store| store.create(fields), |_| true)
    }

    fn update_by_id(&mut self, id: &ShiftId, patch: &ShiftPatch) -> anyhow::Result<Option<Shift>> {
        self.commit(|store| store.update_by_id(id, patch), Option::is_some)
    }

    fn delete_by_id(&mut self, id: &ShiftId) -> anyhow::Result<Option<Shift>> {
        self.commit(|store| store.delete_by_id(id), Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Field, Predicate};
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    fn sample(name: &str) -> NewShift {
        NewShift::new(
            name,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn memory_store_crud() {
        let mut store = MemoryStore::new();
        let a = store.create(sample("a")).unwrap();
        assert!(!a.is_published);
        assert_eq!(store.len(), 1);

        let renamed = store
            .update_by_id(
                &a.id,
                &ShiftPatch {
                    name: Some("b".into()),
                    ..ShiftPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "b");
        assert!(renamed.updated_at >= a.updated_at);

        let missing = ShiftId::new("missing");
        assert!(store.update_by_id(&missing, &ShiftPatch::publish()).unwrap().is_none());
        assert!(store.delete_by_id(&missing).unwrap().is_none());

        let found = store
            .find(&Query::filter(Predicate::eq(Field::Name, "b")))
            .unwrap();
        assert_eq!(found.len(), 1);

        assert!(store.delete_by_id(&a.id).unwrap().is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn json_store_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shifts.json");

        let mut store = JsonStore::open(&path).unwrap();
        assert!(store.shifts().is_empty());
        let created = store.create(sample("matin")).unwrap();
        store.update_by_id(&created.id, &ShiftPatch::publish()).unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        let loaded = reopened.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(loaded.name, "matin");
        assert!(loaded.is_published);
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let path = sub.join("shifts.json");

        let mut store = JsonStore::open(&path).unwrap();
        let kept = store.create(sample("matin")).unwrap();
        fs::remove_dir_all(&sub).unwrap();

        assert!(store.create(sample("soir")).is_err());
        assert!(store.update_by_id(&kept.id, &ShiftPatch::publish()).is_err());
        assert!(store.delete_by_id(&kept.id).is_err());

        assert_eq!(store.shifts().len(), 1);
        let still = store.find_by_id(&kept.id).unwrap().unwrap();
        assert!(!still.is_published);
    }

    #[test]
    fn json_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shifts.json");
        fs::write(&path, b"{ not json").unwrap();
        let err = JsonStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }
}
