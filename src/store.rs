use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// String-keyed store of raw JSON values, the only durable interface of the
/// tracker. Mirrors the browser original's storage map, except that IO and
/// serialization failures surface as errors instead of being swallowed.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed store: one JSON object per file, loaded eagerly and written
/// back whole on every mutation via tmp-then-rename.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn get_base_dir() -> Result<PathBuf> {
        let mut path =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        path.push(".uno");
        if !path.exists() {
            fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    pub fn open_default() -> Result<Self> {
        let path = Self::get_base_dir()?;
        Self::from_path(path.join("db.json"))
    }

    pub fn from_path(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemStore {
    entries: BTreeMap<String, String>,
}

impl KvStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// An absent key reads as the empty collection.
pub fn get_vec<T, S>(store: &S, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn set_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: KvStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLimit, Distraction};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let db_path = dir.path().join("db.json");

        let mut store = FileStore::from_path(db_path.clone())?;
        store.set("history", "[1,2,3]")?;

        let reopened = FileStore::from_path(db_path)?;
        assert_eq!(reopened.get("history")?, Some("[1,2,3]".to_string()));
        assert_eq!(reopened.get("achievements")?, None);

        Ok(())
    }

    #[test]
    fn test_file_store_remove() -> Result<()> {
        let dir = tempdir()?;
        let db_path = dir.path().join("db.json");

        let mut store = FileStore::from_path(db_path.clone())?;
        store.set("daily_limit", "{}")?;
        store.remove("daily_limit")?;
        store.remove("never_existed")?;

        let reopened = FileStore::from_path(db_path)?;
        assert_eq!(reopened.get("daily_limit")?, None);

        Ok(())
    }

    #[test]
    fn test_get_vec_absent_key_is_empty() -> Result<()> {
        let store = MemStore::default();
        let items: Vec<Distraction> = get_vec(&store, "distractions")?;
        assert!(items.is_empty());
        Ok(())
    }

    #[test]
    fn test_typed_helpers() -> Result<()> {
        let mut store = MemStore::default();
        let record = DailyLimit {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            count: 2,
        };
        set_json(&mut store, "daily_limit", &record)?;

        let loaded: Option<DailyLimit> = get_json(&store, "daily_limit")?;
        assert_eq!(loaded, Some(record));
        let missing: Option<DailyLimit> = get_json(&store, "other")?;
        assert!(missing.is_none());

        Ok(())
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let mut store = MemStore::default();
        store.set("daily_limit", "not json").unwrap();
        let loaded: Result<Option<DailyLimit>> = get_json(&store, "daily_limit");
        assert!(loaded.is_err());
    }
}
