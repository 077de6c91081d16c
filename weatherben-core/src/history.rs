//! Search history: the in-memory collection and where it is persisted.

use anyhow::{Context, Result};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::model::HistoryEntry;

/// Storage key the history is kept under.
pub const STORAGE_KEY: &str = "storedHistory";

/// Durable storage for the whole history collection.
pub trait HistoryRepository: Send + Sync + Debug {
    /// Stored entries, or an empty list when nothing was saved yet.
    fn load(&self) -> Result<Vec<HistoryEntry>>;

    /// Replace the stored collection.
    fn save(&self, entries: &[HistoryEntry]) -> Result<()>;
}

/// JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryRepository for JsonFileHistory {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(entries).context("Failed to serialize history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }
}

/// Process-local store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl HistoryRepository for MemoryHistory {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        *guard = entries.to_vec();
        Ok(())
    }
}

/// Ordered history with monotonic id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// `None` once every id up to `u64::MAX` has been handed out.
    next_id: Option<u64>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: Some(1),
        }
    }
}

impl History {
    /// Rehydrate from stored entries. The next id is one past the largest
    /// stored id, so ids freed by earlier deletions are never handed out.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let next_id = match entries.iter().map(|e| e.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        if next_id.is_none() {
            tracing::error!(
                "stored history uses the largest possible id; new searches will not be recorded"
            );
        }

        Self { entries, next_id }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id the next entry will get, or `None` when ids are exhausted.
    pub fn next_id(&self) -> Option<u64> {
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append an entry under the next id and return that id.
    ///
    /// Returns `None` and leaves the collection untouched once ids are exhausted.
    pub fn push(&mut self, city: String, country: String, timestamp: String) -> Option<u64> {
        let id = self.next_id?;
        self.entries.push(HistoryEntry {
            id,
            city,
            country,
            timestamp,
        });
        self.next_id = id.checked_add(1);
        Some(id)
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, city: &str) -> HistoryEntry {
        HistoryEntry {
            id,
            city: city.into(),
            country: "TH".into(),
            timestamp: "03-07-2024, 06:05 PM".into(),
        }
    }

    #[test]
    fn empty_history_starts_at_one() {
        let mut history = History::default();
        assert_eq!(history.next_id(), Some(1));

        let id = history.push("Bangkok".into(), "TH".into(), "now".into());
        assert_eq!(id, Some(1));
        assert_eq!(history.next_id(), Some(2));
    }

    #[test]
    fn next_id_follows_max_not_length() {
        // ids 2 and 3 survived a deletion of 1; length + 1 would collide with 3
        let history = History::from_entries(vec![entry(2, "Chiang Mai"), entry(3, "Phuket")]);
        assert_eq!(history.next_id(), Some(4));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut history = History::default();
        history.push("A".into(), "".into(), "t".into());
        let last = history.push("B".into(), "".into(), "t".into()).unwrap();

        assert!(history.remove(last));
        let id = history.push("C".into(), "".into(), "t".into());

        assert_eq!(id, Some(last + 1));
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let mut history =
            History::from_entries(vec![entry(1, "A"), entry(2, "B"), entry(3, "C")]);

        assert!(history.remove(2));
        let ids: Vec<u64> = history.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut history = History::from_entries(vec![entry(1, "A")]);
        let before = history.clone();

        assert!(!history.remove(42));
        assert_eq!(history, before);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistory::new(dir.path().join("storedHistory.json"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistory::new(dir.path().join("nested/storedHistory.json"));
        let entries = vec![entry(1, "Bangkok"), entry(4, "Phuket")];

        store.save(&entries).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, entries);
        assert_eq!(History::from_entries(loaded).next_id(), Some(5));
    }

    #[test]
    fn file_store_reads_stored_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storedHistory.json");
        fs::write(
            &path,
            r#"[{"id":1,"city":"Manila","country":"PH","timestamp":"01-02-2025, 09:15 AM"}]"#,
        )
        .unwrap();

        let loaded = JsonFileHistory::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].city, "Manila");
        assert_eq!(loaded[0].timestamp, "01-02-2025, 09:15 AM");
    }

    #[test]
    fn file_store_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storedHistory.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileHistory::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse history file"));
    }

    #[test]
    fn file_store_with_largest_id_loads_without_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storedHistory.json");
        fs::write(
            &path,
            format!(
                r#"[{{"id":{},"city":"Manila","country":"PH","timestamp":"t"}}]"#,
                u64::MAX
            ),
        )
        .unwrap();

        let mut history = History::from_entries(JsonFileHistory::new(&path).load().unwrap());

        assert_eq!(history.next_id(), None);
        assert_eq!(history.push("Hanoi".into(), "VN".into(), "t".into()), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn last_id_is_handed_out_once() {
        let mut history = History::from_entries(vec![entry(u64::MAX - 1, "A")]);

        assert_eq!(history.push("B".into(), "".into(), "t".into()), Some(u64::MAX));
        assert_eq!(history.push("C".into(), "".into(), "t".into()), None);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn memory_store_poisoned_lock_is_error() {
        let store = std::sync::Arc::new(MemoryHistory::with_entries(vec![entry(1, "A")]));
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(store.load().is_err());
        assert!(store.save(&[]).is_err());
    }

    #[test]
    fn memory_store_keeps_last_save() {
        let store = MemoryHistory::default();
        store.save(&[entry(1, "A")]).unwrap();
        store.save(&[entry(1, "A"), entry(2, "B")]).unwrap();

        assert_eq!(store.load().unwrap().len(), 2);
    }
}
