//! TaskBoard - 永続化されるタスクリスト
//!
//! 変更はメモリ上に先に反映し、その後 KeyValueStore に書く。書き込みに失敗しても
//! メモリ上の変更は残り、エラーは呼び出し側に返す。

use std::sync::Arc;

use crate::domain::settings::default_tasks;
use crate::domain::{StoreError, TaskItem};
use crate::ports::{Clock, KeyValueStore};

use super::persistence::{TASKS_KEY, load_or, save_json};

pub struct TaskBoard {
    tasks: Vec<TaskItem>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TaskBoard {
    /// Stored list if it decodes, otherwise the default list.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let tasks = load_or(store.as_ref(), TASKS_KEY, default_tasks());
        Self { tasks, store, clock }
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    fn persist(&self) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), TASKS_KEY, &self.tasks).inspect_err(|e| {
            tracing::warn!(event = "tasks.save_failed", error = %e);
        })
    }

    /// Ids are creation-time milliseconds, bumped when two tasks land in the
    /// same millisecond.
    fn next_id(&self) -> u64 {
        let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let max_existing = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        if self.tasks.iter().any(|t| t.id == now) {
            max_existing + 1
        } else {
            now
        }
    }

    /// Add a task at the top of the list. Blank titles are ignored.
    pub fn add(&mut self, title: &str) -> Result<Option<u64>, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let id = self.next_id();
        self.tasks.insert(0, TaskItem::new(id, title, false));
        self.persist()?;
        Ok(Some(id))
    }

    /// Flip completion. Returns false for unknown ids.
    pub fn toggle(&mut self, id: u64) -> Result<bool, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        self.persist()?;
        Ok(true)
    }

    /// Returns false for unknown ids.
    pub fn remove(&mut self, id: u64) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::MemoryStore;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    const NOW_MS: u64 = 1_700_000_000_000;

    fn board(store: Arc<MemoryStore>) -> TaskBoard {
        let clock = FixedClock::new(Utc.timestamp_millis_opt(NOW_MS as i64).unwrap());
        TaskBoard::load(store, Arc::new(clock))
    }

    fn stored(store: &MemoryStore) -> Vec<TaskItem> {
        load_or(store, TASKS_KEY, Vec::new())
    }

    #[test]
    fn starts_with_default_tasks() {
        let b = board(Arc::new(MemoryStore::new()));
        assert_eq!(b.tasks(), default_tasks().as_slice());
        assert_eq!(b.pending(), 3);
    }

    #[test]
    fn corrupt_record_keeps_defaults() {
        let b = board(Arc::new(MemoryStore::new().with_entry(TASKS_KEY, "{oops")));
        assert_eq!(b.tasks().len(), 5);
    }

    #[test]
    fn add_puts_new_task_first_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut b = board(store.clone());

        let id = b.add("  Ship it  ").unwrap();
        assert_eq!(id, Some(NOW_MS));
        assert_eq!(b.tasks()[0], TaskItem::new(NOW_MS, "Ship it", false));
        assert_eq!(stored(&store), b.tasks());
    }

    #[test]
    fn same_millisecond_adds_get_distinct_ids() {
        let mut b = board(Arc::new(MemoryStore::new()));
        let first = b.add("a").unwrap().unwrap();
        let second = b.add("b").unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn blank_title_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let mut b = board(store.clone());
        assert_eq!(b.add("   ").unwrap(), None);
        assert_eq!(b.tasks().len(), 5);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_and_remove() {
        let store = Arc::new(MemoryStore::new());
        let mut b = board(store.clone());

        assert!(b.toggle(1).unwrap());
        assert!(b.tasks()[0].completed);
        assert!(!b.toggle(99).unwrap());

        assert!(b.remove(2).unwrap());
        assert!(!b.remove(2).unwrap());
        assert_eq!(b.tasks().len(), 4);
        assert_eq!(stored(&store), b.tasks());
    }

    #[test]
    fn reload_sees_saved_list() {
        let store = Arc::new(MemoryStore::new());
        let mut b = board(store.clone());
        b.remove(1).unwrap();
        let reloaded = board(store);
        assert_eq!(reloaded.tasks().len(), 4);
    }
}
