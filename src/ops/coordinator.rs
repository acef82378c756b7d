use crate::io::persist::{self, Snapshot};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::collection::CollectionState;
use crate::model::config::DEFAULT_STORAGE_KEY;
use crate::model::tab::Tab;
use crate::model::task::{Task, TaskDraft, ValidationError};

/// Error type for coordinator operations
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not save: {0}")]
    Store(#[from] StoreError),
}

/// Owns the collection and is its only mutator. Every operation that changes
/// the collection writes the full snapshot back to the store before returning.
///
/// Operations that reference a tab or task that no longer exists are no-ops:
/// they return `false` / `None` and do not touch the store.
///
/// If the store write fails the in-memory change is kept and
/// [`CoordinatorError::Store`] is returned.
pub struct Coordinator<S: KeyValueStore> {
    state: CollectionState,
    store: S,
    key: String,
}

impl<S: KeyValueStore> Coordinator<S> {
    /// Restore the collection from `store` under the default key
    pub fn open(store: S) -> Self {
        Self::open_with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Restore the collection from `store` under `key`, then reapply the
    /// remembered active tab if it still exists.
    pub fn open_with_key(store: S, key: &str) -> Self {
        let snapshot = persist::load(&store, key);
        let mut coordinator = Coordinator {
            state: CollectionState::new(),
            store,
            key: key.to_string(),
        };
        coordinator.restore(snapshot);
        if let Some(active) = persist::load_active_tab(&coordinator.store, key)
            && !coordinator.state.set_active_tab(&active)
        {
            tracing::debug!(tab = %active, "remembered active tab no longer exists");
        }
        coordinator
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the collection wholesale. An absent, empty or partially
    /// malformed snapshot degrades to defaults rather than failing.
    pub fn restore(&mut self, snapshot: Option<Snapshot>) {
        self.state = match snapshot {
            Some(snapshot) => persist::state_from(snapshot),
            None => {
                tracing::info!(key = %self.key, "no stored collection, starting fresh");
                CollectionState::new()
            }
        };
    }

    /// The serializable form of the whole collection
    pub fn snapshot(&self) -> Snapshot {
        persist::snapshot_of(&self.state)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        persist::save(&mut self.store, &self.key, &snapshot)
    }

    // -----------------------------------------------------------------------
    // Tabs
    // -----------------------------------------------------------------------

    /// Append a new tab. The active tab is left unchanged. Returns the new id.
    pub fn add_tab(&mut self, name: &str) -> Result<String, CoordinatorError> {
        let tab = Tab::create(name)?;
        let id = tab.id().to_string();
        self.state.tabs.push(tab);
        self.flush()?;
        tracing::info!(tab = %id, name, "added tab");
        Ok(id)
    }

    /// Remove a tab and its tasks. The General tab is never removed.
    pub fn remove_tab(&mut self, tab_id: &str) -> Result<bool, CoordinatorError> {
        let was_active = self.state.active_tab_id() == tab_id;
        let Some(removed) = self.state.remove_tab(tab_id) else {
            tracing::debug!(tab = %tab_id, "remove_tab: no removable tab");
            return Ok(false);
        };
        self.flush()?;
        if was_active {
            let active = self.state.active_tab_id().to_string();
            persist::save_active_tab(&mut self.store, &self.key, &active)?;
        }
        tracing::info!(tab = %tab_id, tasks = removed.tasks.len(), "removed tab");
        Ok(true)
    }

    pub fn set_active_tab(&mut self, tab_id: &str) -> Result<bool, CoordinatorError> {
        if !self.state.set_active_tab(tab_id) {
            tracing::debug!(tab = %tab_id, "set_active_tab: unknown tab");
            return Ok(false);
        }
        persist::save_active_tab(&mut self.store, &self.key, tab_id)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Add a task to the end of a tab. Returns the new task id, or `None` if
    /// the tab does not exist. The draft is validated first either way.
    pub fn add_task(
        &mut self,
        tab_id: &str,
        draft: TaskDraft,
    ) -> Result<Option<String>, CoordinatorError> {
        let task = Task::from_draft(draft)?;
        let Some(tab) = self.state.find_tab_mut(tab_id) else {
            tracing::debug!(tab = %tab_id, "add_task: unknown tab");
            return Ok(None);
        };
        let id = task.id().to_string();
        tab.add_task(task);
        self.flush()?;
        Ok(Some(id))
    }

    /// Replace a task's editable fields, wherever the task lives
    pub fn edit_task(&mut self, task_id: &str, draft: TaskDraft) -> Result<bool, CoordinatorError> {
        let Some(task) = self.state.find_task_mut(task_id) else {
            // Still reject an invalid draft so the caller sees the field error
            if draft.name.trim().is_empty() {
                return Err(ValidationError::EmptyTaskName.into());
            }
            tracing::debug!(task = %task_id, "edit_task: unknown task");
            return Ok(false);
        };
        task.apply_draft(draft)?;
        self.flush()?;
        Ok(true)
    }

    pub fn remove_task(&mut self, tab_id: &str, task_id: &str) -> Result<bool, CoordinatorError> {
        let removed = self
            .state
            .find_tab_mut(tab_id)
            .and_then(|tab| tab.remove_task(task_id));
        if removed.is_none() {
            tracing::debug!(tab = %tab_id, task = %task_id, "remove_task: not found");
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn toggle_task_completed(
        &mut self,
        tab_id: &str,
        task_id: &str,
    ) -> Result<bool, CoordinatorError> {
        self.update_task(tab_id, task_id, Task::toggle_completed)
    }

    pub fn cycle_task_priority(
        &mut self,
        tab_id: &str,
        task_id: &str,
    ) -> Result<bool, CoordinatorError> {
        self.update_task(tab_id, task_id, Task::cycle_priority)
    }

    fn update_task(
        &mut self,
        tab_id: &str,
        task_id: &str,
        f: impl FnOnce(&mut Task),
    ) -> Result<bool, CoordinatorError> {
        let Some(task) = self
            .state
            .find_tab_mut(tab_id)
            .and_then(|tab| tab.find_task_mut(task_id))
        else {
            tracing::debug!(tab = %tab_id, task = %task_id, "task not found");
            return Ok(false);
        };
        f(task);
        self.flush()?;
        Ok(true)
    }
}
