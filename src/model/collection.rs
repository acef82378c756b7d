use std::collections::HashSet;

use super::tab::Tab;
use super::task::{Task, new_id};

/// All tabs plus the active-tab pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    /// Tabs in creation order
    pub tabs: Vec<Tab>,
    active_tab_id: String,
}

impl Default for CollectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionState {
    /// Fresh state holding only the General tab, which is active
    pub fn new() -> Self {
        let general = Tab::general();
        let active_tab_id = general.id().to_string();
        CollectionState {
            tabs: vec![general],
            active_tab_id,
        }
    }

    /// Build a state from restored tabs, repairing the invariants:
    /// exactly one General tab (inserted at the front if missing), globally
    /// unique task and tab ids, and the General tab active.
    pub fn from_tabs(mut tabs: Vec<Tab>) -> Self {
        let mut seen_general = false;
        for tab in &mut tabs {
            if tab.is_general() {
                if seen_general {
                    tab.clear_general();
                }
                seen_general = true;
            }
        }
        if !seen_general {
            tabs.insert(0, Tab::general());
        }

        let mut tab_ids = HashSet::new();
        let mut task_ids = HashSet::new();
        let tabs = tabs
            .into_iter()
            .map(|tab| {
                let tab = if tab.id().is_empty() || !tab_ids.insert(tab.id().to_string()) {
                    let id = new_id();
                    tab_ids.insert(id.clone());
                    Tab::restored(id, tab.name.clone(), tab.is_general(), tab.tasks)
                } else {
                    tab
                };
                reassign_duplicate_task_ids(tab, &mut task_ids)
            })
            .collect::<Vec<_>>();

        let active_tab_id = tabs
            .iter()
            .find(|t| t.is_general())
            .map(|t| t.id().to_string())
            .unwrap_or_default();
        CollectionState {
            tabs,
            active_tab_id,
        }
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    /// Point the active tab at `tab_id`. Returns false (and changes nothing)
    /// if no such tab exists.
    pub fn set_active_tab(&mut self, tab_id: &str) -> bool {
        if self.find_tab(tab_id).is_none() {
            return false;
        }
        self.active_tab_id = tab_id.to_string();
        true
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.find_tab(&self.active_tab_id)
    }

    pub fn general_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.is_general())
    }

    pub fn find_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == tab_id)
    }

    pub fn find_tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == tab_id)
    }

    /// Find a task anywhere in the collection, along with the tab holding it
    pub fn find_task(&self, task_id: &str) -> Option<(&Tab, &Task)> {
        self.tabs
            .iter()
            .find_map(|tab| tab.find_task(task_id).map(|task| (tab, task)))
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tabs
            .iter_mut()
            .find_map(|tab| tab.find_task_mut(task_id))
    }

    /// Remove a non-general tab. If it was active, the first remaining tab
    /// becomes active. Returns the removed tab.
    pub fn remove_tab(&mut self, tab_id: &str) -> Option<Tab> {
        let idx = self
            .tabs
            .iter()
            .position(|t| t.id() == tab_id && !t.is_general())?;
        let removed = self.tabs.remove(idx);
        if self.active_tab_id == tab_id {
            // The General tab can never be removed, so tabs is non-empty here
            self.active_tab_id = self
                .tabs
                .first()
                .map(|t| t.id().to_string())
                .unwrap_or_default();
        }
        Some(removed)
    }
}

fn reassign_duplicate_task_ids(tab: Tab, seen: &mut HashSet<String>) -> Tab {
    let id = tab.id().to_string();
    let is_general = tab.is_general();
    let name = tab.name;
    let tasks = tab
        .tasks
        .into_iter()
        .map(|task| {
            if !task.id().is_empty() && seen.insert(task.id().to_string()) {
                return task;
            }
            let fresh = new_id();
            seen.insert(fresh.clone());
            Task::restored(
                fresh,
                task.name,
                task.due_date,
                task.description,
                task.priority,
                task.completed,
            )
        })
        .collect();
    Tab::restored(id, name, is_general, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;

    fn task_with_id(id: &str, name: &str) -> Task {
        Task::restored(
            id.to_string(),
            name.to_string(),
            None,
            String::new(),
            Priority::Low,
            false,
        )
    }

    #[test]
    fn new_state_has_only_general_active() {
        let state = CollectionState::new();
        assert_eq!(state.tabs.len(), 1);
        assert!(state.tabs[0].is_general());
        assert_eq!(state.active_tab_id(), state.tabs[0].id());
    }

    #[test]
    fn set_active_tab_unknown_is_noop() {
        let mut state = CollectionState::new();
        let before = state.active_tab_id().to_string();
        assert!(!state.set_active_tab("missing"));
        assert_eq!(state.active_tab_id(), before);
    }

    #[test]
    fn remove_active_tab_falls_back_to_first() {
        let mut state = CollectionState::new();
        let work = Tab::create("Work").unwrap();
        let work_id = work.id().to_string();
        state.tabs.push(work);
        state.set_active_tab(&work_id);

        assert!(state.remove_tab(&work_id).is_some());
        assert_eq!(state.active_tab_id(), state.tabs[0].id());
    }

    #[test]
    fn general_tab_cannot_be_removed() {
        let mut state = CollectionState::new();
        let general_id = state.tabs[0].id().to_string();
        assert!(state.remove_tab(&general_id).is_none());
        assert_eq!(state.tabs.len(), 1);
        assert_eq!(state.active_tab_id(), general_id);
    }

    #[test]
    fn from_tabs_inserts_missing_general() {
        let state = CollectionState::from_tabs(vec![Tab::restored(
            "w".into(),
            "Work".into(),
            false,
            Vec::new(),
        )]);
        assert_eq!(state.tabs.len(), 2);
        assert!(state.tabs[0].is_general());
        assert_eq!(state.tabs[1].name, "Work");
        assert_eq!(state.active_tab_id(), state.tabs[0].id());
    }

    #[test]
    fn from_tabs_keeps_only_first_general_flag() {
        let state = CollectionState::from_tabs(vec![
            Tab::restored("a".into(), "General".into(), true, Vec::new()),
            Tab::restored("b".into(), "Other".into(), true, Vec::new()),
        ]);
        assert_eq!(state.tabs.iter().filter(|t| t.is_general()).count(), 1);
        assert_eq!(state.active_tab_id(), "a");
    }

    #[test]
    fn from_tabs_reassigns_duplicate_ids() {
        let state = CollectionState::from_tabs(vec![
            Tab::restored(
                "g".into(),
                "General".into(),
                true,
                vec![task_with_id("t1", "one"), task_with_id("t1", "two")],
            ),
            Tab::restored("g".into(), "Dup".into(), false, vec![task_with_id("", "three")]),
        ]);
        let tab_ids: HashSet<_> = state.tabs.iter().map(|t| t.id()).collect();
        assert_eq!(tab_ids.len(), 2);
        let task_ids: HashSet<_> = state
            .tabs
            .iter()
            .flat_map(|t| t.tasks.iter().map(|task| task.id()))
            .collect();
        assert_eq!(task_ids.len(), 3);
        assert!(!task_ids.contains(""));
        // first occurrence keeps its id
        assert_eq!(state.tabs[0].tasks[0].id(), "t1");
        assert_eq!(state.tabs[0].tasks[1].name, "two");
    }

    #[test]
    fn find_task_across_tabs() {
        let mut state = CollectionState::new();
        let mut work = Tab::create("Work").unwrap();
        work.add_task(task_with_id("x", "Report"));
        state.tabs.push(work);

        let (tab, task) = state.find_task("x").unwrap();
        assert_eq!(tab.name, "Work");
        assert_eq!(task.name, "Report");
        assert!(state.find_task("y").is_none());
    }
}
