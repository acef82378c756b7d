use super::task::{Task, ValidationError, new_id};

/// Name given to the tab that always exists
pub const GENERAL_TAB_NAME: &str = "General";

/// A named grouping of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    id: String,
    pub name: String,
    is_general: bool,
    /// Tasks in insertion order
    pub tasks: Vec<Task>,
}

impl Tab {
    /// Create a user tab with an empty task list
    pub fn create(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyTabName);
        }
        Ok(Tab {
            id: new_id(),
            name,
            is_general: false,
            tasks: Vec::new(),
        })
    }

    /// Create the distinguished General tab
    pub fn general() -> Self {
        Tab {
            id: new_id(),
            name: GENERAL_TAB_NAME.to_string(),
            is_general: true,
            tasks: Vec::new(),
        }
    }

    pub(crate) fn restored(id: String, name: String, is_general: bool, tasks: Vec<Task>) -> Self {
        Tab {
            id,
            name,
            is_general,
            tasks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_general(&self) -> bool {
        self.is_general
    }

    pub(crate) fn clear_general(&mut self) {
        self.is_general = false;
    }

    /// Append a task at the end of the list
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Remove the task with this id. Returns the removed task, or `None`
    /// (leaving the list untouched) if no such task exists.
    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id() == task_id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == task_id)
    }
}
