use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days, counted from the start of the reference day, during which
/// an upcoming due date is reported as [`DueStatus::DueSoon`].
pub const DUE_SOON_DAYS: u64 = 2;

/// Error raised when a required field is empty
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task name cannot be empty")]
    EmptyTaskName,
    #[error("tab name cannot be empty")]
    EmptyTabName,
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// The next priority in the fixed cycle low → medium → high → low
    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority name (case-insensitive)
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::parse(s)
            .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
    }
}

/// How close a task is to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Normal,
    None,
}

/// The user-editable fields of a task, as entered in a create/edit form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>) -> Self {
        TaskDraft {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: String,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyTaskName);
    }
    Ok(())
}

impl Task {
    /// Create a pending task with a freshly generated id
    pub fn create(
        name: impl Into<String>,
        due_date: Option<NaiveDate>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        require_name(&name)?;
        Ok(Task {
            id: new_id(),
            name,
            due_date,
            description: description.into(),
            priority,
            completed: false,
        })
    }

    pub fn from_draft(draft: TaskDraft) -> Result<Self, ValidationError> {
        Task::create(draft.name, draft.due_date, draft.description, draft.priority)
    }

    /// Rebuild a task from stored fields. The id is trusted as-is.
    pub(crate) fn restored(
        id: String,
        name: String,
        due_date: Option<NaiveDate>,
        description: String,
        priority: Priority,
        completed: bool,
    ) -> Self {
        Task {
            id,
            name,
            due_date,
            description,
            priority,
            completed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.next();
    }

    /// Replace every mutable field. `id` and `completed` are preserved.
    pub fn edit(
        &mut self,
        name: impl Into<String>,
        due_date: Option<NaiveDate>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        require_name(&name)?;
        self.name = name;
        self.due_date = due_date;
        self.description = description.into();
        self.priority = priority;
        Ok(())
    }

    pub fn apply_draft(&mut self, draft: TaskDraft) -> Result<(), ValidationError> {
        self.edit(draft.name, draft.due_date, draft.description, draft.priority)
    }

    /// The editable fields of this task, e.g. to prefill an edit form
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            due_date: self.due_date,
            description: self.description.clone(),
            priority: self.priority,
        }
    }

    /// Classify the due date relative to `reference` (normally today).
    ///
    /// A task due on the reference day or the day after is due soon; one due
    /// exactly two days out is already normal.
    pub fn due_date_status(&self, reference: NaiveDate) -> DueStatus {
        let Some(due) = self.due_date else {
            return DueStatus::None;
        };
        if due < reference {
            return DueStatus::Overdue;
        }
        let horizon = reference
            .checked_add_days(Days::new(DUE_SOON_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if due < horizon {
            DueStatus::DueSoon
        } else {
            DueStatus::Normal
        }
    }
}
