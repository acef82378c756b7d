use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::collection::CollectionState;
use crate::model::tab::Tab;
use crate::model::task::{DueStatus, Priority, Task};

/// Priority criterion: everything, or one exact priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => task.priority == p,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        Priority::parse(s).map(PriorityFilter::Only).ok_or_else(|| {
            format!(
                "unknown priority filter '{}' (expected: all, low, medium, high)",
                s
            )
        })
    }
}

/// Completion criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(format!(
                "unknown status filter '{}' (expected: all, completed, pending)",
                s
            )),
        }
    }
}

/// Search and filter criteria, all ANDed together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring of the task name; empty matches everything
    pub search: String,
    pub priority: PriorityFilter,
    pub status: StatusFilter,
}

impl TaskFilter {
    /// `needle` is the search text, already lowercased
    fn matches(&self, task: &Task, needle: &str) -> bool {
        (needle.is_empty() || task.name.to_lowercase().contains(needle))
            && self.priority.matches(task)
            && self.status.matches(task)
    }
}

/// Why a projection has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyReason {
    /// The tab holds no tasks at all
    NoTasks,
    /// The tab has tasks, but none pass the filter
    NoMatches,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoTasks => "No tasks yet.",
            EmptyReason::NoMatches => "No tasks match the current filters.",
        }
    }
}

/// The tasks to display for a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection<'a> {
    Tasks(Vec<&'a Task>),
    Empty(EmptyReason),
}

impl<'a> Projection<'a> {
    pub fn tasks(&self) -> &[&'a Task] {
        match self {
            Projection::Tasks(tasks) => tasks,
            Projection::Empty(_) => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            Projection::Tasks(_) => None,
            Projection::Empty(reason) => Some(*reason),
        }
    }
}

/// Project the tasks of `tab_id` through `filter`. Output keeps insertion
/// order. An unknown tab projects as [`EmptyReason::NoTasks`].
pub fn project<'a>(state: &'a CollectionState, tab_id: &str, filter: &TaskFilter) -> Projection<'a> {
    let Some(tab) = state.find_tab(tab_id) else {
        return Projection::Empty(EmptyReason::NoTasks);
    };
    project_tab(tab, filter)
}

/// Project the active tab
pub fn project_active<'a>(state: &'a CollectionState, filter: &TaskFilter) -> Projection<'a> {
    project(state, state.active_tab_id(), filter)
}

pub fn project_tab<'a>(tab: &'a Tab, filter: &TaskFilter) -> Projection<'a> {
    if tab.tasks.is_empty() {
        return Projection::Empty(EmptyReason::NoTasks);
    }
    let needle = filter.search.to_lowercase();
    let visible: Vec<&Task> = tab
        .tasks
        .iter()
        .filter(|t| filter.matches(t, &needle))
        .collect();
    if visible.is_empty() {
        Projection::Empty(EmptyReason::NoMatches)
    } else {
        Projection::Tasks(visible)
    }
}

// ---------------------------------------------------------------------------
// Tab statistics
// ---------------------------------------------------------------------------

/// Task counts for one tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending tasks whose due date is before `today`
    pub overdue: usize,
}

pub fn tab_stats(tab: &Tab, today: NaiveDate) -> TabStats {
    let mut stats = TabStats::default();
    for task in &tab.tasks {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
            if task.due_date_status(today) == DueStatus::Overdue {
                stats.overdue += 1;
            }
        }
    }
    stats
}
