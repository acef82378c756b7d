use chrono::NaiveDate;
use serde::Serialize;

use crate::model::tab::Tab;
use crate::model::task::{DueStatus, Priority, Task};
use crate::ops::view::{EmptyReason, Projection, TabStats};
use crate::util::unicode::fit_to_width;

/// Cells reserved for the task name in one-line listings
const NAME_WIDTH: usize = 32;
/// Characters of an id shown in listings
const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_status: DueStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabJson {
    pub id: String,
    pub name: String,
    pub is_general: bool,
    pub active: bool,
    pub stats: TabStats,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub tab: TabJson,
    pub tasks: Vec<TaskJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyReason>,
}

#[derive(Serialize)]
pub struct TaskDetailJson {
    pub tab: String,
    #[serde(flatten)]
    pub task: TaskJson,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, today: NaiveDate) -> TaskJson {
    TaskJson {
        id: task.id().to_string(),
        name: task.name.clone(),
        due_date: task.due_date,
        description: task.description.clone(),
        priority: task.priority,
        completed: task.completed,
        due_status: task.due_date_status(today),
    }
}

pub fn tab_to_json(tab: &Tab, active: bool, stats: TabStats) -> TabJson {
    TabJson {
        id: tab.id().to_string(),
        name: tab.name.clone(),
        is_general: tab.is_general(),
        active,
        stats,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// First few characters of an id, enough to reference it from the CLI
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn check_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

fn due_text(task: &Task, today: NaiveDate) -> String {
    let Some(due) = task.due_date else {
        return String::new();
    };
    match task.due_date_status(today) {
        DueStatus::Overdue => format!("due {} (overdue)", due),
        DueStatus::DueSoon => format!("due {} (soon)", due),
        DueStatus::Normal | DueStatus::None => format!("due {}", due),
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let line = format!(
        "[{}] {}  {}  {:<6}  {}",
        check_char(task),
        short_id(task.id()),
        fit_to_width(&task.name, NAME_WIDTH),
        task.priority.as_str(),
        due_text(task, today),
    );
    line.trim_end().to_string()
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, tab: &Tab, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", check_char(task), task.name),
        format!("id:       {}", task.id()),
        format!("tab:      {}", tab.name),
        format!("priority: {}", task.priority),
    ];
    if task.due_date.is_some() {
        lines.push(format!("due:      {}", due_text(task, today).trim_start_matches("due ")));
    }
    if !task.description.is_empty() {
        lines.push("desc:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Format tab info for the tabs listing
pub fn format_tab_line(tab: &Tab, active: bool, stats: &TabStats) -> String {
    let marker = if active { '*' } else { ' ' };
    let overdue = if stats.overdue > 0 {
        format!(", {} overdue", stats.overdue)
    } else {
        String::new()
    };
    format!(
        "{} {} ({})  {} pending, {} done{}",
        marker,
        tab.name,
        short_id(tab.id()),
        stats.pending,
        stats.completed,
        overdue
    )
}

/// Format a tab header followed by its projected tasks or the empty message
pub fn format_listing(tab: &Tab, projection: &Projection<'_>, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", tab.name), String::new()];
    match projection {
        Projection::Tasks(tasks) => {
            lines.extend(tasks.iter().map(|t| format_task_line(t, today)));
        }
        Projection::Empty(reason) => lines.push(reason.message().to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::view::{TaskFilter, project_tab, tab_stats};
    use insta::assert_snapshot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn task(id: &str, name: &str, due: Option<(i32, u32, u32)>, priority: Priority, done: bool) -> Task {
        Task::restored(
            id.to_string(),
            name.to_string(),
            due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            String::new(),
            priority,
            done,
        )
    }

    fn work_tab() -> Tab {
        Tab::restored(
            "7f3c9a10-0000-4000-8000-000000000000".into(),
            "Work".into(),
            false,
            vec![
                task("a1b2c3d4-1111", "Report", Some((2024, 1, 9)), Priority::High, false),
                task("e5f6a7b8-2222", "Email", Some((2024, 1, 11)), Priority::Low, true),
                task("c0ffee00-3333", "Plan", None, Priority::Medium, false),
            ],
        )
    }

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("a1b2c3d4-1111"), "a1b2c3d4");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn listing() {
        let tab = work_tab();
        let projection = project_tab(&tab, &TaskFilter::default());
        let output = format_listing(&tab, &projection, today()).join("\n");
        assert_snapshot!(output, @r"
        == Work ==

        [ ] a1b2c3d4  Report                            high    due 2024-01-09 (overdue)
        [x] e5f6a7b8  Email                             low     due 2024-01-11 (soon)
        [ ] c0ffee00  Plan                              medium
        ");
    }

    #[test]
    fn listing_empty_messages() {
        let empty = Tab::restored("t".into(), "Empty".into(), false, Vec::new());
        let projection = project_tab(&empty, &TaskFilter::default());
        assert_eq!(
            format_listing(&empty, &projection, today()),
            vec!["== Empty ==", "", "No tasks yet."]
        );

        let tab = work_tab();
        let filter = TaskFilter {
            search: "zzz".into(),
            ..Default::default()
        };
        let projection = project_tab(&tab, &filter);
        assert_eq!(
            format_listing(&tab, &projection, today())[2],
            "No tasks match the current filters."
        );
    }

    #[test]
    fn tab_line() {
        let tab = work_tab();
        let stats = tab_stats(&tab, today());
        assert_snapshot!(format_tab_line(&tab, true, &stats), @"* Work (7f3c9a10)  2 pending, 1 done, 1 overdue");
        let empty = Tab::restored("0123456789".into(), "General".into(), true, Vec::new());
        let stats = tab_stats(&empty, today());
        assert_snapshot!(format_tab_line(&empty, false, &stats), @"  General (01234567)  0 pending, 0 done");
    }

    #[test]
    fn detail() {
        let tab = work_tab();
        let mut t = tab.tasks[0].clone();
        t.description = "numbers for Q4\nsend to finance".into();
        let output = format_task_detail(&t, &tab, today()).join("\n");
        assert_snapshot!(output, @r"
        [ ] Report
        id:       a1b2c3d4-1111
        tab:      Work
        priority: high
        due:      2024-01-09 (overdue)
        desc:
          numbers for Q4
          send to finance
        ");
    }

    #[test]
    fn task_json_shape() {
        let tab = work_tab();
        let json = serde_json::to_value(task_to_json(&tab.tasks[0], today())).unwrap();
        assert_eq!(json["id"], "a1b2c3d4-1111");
        assert_eq!(json["dueDate"], "2024-01-09");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["dueStatus"], "overdue");
        assert_eq!(json["completed"], false);
    }
}
