//! Persisted form of the tab collection.
//!
//! The whole collection is written as one JSON array under a single storage
//! key. Reading is lenient: a value that is not a JSON array is treated as
//! "no data". Inside the array, entries that are not objects are skipped and
//! fields that are missing or of the wrong type fall back to defaults.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::collection::CollectionState;
use crate::model::tab::{GENERAL_TAB_NAME, Tab};
use crate::model::task::{Priority, Task};

/// Date format used for `dueDate`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name given to a restored tab or task whose stored name is missing or blank
pub const UNTITLED: &str = "Untitled";

/// Serializable form of the full collection, one record per tab in order
pub type Snapshot = Vec<TabRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabRecord {
    #[serde(rename = "tabID", default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "tabName", default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "isGeneral", default, deserialize_with = "lenient")]
    pub is_general: Option<bool>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub tasks: Option<Vec<TaskRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "taskID", default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "taskName", default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "dueDate", default, deserialize_with = "lenient")]
    pub due_date: Option<String>,
    #[serde(rename = "desc", default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<bool>,
}

/// Read any JSON value; one of the wrong type becomes `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Read an array of records, skipping entries that are not objects
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(records_from(items))),
        _ => Ok(None),
    }
}

fn records_from<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| T::deserialize(item).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Model <-> record conversion
// ---------------------------------------------------------------------------

/// Capture the full collection as a snapshot
pub fn snapshot_of(state: &CollectionState) -> Snapshot {
    state.tabs.iter().map(tab_to_record).collect()
}

fn tab_to_record(tab: &Tab) -> TabRecord {
    TabRecord {
        id: Some(tab.id().to_string()),
        name: Some(tab.name.clone()),
        is_general: Some(tab.is_general()),
        tasks: Some(tab.tasks.iter().map(task_to_record).collect()),
    }
}

fn task_to_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: Some(task.id().to_string()),
        name: Some(task.name.clone()),
        due_date: task.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
        description: Some(task.description.clone()),
        priority: Some(task.priority.as_str().to_string()),
        completed: Some(task.completed),
    }
}

/// Rebuild a collection from a snapshot, defaulting missing fields.
/// An empty snapshot yields a fresh collection.
pub fn state_from(snapshot: Snapshot) -> CollectionState {
    if snapshot.is_empty() {
        return CollectionState::new();
    }
    let tabs = snapshot.into_iter().map(tab_from_record).collect();
    CollectionState::from_tabs(tabs)
}

fn tab_from_record(record: TabRecord) -> Tab {
    let tasks = record
        .tasks
        .unwrap_or_default()
        .into_iter()
        .map(task_from_record)
        .collect();
    let is_general = record.is_general.unwrap_or(false);
    let fallback = if is_general { GENERAL_TAB_NAME } else { UNTITLED };
    Tab::restored(
        record.id.unwrap_or_default(),
        name_or(record.name, fallback),
        is_general,
        tasks,
    )
}

fn task_from_record(record: TaskRecord) -> Task {
    let priority = record
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .unwrap_or_default();
    Task::restored(
        record.id.unwrap_or_default(),
        name_or(record.name, UNTITLED),
        record.due_date.as_deref().and_then(parse_due_date),
        record.description.unwrap_or_default(),
        priority,
        record.completed.unwrap_or(false),
    )
}

fn name_or(name: Option<String>, fallback: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => fallback.to_string(),
    }
}

/// Parse a stored due date. Full timestamps are accepted by their date part.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Store access
// ---------------------------------------------------------------------------

/// Key holding the active tab id, next to the collection key
pub fn active_key(key: &str) -> String {
    format!("{}.active", key)
}

/// Write the snapshot under `key`, replacing whatever was there.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    snapshot: &Snapshot,
) -> Result<(), StoreError> {
    let content = serde_json::to_string(snapshot)?;
    store.set(key, &content)?;
    tracing::debug!(key, tabs = snapshot.len(), "saved collection");
    Ok(())
}

/// Read the snapshot under `key`. Returns `None` when the key is absent,
/// blank, unreadable or does not parse; never fails.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<Snapshot> {
    let content = match store.get(key) {
        Ok(Some(content)) => content,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored collection");
            return None;
        }
    };
    if content.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => {
            let total = items.len();
            let snapshot: Snapshot = records_from(items);
            if snapshot.len() < total {
                tracing::warn!(key, skipped = total - snapshot.len(), "skipped malformed tab entries");
            }
            Some(snapshot)
        }
        Ok(_) => {
            tracing::warn!(key, "ignoring stored collection that is not an array");
            None
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unparsable stored collection");
            None
        }
    }
}

pub fn save_active_tab<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    tab_id: &str,
) -> Result<(), StoreError> {
    store.set(&active_key(key), tab_id)
}

pub fn load_active_tab<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(&active_key(key)) {
        Ok(Some(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read active tab");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;

    fn sample_state() -> CollectionState {
        let mut state = CollectionState::new();
        let mut work = Tab::create("Work").unwrap();
        let mut report = Task::create(
            "Report",
            NaiveDate::from_ymd_opt(2024, 1, 10),
            "",
            Priority::Low,
        )
        .unwrap();
        report.toggle_completed();
        work.add_task(report);
        work.add_task(Task::create("Email", None, "inbox zero", Priority::High).unwrap());
        state.tabs.push(work);
        state
    }

    #[test]
    fn save_then_load_round_trips() {
        let state = sample_state();
        let mut store = MemoryStore::new();
        save(&mut store, "tabs", &snapshot_of(&state)).unwrap();

        let restored = state_from(load(&store, "tabs").unwrap());
        assert_eq!(restored.tabs, state.tabs);
    }

    #[test]
    fn wire_format_uses_original_field_names() {
        let state = sample_state();
        let json = serde_json::to_value(snapshot_of(&state)).unwrap();
        let work = &json[1];
        assert_eq!(work["tabName"], "Work");
        assert_eq!(work["isGeneral"], false);
        assert!(work["tabID"].is_string());
        let task = &work["tasks"][0];
        assert_eq!(task["taskName"], "Report");
        assert_eq!(task["dueDate"], "2024-01-10");
        assert_eq!(task["desc"], "");
        assert_eq!(task["priority"], "low");
        assert_eq!(task["completed"], true);
        assert!(work["tasks"][1]["dueDate"].is_null());
        assert_eq!(json[0]["isGeneral"], true);
    }

    #[test]
    fn load_absent_key_is_none() {
        let store = MemoryStore::new();
        assert!(load(&store, "tabs").is_none());
    }

    #[test]
    fn load_blank_or_garbage_is_none() {
        let mut store = MemoryStore::new();
        store.set("tabs", "   ").unwrap();
        assert!(load(&store, "tabs").is_none());
        store.set("tabs", "not json {{{").unwrap();
        assert!(load(&store, "tabs").is_none());
        store.set("tabs", r#"{"tabID":"x"}"#).unwrap();
        assert!(load(&store, "tabs").is_none());
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let mut store = MemoryStore::new();
        store
            .set(
                "tabs",
                r#"[{"tabID":"w","tabName":"Work","tasks":[
                    {"taskID":"t","taskName":"Report","priority":"urgent","dueDate":"soon"},
                    {"taskName":"Other","completed":null}
                ]}]"#,
            )
            .unwrap();
        let state = state_from(load(&store, "tabs").unwrap());

        // no general tab in the data, so one is added in front
        assert_eq!(state.tabs.len(), 2);
        assert_eq!(state.tabs[0].name, GENERAL_TAB_NAME);
        let work = &state.tabs[1];
        assert_eq!(work.id(), "w");
        let report = &work.tasks[0];
        assert!(!report.completed);
        assert_eq!(report.priority, Priority::Low);
        assert_eq!(report.due_date, None);
        assert_eq!(report.description, "");
        let other = &work.tasks[1];
        assert!(!other.id().is_empty());
        assert!(!other.completed);
    }

    #[test]
    fn wrong_typed_fields_are_defaulted() {
        let mut store = MemoryStore::new();
        store
            .set(
                "tabs",
                r#"[
                    {"tabID":"g","tabName":"General","isGeneral":true,"tasks":[]},
                    {"tabID":"w","tabName":"Work","isGeneral":"no","tasks":[
                        {"taskID":"a","taskName":"Report","completed":"yes","priority":2},
                        null,
                        {"taskID":"b","taskName":"Email","desc":7,"dueDate":20240110,"completed":true},
                        "stray"
                    ]},
                    42,
                    {"tabID":"h","tabName":"Home","tasks":"none"}
                ]"#,
            )
            .unwrap();
        let state = state_from(load(&store, "tabs").unwrap());

        let names: Vec<_> = state.tabs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["General", "Work", "Home"]);
        let work = &state.tabs[1];
        assert!(!work.is_general());
        assert_eq!(work.tasks.len(), 2);
        let report = &work.tasks[0];
        assert_eq!(report.id(), "a");
        assert!(!report.completed);
        assert_eq!(report.priority, Priority::Low);
        let email = &work.tasks[1];
        assert_eq!(email.description, "");
        assert_eq!(email.due_date, None);
        assert!(email.completed);
        assert!(state.tabs[2].tasks.is_empty());
    }

    #[test]
    fn blank_names_get_a_placeholder() {
        let mut store = MemoryStore::new();
        store
            .set(
                "tabs",
                r#"[
                    {"tabID":"g","isGeneral":true},
                    {"tabID":"w","tabName":"  ","tasks":[{"taskID":"t"}]}
                ]"#,
            )
            .unwrap();
        let state = state_from(load(&store, "tabs").unwrap());

        assert_eq!(state.tabs[0].name, GENERAL_TAB_NAME);
        assert_eq!(state.tabs[1].name, UNTITLED);
        assert_eq!(state.tabs[1].tasks[0].name, UNTITLED);
    }

    #[test]
    fn empty_array_restores_fresh_state() {
        let state = state_from(Vec::new());
        assert_eq!(state.tabs.len(), 1);
        assert!(state.tabs[0].is_general());
    }

    #[test]
    fn parse_due_date_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_due_date("2024-01-10"), expected);
        assert_eq!(parse_due_date("2024-01-10T00:00:00.000Z"), expected);
        assert_eq!(parse_due_date("10/01/2024"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn active_tab_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_active_tab(&store, "tabs"), None);
        save_active_tab(&mut store, "tabs", "abc").unwrap();
        assert_eq!(load_active_tab(&store, "tabs").as_deref(), Some("abc"));
        assert_eq!(store.get("tabs.active").unwrap().as_deref(), Some("abc"));
    }
}
