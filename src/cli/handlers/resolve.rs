//! Turn user-typed tab/task references into ids.
//!
//! A reference is a full id, a unique id prefix, or (tabs only) an exact
//! name. Ambiguous references are errors; unknown ones are reported as
//! `Missing` so the caller can treat them as a no-op.

use crate::model::collection::CollectionState;

#[derive(Debug, PartialEq, Eq)]
pub enum Resolved<T> {
    Found(T),
    Missing,
}

fn pick<T>(
    what: &str,
    query: &str,
    mut candidates: impl Iterator<Item = T>,
) -> Result<Resolved<T>, String> {
    let Some(first) = candidates.next() else {
        return Ok(Resolved::Missing);
    };
    if candidates.next().is_some() {
        return Err(format!("'{}' matches more than one {}", query, what));
    }
    Ok(Resolved::Found(first))
}

/// Resolve a tab reference to its id
pub fn resolve_tab(state: &CollectionState, query: &str) -> Result<Resolved<String>, String> {
    if query.is_empty() {
        return Ok(Resolved::Missing);
    }
    if let Some(tab) = state.find_tab(query) {
        return Ok(Resolved::Found(tab.id().to_string()));
    }
    let by_name = state.tabs.iter().filter(|t| t.name == query);
    if let Resolved::Found(id) = pick("tab", query, by_name.map(|t| t.id().to_string()))? {
        return Ok(Resolved::Found(id));
    }
    let by_prefix = state.tabs.iter().filter(|t| t.id().starts_with(query));
    pick("tab", query, by_prefix.map(|t| t.id().to_string()))
}

/// Resolve a task reference to `(tab_id, task_id)`
pub fn resolve_task(
    state: &CollectionState,
    query: &str,
) -> Result<Resolved<(String, String)>, String> {
    if query.is_empty() {
        return Ok(Resolved::Missing);
    }
    if let Some((tab, task)) = state.find_task(query) {
        return Ok(Resolved::Found((tab.id().to_string(), task.id().to_string())));
    }
    let by_prefix = state.tabs.iter().flat_map(|tab| {
        tab.tasks
            .iter()
            .filter(|t| t.id().starts_with(query))
            .map(move |t| (tab.id().to_string(), t.id().to_string()))
    });
    pick("task", query, by_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tab::Tab;
    use crate::model::task::{Priority, Task};

    fn task(id: &str) -> Task {
        Task::restored(id.into(), "t".into(), None, String::new(), Priority::Low, false)
    }

    fn state() -> CollectionState {
        CollectionState::from_tabs(vec![
            Tab::restored("g-0001".into(), "General".into(), true, vec![task("aa11")]),
            Tab::restored("w-0001".into(), "Work".into(), false, vec![task("aa22"), task("bb33")]),
            Tab::restored("w-0002".into(), "Home".into(), false, Vec::new()),
        ])
    }

    #[test]
    fn tab_by_id_name_and_prefix() {
        let s = state();
        assert_eq!(resolve_tab(&s, "w-0002"), Ok(Resolved::Found("w-0002".into())));
        assert_eq!(resolve_tab(&s, "Work"), Ok(Resolved::Found("w-0001".into())));
        assert_eq!(resolve_tab(&s, "g-"), Ok(Resolved::Found("g-0001".into())));
        assert!(resolve_tab(&s, "w-").is_err());
        assert_eq!(resolve_tab(&s, "nope"), Ok(Resolved::Missing));
        assert_eq!(resolve_tab(&s, ""), Ok(Resolved::Missing));
    }

    #[test]
    fn task_by_id_and_prefix() {
        let s = state();
        assert_eq!(
            resolve_task(&s, "bb"),
            Ok(Resolved::Found(("w-0001".into(), "bb33".into())))
        );
        assert_eq!(
            resolve_task(&s, "aa11"),
            Ok(Resolved::Found(("g-0001".into(), "aa11".into())))
        );
        assert!(resolve_task(&s, "aa").is_err());
        assert_eq!(resolve_task(&s, "zz"), Ok(Resolved::Missing));
    }
}
