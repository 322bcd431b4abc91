//! Collection reconciliation after server mutations
//!
//! The server response is authoritative: a created entity is appended, an
//! updated one replaces the entry with the same id, a removed id is
//! filtered out. Server order is otherwise preserved.

use crate::model::{Entity, SelectOption};

/// Append a newly created entity; an entry with the same id is replaced
pub fn append_created<T: Entity>(items: &mut Vec<T>, created: T) {
    match items.iter().position(|e| e.id() == created.id()) {
        Some(idx) => items[idx] = created,
        None => items.push(created),
    }
}

/// Replace the entity with the same id; returns false when it is not present
pub fn replace_updated<T: Entity>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|e| e.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        },
        None => false,
    }
}

/// Drop every entity with this id; returns how many were removed
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: i64) -> usize {
    let before = items.len();
    items.retain(|e| e.id() != id);
    before - items.len()
}

/// Option list for select fields, in collection order
pub fn options_from<T: Entity>(items: &[T]) -> Vec<SelectOption> {
    items.iter().map(SelectOption::of).collect()
}

/// Names for a list of referenced ids; unknown ids render as `#<id>`
pub fn resolve_labels(ids: &[i64], options: &[SelectOption]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            options
                .iter()
                .find(|o| o.id == *id)
                .map(|o| o.name.clone())
                .unwrap_or_else(|| format!("#{}", id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coach;
    use serde_json::json;

    fn coach(id: i64, name: &str) -> Coach {
        serde_json::from_value(json!({"id": id, "name": name})).unwrap()
    }

    #[test]
    fn test_append_then_replace() {
        let mut items = vec![coach(1, "Ana")];
        append_created(&mut items, coach(2, "Ben"));
        append_created(&mut items, coach(2, "Benjamin"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Benjamin");
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let mut items = vec![coach(1, "Ana")];
        assert!(!replace_updated(&mut items, coach(5, "Zoe")));
        assert_eq!(items, vec![coach(1, "Ana")]);
    }

    #[test]
    fn test_resolve_labels() {
        let options = options_from(&[coach(1, "Ana"), coach(2, "Ben")]);
        assert_eq!(resolve_labels(&[2, 9, 1], &options), vec!["Ben", "#9", "Ana"]);
    }
}
